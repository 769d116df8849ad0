pub mod agent_routes;
pub mod application_routes;
pub mod calendar_routes;
pub mod health;
pub mod job_routes;
pub mod pipeline_routes;
pub mod seeker_routes;
