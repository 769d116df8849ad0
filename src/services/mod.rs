pub mod agent_service;
pub mod ai_service;
pub mod application_service;
pub mod calendar_service;
pub mod compare_service;
pub mod job_service;
pub mod pipeline_service;
pub mod profile_service;
pub mod relevance_service;
pub mod user_service;
