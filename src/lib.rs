pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{
    agent_service::AgentService, ai_service::AiService, application_service::ApplicationService,
    calendar_service::CalendarService, compare_service::CompareService, job_service::JobService,
    pipeline_service::PipelineService, profile_service::ProfileService,
    relevance_service::RelevanceService, user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub user_service: UserService,
    pub profile_service: ProfileService,
    pub pipeline_service: PipelineService,
    pub compare_service: CompareService,
    pub relevance_service: RelevanceService,
    pub agent_service: AgentService,
    pub calendar_service: CalendarService,
    pub ai_service: AiService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        let job_service = JobService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone());
        let user_service = UserService::new(pool.clone());
        let profile_service = ProfileService::new(pool.clone());
        let pipeline_service = PipelineService::new(pool.clone());
        let compare_service = CompareService::new(pool.clone());
        let relevance_service = RelevanceService::new(pool.clone());
        let agent_service = AgentService::new(pool.clone());
        let calendar_service = CalendarService::new(pool.clone(), http_client.clone());
        let ai_service = AiService::new(config.openai_api_key.clone(), http_client);

        Self {
            pool,
            job_service,
            application_service,
            user_service,
            profile_service,
            pipeline_service,
            compare_service,
            relevance_service,
            agent_service,
            calendar_service,
            ai_service,
        }
    }
}
