use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use hackhyre_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/public/jobs", get(routes::job_routes::list_public_jobs))
        .route(
            "/api/public/jobs/:id",
            get(routes::job_routes::get_public_job),
        )
        .route(
            "/api/public/jobs/:id/apply",
            post(routes::application_routes::apply_to_job),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let seeker_api = Router::new()
        .route(
            "/api/seeker/profile",
            get(routes::seeker_routes::get_my_profile)
                .put(routes::seeker_routes::upsert_my_profile),
        )
        .route(
            "/api/seeker/applications",
            get(routes::seeker_routes::list_my_applications),
        )
        .layer(axum::middleware::from_fn(auth::require_seeker));

    let recruiter_api = Router::new()
        .route(
            "/api/recruiter/jobs",
            get(routes::job_routes::list_my_jobs).post(routes::job_routes::create_job),
        )
        .route(
            "/api/recruiter/jobs/:id",
            get(routes::job_routes::get_job)
                .patch(routes::job_routes::update_job)
                .delete(routes::job_routes::delete_job),
        )
        .route(
            "/api/recruiter/jobs/:id/applications",
            get(routes::application_routes::list_job_applications),
        )
        .route(
            "/api/recruiter/applications/:id/status",
            post(routes::application_routes::update_application_status),
        )
        .route(
            "/api/recruiter/applications/:id/relevance",
            get(routes::application_routes::get_relevance)
                .post(routes::application_routes::generate_relevance),
        )
        .route(
            "/api/recruiter/pipeline",
            get(routes::pipeline_routes::get_pipeline),
        )
        .route(
            "/api/recruiter/pipeline/compare",
            post(routes::pipeline_routes::compare_candidates),
        )
        .route(
            "/api/recruiter/agent/sessions",
            post(routes::agent_routes::create_session),
        )
        .route(
            "/api/recruiter/agent/sessions/:id/messages",
            post(routes::agent_routes::send_message),
        )
        .route(
            "/api/recruiter/agent/sessions/:id/publish",
            post(routes::agent_routes::publish_job),
        )
        .route(
            "/api/recruiter/calendar/connect",
            post(routes::calendar_routes::connect_calendar),
        )
        .route(
            "/api/recruiter/interviews",
            post(routes::calendar_routes::schedule_interview),
        )
        .layer(axum::middleware::from_fn(auth::require_recruiter))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.recruiter_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(public_api)
        .merge(seeker_api)
        .merge(recruiter_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
