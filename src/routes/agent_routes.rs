use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::agent_dto::{AgentMessagePayload, AgentSessionResponse, AgentTurnResponse};
use crate::dto::job_dto::{CreateJobPayload, JobResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::AppState;

pub async fn create_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let session = state.agent_service.create_session(recruiter_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(AgentSessionResponse {
            session_id: session.id,
            draft: session.draft,
        }),
    ))
}

/// One conversational turn: persist the recruiter's message, let the model
/// reply and revise the draft, persist both.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<AgentMessagePayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let recruiter_id = claims.user_id()?;
    let session = state
        .agent_service
        .get_session(recruiter_id, session_id)
        .await?;

    let history: Vec<(String, String)> = state
        .agent_service
        .list_messages(session.id)
        .await?
        .into_iter()
        .map(|message| (message.role, message.content))
        .collect();

    state
        .agent_service
        .append_message(session.id, "user", &payload.content)
        .await?;

    let turn = state
        .ai_service
        .continue_job_draft(&history, &session.draft, &payload.content)
        .await?;

    state
        .agent_service
        .append_message(session.id, "assistant", &turn.reply)
        .await?;
    let session = state
        .agent_service
        .update_draft(session.id, &turn.draft)
        .await?;

    Ok(Json(AgentTurnResponse {
        session_id: session.id,
        reply: turn.reply,
        draft: session.draft,
    }))
}

/// Turn the session's accumulated draft into a real (draft-status) job.
pub async fn publish_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let session = state
        .agent_service
        .get_session(recruiter_id, session_id)
        .await?;

    let payload: CreateJobPayload = serde_json::from_value(session.draft.clone())
        .map_err(|_| Error::BadRequest("Draft is missing required fields".to_string()))?;
    payload.validate()?;

    let job = state.job_service.create(recruiter_id, payload).await?;
    state.agent_service.mark_published(session.id, job.id).await?;

    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}
