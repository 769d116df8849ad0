use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::json;
use validator::Validate;

use crate::dto::calendar_dto::{ConnectCalendarPayload, ScheduleInterviewPayload};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

pub async fn connect_calendar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ConnectCalendarPayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let recruiter_id = claims.user_id()?;
    let account = state.calendar_service.connect(recruiter_id, payload).await?;
    Ok(Json(json!({
        "status": "connected",
        "provider": account.provider,
        "expires_at": account.expires_at,
    })))
}

pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let recruiter_id = claims.user_id()?;

    let application = state
        .application_service
        .get_owned(recruiter_id, payload.application_id)
        .await?;
    let job = state
        .job_service
        .get_owned(recruiter_id, application.job_id)
        .await?;

    let event_title = format!("Interview: {} / {}", application.candidate_name, job.title);
    let interview = state
        .calendar_service
        .schedule_interview(recruiter_id, event_title, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(interview)))
}
