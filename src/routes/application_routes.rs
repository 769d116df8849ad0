use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::application_dto::{ApplyPayload, ApplyResponse, UpdateApplicationStatusPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::application::ApplicationStatus;
use crate::services::ai_service::{candidate_summary, job_summary};
use crate::AppState;

/// Public application submission. The response returns as soon as the row
/// is written; fit scoring runs in a detached task and its outcome never
/// reaches this caller.
pub async fn apply_to_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;

    let job = state.job_service.get_published(job_id).await?;
    let application = state.application_service.apply(job.id, payload).await?;

    let ai_service = state.ai_service.clone();
    let application_service = state.application_service.clone();
    let profile_service = state.profile_service.clone();
    let job_text = job_summary(&job);
    let spawned = application.clone();

    tokio::spawn(async move {
        let profile = match spawned.candidate_id {
            Some(candidate_id) => profile_service.get(candidate_id).await.unwrap_or(None),
            None => None,
        };
        let candidate_text = candidate_summary(&spawned, profile.as_ref());

        match ai_service.score_fit(&candidate_text, &job_text).await {
            Ok(assessment) => {
                let score = f64::from(assessment.match_score) / 100.0;
                match application_service
                    .set_relevance_score_once(spawned.id, score)
                    .await
                {
                    Ok(true) => {
                        tracing::info!(application_id = %spawned.id, score,
                            "fit score stored for application");
                    }
                    Ok(false) => {
                        tracing::info!(application_id = %spawned.id,
                            "fit score already present, keeping first value");
                    }
                    Err(e) => {
                        tracing::error!(application_id = %spawned.id, error = ?e,
                            "failed to store fit score");
                    }
                }
            }
            Err(e) => {
                tracing::error!(application_id = %spawned.id, error = ?e,
                    "fit scoring failed, score stays unset");
            }
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            id: application.id,
            status: application.status,
        }),
    ))
}

pub async fn list_job_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let job = state.job_service.get_owned(recruiter_id, job_id).await?;
    let applications = state.application_service.list_for_job(job.id).await?;
    Ok(Json(applications))
}

pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationStatusPayload>,
) -> Result<impl axum::response::IntoResponse> {
    let status = ApplicationStatus::parse(&payload.status)
        .ok_or_else(|| Error::BadRequest(format!("Unknown status: {}", payload.status)))?;
    let recruiter_id = claims.user_id()?;
    let application = state
        .application_service
        .update_status(recruiter_id, id, status)
        .await?;
    Ok(Json(application))
}

/// Idempotent get-or-generate of the caller's relevance review for one
/// application. Generation happens at most once per (application,
/// recruiter); repeats return the stored record.
pub async fn generate_relevance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let application = state
        .application_service
        .get_owned(recruiter_id, id)
        .await?;

    if let Some(existing) = state
        .relevance_service
        .find(application.id, recruiter_id)
        .await?
    {
        return Ok(Json(existing));
    }

    let job = state
        .job_service
        .get_owned(recruiter_id, application.job_id)
        .await?;
    let profile = match application.candidate_id {
        Some(candidate_id) => state.profile_service.get(candidate_id).await?,
        None => None,
    };

    let assessment = state
        .ai_service
        .score_fit(
            &candidate_summary(&application, profile.as_ref()),
            &job_summary(&job),
        )
        .await?;

    let review = state
        .relevance_service
        .store(application.id, recruiter_id, assessment)
        .await?;
    Ok(Json(review))
}

pub async fn get_relevance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let application = state
        .application_service
        .get_owned(recruiter_id, id)
        .await?;
    let review = state
        .relevance_service
        .find(application.id, recruiter_id)
        .await?
        .ok_or_else(|| Error::NotFound("Relevance review not found".to_string()))?;
    Ok(Json(review))
}
