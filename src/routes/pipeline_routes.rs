use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::dto::pipeline_dto::{ComparePayload, CompareResponse, PipelineResponse};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

/// The recruiter's aggregated candidate pipeline: one entry per unique
/// candidate identity across all of their jobs, best match first.
pub async fn get_pipeline(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let candidates = state.pipeline_service.list_candidates(recruiter_id).await?;
    Ok(Json(PipelineResponse { candidates }))
}

/// Side-by-side comparison of 2-4 selected applications. Overlap
/// classification is meaningless for fewer than two candidates, so the
/// payload bound rejects that case up front.
pub async fn compare_candidates(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ComparePayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let recruiter_id = claims.user_id()?;
    let (candidates, skill_overlap) = state
        .compare_service
        .compare(recruiter_id, &payload.application_ids)
        .await?;
    Ok(Json(CompareResponse {
        candidates,
        skill_overlap,
    }))
}
