use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::job_dto::{
    CreateJobPayload, JobListQuery, JobListResponse, JobResponse, UpdateJobPayload,
};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

pub async fn list_public_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl axum::response::IntoResponse> {
    let list = state.job_service.list_published(query).await?;
    Ok(Json(JobListResponse::from(list)))
}

pub async fn get_public_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let job = state.job_service.get_published(id).await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let recruiter_id = claims.user_id()?;
    let job = state.job_service.create(recruiter_id, payload).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

pub async fn list_my_jobs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let jobs = state.job_service.list_owned(recruiter_id).await?;
    let jobs: Vec<JobResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(jobs))
}

pub async fn get_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    let job = state.job_service.get_owned(recruiter_id, id).await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn update_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let recruiter_id = claims.user_id()?;
    let job = state.job_service.update(recruiter_id, id, payload).await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn delete_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let recruiter_id = claims.user_id()?;
    state.job_service.soft_delete(recruiter_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
