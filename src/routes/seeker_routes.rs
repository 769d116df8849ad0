use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::dto::profile_dto::UpsertProfilePayload;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::AppState;

pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl axum::response::IntoResponse> {
    let user_id = claims.user_id()?;
    let profile = state
        .profile_service
        .get(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

pub async fn upsert_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpsertProfilePayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let profile = state.profile_service.upsert(user_id, payload).await?;
    Ok(Json(profile))
}

/// The seeker's own applications, matched by account email so guest
/// submissions made with the same address show up too.
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl axum::response::IntoResponse> {
    let user_id = claims.user_id()?;
    let user = state
        .user_service
        .get(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
    let applications = state
        .application_service
        .list_for_email(&user.email)
        .await?;
    Ok(Json(applications))
}
