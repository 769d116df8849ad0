use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Immutable recruiter-scoped fit assessment. At most one row exists per
/// (application, recruiter); the unique index is the enforcement point.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RelevanceReview {
    pub id: Uuid,
    pub application_id: Uuid,
    pub recruiter_id: Uuid,
    pub match_score: i32,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}
