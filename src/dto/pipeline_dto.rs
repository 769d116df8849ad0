use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::compare_service::SkillOverlap;

/// One unique candidate identity in a recruiter's pipeline, aggregated
/// across every application that identity submitted to the recruiter's
/// jobs. `application_id` is the best-scoring application and serves as
/// the stable key for this aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineCandidate {
    pub application_id: Uuid,
    pub name: String,
    pub email: String,
    pub registered: bool,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Vec<String>,
    pub best_match_score: f64,
    pub application_count: usize,
    pub best_status: String,
    pub job_title: String,
    pub latest_application_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub candidates: Vec<PipelineCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComparePayload {
    #[validate(length(min = 2, max = 4))]
    pub application_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareCandidate {
    pub application_id: Uuid,
    pub name: String,
    pub email: String,
    pub headline: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Vec<String>,
    pub relevance_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub candidates: Vec<CompareCandidate>,
    /// Keyed by lower-cased skill; the UI looks classifications up via the
    /// normalized form while rendering the original strings.
    pub skill_overlap: HashMap<String, SkillOverlap>,
}
