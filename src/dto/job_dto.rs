use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::Job;
use crate::services::job_service::JobList;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: uuid::Uuid,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPublicSummary {
    pub id: uuid::Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub skills: Vec<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<JobPublicSummary>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            title: value.title,
            company: value.company,
            description: value.description,
            skills: value.skills,
            location: value.location,
            employment_type: value.employment_type,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Job> for JobPublicSummary {
    fn from(value: Job) -> Self {
        let summary = value.description.as_ref().map(|text| {
            let trimmed = text.trim();
            if trimmed.chars().count() > 320 {
                format!("{}…", trimmed.chars().take(320).collect::<String>())
            } else {
                trimmed.to_string()
            }
        });

        Self {
            id: value.id,
            title: value.title,
            company: value.company,
            location: value.location,
            employment_type: value.employment_type,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            skills: value.skills,
            summary,
            created_at: value.created_at,
        }
    }
}

impl From<JobList> for JobListResponse {
    fn from(value: JobList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
