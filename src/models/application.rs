use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub candidate_name: String,
    pub candidate_email: String,
    pub note: Option<String>,
    pub status: String,
    pub relevance_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Grouping key for the candidate pipeline. Guest and registered
    /// submissions with the same email merge into one identity.
    pub fn identity_key(&self) -> String {
        self.candidate_email.to_lowercase()
    }

    pub fn parsed_status(&self) -> ApplicationStatus {
        ApplicationStatus::parse(&self.status).unwrap_or(ApplicationStatus::NotReviewed)
    }
}

/// Review pipeline status of a single application. The ordering is the
/// display priority used when reducing a candidate's applications to one
/// headline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Rejected,
    NotReviewed,
    UnderReview,
    Interviewing,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::NotReviewed => "not_reviewed",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Hired => "hired",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "rejected" => Some(ApplicationStatus::Rejected),
            "not_reviewed" => Some(ApplicationStatus::NotReviewed),
            "under_review" => Some(ApplicationStatus::UnderReview),
            "interviewing" => Some(ApplicationStatus::Interviewing),
            "hired" => Some(ApplicationStatus::Hired),
            _ => None,
        }
    }

    /// hired > interviewing > under_review > not_reviewed > rejected
    pub fn priority(&self) -> u8 {
        match self {
            ApplicationStatus::Hired => 5,
            ApplicationStatus::Interviewing => 4,
            ApplicationStatus::UnderReview => 3,
            ApplicationStatus::NotReviewed => 2,
            ApplicationStatus::Rejected => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_priority_is_a_total_order() {
        let all = [
            ApplicationStatus::Hired,
            ApplicationStatus::Interviewing,
            ApplicationStatus::UnderReview,
            ApplicationStatus::NotReviewed,
            ApplicationStatus::Rejected,
        ];
        let mut priorities: Vec<u8> = all.iter().map(|s| s.priority()).collect();
        priorities.sort_unstable();
        priorities.dedup();
        assert_eq!(priorities.len(), all.len());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for raw in ["hired", "interviewing", "under_review", "not_reviewed", "rejected"] {
            let parsed = ApplicationStatus::parse(raw).expect("known status");
            assert_eq!(parsed.as_str(), raw);
        }
        assert!(ApplicationStatus::parse("archived").is_none());
    }
}
