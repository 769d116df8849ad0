use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConnectCalendarPayload {
    pub provider: Option<String>,
    #[validate(length(min = 1))]
    pub access_token: String,
    #[validate(length(min = 1))]
    pub refresh_token: String,
    /// Seconds until the access token expires, as reported by the
    /// provider's token response.
    #[validate(range(min = 1))]
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    pub application_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    #[validate(range(min = 15, max = 240))]
    pub duration_minutes: Option<i32>,
}
