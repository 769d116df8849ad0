use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertProfilePayload {
    pub headline: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(range(min = 0, max = 60))]
    pub experience_years: Option<i32>,
    pub location: Option<String>,
}
