use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AgentMessagePayload {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTurnResponse {
    pub session_id: Uuid,
    pub reply: String,
    pub draft: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSessionResponse {
    pub session_id: Uuid,
    pub draft: JsonValue,
}
