use crate::error::{Error, Result};
use crate::models::agent::{AgentMessage, AgentSession};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

const SESSION_COLUMNS: &str =
    "id, recruiter_id, draft, published_job_id, created_at, updated_at";

#[derive(Clone)]
pub struct AgentService {
    pool: PgPool,
}

impl AgentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_session(&self, recruiter_id: Uuid) -> Result<AgentSession> {
        let session = sqlx::query_as::<_, AgentSession>(&format!(
            "INSERT INTO agent_sessions (recruiter_id) VALUES ($1) RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(recruiter_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn get_session(&self, recruiter_id: Uuid, id: Uuid) -> Result<AgentSession> {
        let session = sqlx::query_as::<_, AgentSession>(&format!(
            "SELECT {} FROM agent_sessions WHERE id = $1 AND recruiter_id = $2",
            SESSION_COLUMNS
        ))
        .bind(id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Agent session not found".to_string()))?;
        Ok(session)
    }

    pub async fn list_messages(&self, session_id: Uuid) -> Result<Vec<AgentMessage>> {
        let messages = sqlx::query_as::<_, AgentMessage>(
            "SELECT id, session_id, role, content, created_at \
             FROM agent_messages WHERE session_id = $1 ORDER BY id",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    pub async fn append_message(
        &self,
        session_id: Uuid,
        role: &str,
        content: &str,
    ) -> Result<AgentMessage> {
        let message = sqlx::query_as::<_, AgentMessage>(
            "INSERT INTO agent_messages (session_id, role, content) VALUES ($1, $2, $3) \
             RETURNING id, session_id, role, content, created_at",
        )
        .bind(session_id)
        .bind(role)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(message)
    }

    pub async fn update_draft(&self, session_id: Uuid, draft: &JsonValue) -> Result<AgentSession> {
        let session = sqlx::query_as::<_, AgentSession>(&format!(
            "UPDATE agent_sessions SET draft = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(session_id)
        .bind(draft)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn mark_published(&self, session_id: Uuid, job_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE agent_sessions SET published_job_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(session_id)
        .bind(job_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
