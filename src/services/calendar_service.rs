use crate::config::get_config;
use crate::dto::calendar_dto::{ConnectCalendarPayload, ScheduleInterviewPayload};
use crate::error::{Error, Result};
use crate::models::calendar::{CalendarAccount, Interview};
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "recruiter_id, provider, access_token, refresh_token, expires_at, \
     created_at, updated_at";

/// Access tokens are refreshed this many seconds before their recorded
/// expiry so an in-flight event creation never races the deadline.
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

#[derive(Clone)]
pub struct CalendarService {
    pool: PgPool,
    client: Client,
}

impl CalendarService {
    pub fn new(pool: PgPool, client: Client) -> Self {
        Self { pool, client }
    }

    pub async fn connect(
        &self,
        recruiter_id: Uuid,
        payload: ConnectCalendarPayload,
    ) -> Result<CalendarAccount> {
        let provider = payload.provider.unwrap_or_else(|| "google".to_string());
        let expires_at = Utc::now() + ChronoDuration::seconds(payload.expires_in);

        let account = sqlx::query_as::<_, CalendarAccount>(&format!(
            r#"
            INSERT INTO calendar_accounts (recruiter_id, provider, access_token, refresh_token, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (recruiter_id) DO UPDATE SET
                provider = EXCLUDED.provider,
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(recruiter_id)
        .bind(provider)
        .bind(payload.access_token)
        .bind(payload.refresh_token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn get_account(&self, recruiter_id: Uuid) -> Result<Option<CalendarAccount>> {
        let account = sqlx::query_as::<_, CalendarAccount>(&format!(
            "SELECT {} FROM calendar_accounts WHERE recruiter_id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    /// A currently valid access token for the account, refreshing against
    /// the provider's token endpoint when the stored one is about to
    /// expire.
    async fn ensure_access_token(&self, account: &CalendarAccount) -> Result<String> {
        let deadline = account.expires_at - ChronoDuration::seconds(EXPIRY_SKEW_SECONDS);
        if Utc::now() < deadline {
            return Ok(account.access_token.clone());
        }

        let config = get_config();
        let (Some(token_url), Some(client_id), Some(client_secret)) = (
            config.calendar_token_url.as_deref(),
            config.calendar_client_id.as_deref(),
            config.calendar_client_secret.as_deref(),
        ) else {
            return Err(Error::Config(
                "Calendar token refresh is not configured".to_string(),
            ));
        };
        let token_url = url::Url::parse(token_url)
            .map_err(|e| Error::Config(format!("Invalid CALENDAR_TOKEN_URL: {}", e)))?;

        tracing::info!(recruiter_id = %account.recruiter_id, "refreshing calendar access token");
        let response = self
            .client
            .post(token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", account.refresh_token.as_str()),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Token refresh failed {}: {}", status, text).into());
        }

        let token: TokenResponse = response.json().await?;
        let expires_at = Utc::now() + ChronoDuration::seconds(token.expires_in);
        let refresh_token = token
            .refresh_token
            .unwrap_or_else(|| account.refresh_token.clone());

        sqlx::query(
            "UPDATE calendar_accounts SET access_token = $2, refresh_token = $3, \
             expires_at = $4, updated_at = NOW() WHERE recruiter_id = $1",
        )
        .bind(account.recruiter_id)
        .bind(&token.access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(token.access_token)
    }

    /// Schedule an interview for an application. The interview row is
    /// persisted regardless; the remote calendar event is best-effort and
    /// its absence is logged, not surfaced.
    pub async fn schedule_interview(
        &self,
        recruiter_id: Uuid,
        event_title: String,
        payload: ScheduleInterviewPayload,
    ) -> Result<Interview> {
        let duration_minutes = payload.duration_minutes.unwrap_or(45);

        let mut calendar_event_id = None;
        match self.get_account(recruiter_id).await? {
            Some(account) => match self.ensure_access_token(&account).await {
                Ok(token) => {
                    calendar_event_id = self
                        .create_event(&token, &event_title, &payload, duration_minutes)
                        .await;
                }
                Err(e) => {
                    tracing::warn!(recruiter_id = %recruiter_id, error = ?e,
                        "calendar token refresh failed, scheduling without event");
                }
            },
            None => {
                tracing::info!(recruiter_id = %recruiter_id,
                    "no calendar account connected, scheduling without event");
            }
        }

        let interview = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews
                (application_id, recruiter_id, scheduled_at, duration_minutes, calendar_event_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, application_id, recruiter_id, scheduled_at, duration_minutes,
                      calendar_event_id, created_at
            "#,
        )
        .bind(payload.application_id)
        .bind(recruiter_id)
        .bind(payload.scheduled_at)
        .bind(duration_minutes)
        .bind(calendar_event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(interview)
    }

    async fn create_event(
        &self,
        access_token: &str,
        title: &str,
        payload: &ScheduleInterviewPayload,
        duration_minutes: i32,
    ) -> Option<String> {
        let config = get_config();
        let base = config.calendar_api_base.as_deref()?;

        let end = payload.scheduled_at + ChronoDuration::minutes(duration_minutes.into());
        let body = serde_json::json!({
            "summary": title,
            "start": { "dateTime": payload.scheduled_at.to_rfc3339() },
            "end": { "dateTime": end.to_rfc3339() },
        });

        let url = format!("{}/calendars/primary/events", base.trim_end_matches('/'));
        match self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from)),
            Ok(response) => {
                tracing::warn!(status = %response.status(), "calendar event creation rejected");
                None
            }
            Err(e) => {
                tracing::warn!(error = ?e, "calendar event creation failed");
                None
            }
        }
    }
}
