use crate::error::Result;
use crate::models::application::Application;
use crate::models::job::Job;
use crate::models::profile::Profile;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// One fit assessment as returned by the model: an integer percentage
/// plus short qualitative lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitAssessment {
    pub match_score: i32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTurn {
    pub reply: String,
    pub draft: JsonValue,
}

#[derive(Clone)]
pub struct AiService {
    client: Client,
    api_key: String,
}

impl AiService {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }

    /// Score how well a candidate matches a job. Called at most once per
    /// application (submission-time scoring) and once per (application,
    /// recruiter) pair (relevance reviews); idempotence is enforced by the
    /// callers' storage layer, not here.
    pub async fn score_fit(
        &self,
        candidate_summary: &str,
        job_summary: &str,
    ) -> Result<FitAssessment> {
        let system_prompt = r#"You are a rigorous technical recruiter evaluating candidate/job fit.
Score strictly: a fundamentally different professional background means a very low score.

Return a JSON object:
{
  "match_score": <integer 0-100>,
  "strengths": [<up to 5 short strings>],
  "gaps": [<up to 5 short strings>],
  "recommendation": "<one or two sentences>"
}"#;

        let user_content = format!(
            "Candidate:\n{}\n\nJob:\n{}",
            candidate_summary, job_summary
        );

        let payload = serde_json::json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_content}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.2
        });

        let resp = self.chat_completion(payload).await?;
        let mut assessment: FitAssessment = serde_json::from_value(resp)?;
        assessment.match_score = assessment.match_score.clamp(0, 100);
        assessment.strengths.truncate(5);
        assessment.gaps.truncate(5);
        Ok(assessment)
    }

    /// One turn of the job-creation agent: given the conversation so far
    /// and the current draft, produce a reply and the updated draft.
    pub async fn continue_job_draft(
        &self,
        history: &[(String, String)],
        draft: &JsonValue,
        user_message: &str,
    ) -> Result<AgentTurn> {
        let system_prompt = r#"You are a hiring assistant helping a recruiter draft a job listing through conversation.
Keep the draft consistent with everything the recruiter has said so far; ask for the most important missing detail next.

Return a JSON object:
{
  "reply": "<your next conversational message to the recruiter>",
  "draft": {
    "title": <string or null>,
    "company": <string or null>,
    "description": <string or null>,
    "skills": [<strings>],
    "location": <string or null>,
    "employment_type": <string or null>,
    "salary_min": <number or null>,
    "salary_max": <number or null>
  }
}
The draft must always be the complete current state, not a diff."#;

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": system_prompt
        })];
        messages.push(serde_json::json!({
            "role": "system",
            "content": format!("Current draft: {}", draft)
        }));
        for (role, content) in history {
            messages.push(serde_json::json!({ "role": role, "content": content }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": user_message }));

        let payload = serde_json::json!({
            "model": "gpt-4o",
            "messages": messages,
            "response_format": { "type": "json_object" },
            "temperature": 0.6
        });

        let resp = self.chat_completion(payload).await?;
        let turn: AgentTurn = serde_json::from_value(resp)?;
        Ok(turn)
    }

    async fn chat_completion(&self, payload: JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LLM API error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| anyhow::anyhow!("Invalid LLM response format").into())
    }
}

/// Plain-text candidate summary for scoring prompts. Profile data enriches
/// the summary when the applicant is registered; guests contribute only
/// what the application captured.
pub fn candidate_summary(application: &Application, profile: Option<&Profile>) -> String {
    let mut lines = vec![format!(
        "Name: {} ({})",
        application.candidate_name, application.candidate_email
    )];
    if let Some(note) = application.note.as_deref() {
        if !note.trim().is_empty() {
            lines.push(format!("Cover note: {}", note.trim()));
        }
    }
    if let Some(profile) = profile {
        if let Some(headline) = profile.headline.as_deref() {
            lines.push(format!("Headline: {}", headline));
        }
        if let Some(bio) = profile.bio.as_deref() {
            lines.push(format!("Bio: {}", bio));
        }
        if !profile.skills.is_empty() {
            lines.push(format!("Skills: {}", profile.skills.join(", ")));
        }
        if let Some(years) = profile.experience_years {
            lines.push(format!("Experience: {} years", years));
        }
        if let Some(location) = profile.location.as_deref() {
            lines.push(format!("Location: {}", location));
        }
    }
    lines.join("\n")
}

pub fn job_summary(job: &Job) -> String {
    let mut lines = vec![format!("Title: {} at {}", job.title, job.company)];
    if !job.skills.is_empty() {
        lines.push(format!("Required skills: {}", job.skills.join(", ")));
    }
    if let Some(location) = job.location.as_deref() {
        lines.push(format!("Location: {}", location));
    }
    if let Some(employment_type) = job.employment_type.as_deref() {
        lines.push(format!("Employment type: {}", employment_type));
    }
    if let Some(description) = job.description.as_deref() {
        lines.push(format!("Description:\n{}", description));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn guest_summary_omits_profile_lines() {
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            candidate_id: None,
            candidate_name: "Dana".to_string(),
            candidate_email: "dana@example.com".to_string(),
            note: Some("  ".to_string()),
            status: "not_reviewed".to_string(),
            relevance_score: None,
            created_at: now,
            updated_at: now,
        };
        let summary = candidate_summary(&application, None);
        assert!(summary.contains("dana@example.com"));
        assert!(!summary.contains("Skills:"));
        assert!(!summary.contains("Cover note:"));
    }

    #[test]
    fn fit_assessment_defaults_missing_lists() {
        let assessment: FitAssessment =
            serde_json::from_value(serde_json::json!({ "match_score": 87 })).unwrap();
        assert_eq!(assessment.match_score, 87);
        assert!(assessment.strengths.is_empty());
        assert!(assessment.gaps.is_empty());
    }
}
