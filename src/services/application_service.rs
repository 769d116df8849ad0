use crate::dto::application_dto::{ApplicationWithJob, ApplyPayload};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use sqlx::PgPool;
use uuid::Uuid;

const APPLICATION_COLUMNS: &str = "id, job_id, candidate_id, candidate_name, candidate_email, \
     note, status, relevance_score, created_at, updated_at";

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit an application to a job. The (job, lower-cased email) unique
    /// index is the enforcement point for the one-application-per-job
    /// invariant; a violation surfaces as 409.
    pub async fn apply(&self, job_id: Uuid, payload: ApplyPayload) -> Result<Application> {
        let result = sqlx::query_as::<_, Application>(&format!(
            r#"
            INSERT INTO applications (job_id, candidate_id, candidate_name, candidate_email, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .bind(payload.candidate_id)
        .bind(payload.name)
        .bind(payload.email)
        .bind(payload.note)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(application) => Ok(application),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                Error::Conflict("An application with this email already exists for this job".to_string()),
            ),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    /// The application only if it targets a non-deleted job owned by the
    /// given recruiter.
    pub async fn get_owned(&self, recruiter_id: Uuid, id: Uuid) -> Result<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT a.id, a.job_id, a.candidate_id, a.candidate_name, a.candidate_email,
                   a.note, a.status, a.relevance_score, a.created_at, a.updated_at
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.id = $1 AND j.recruiter_id = $2 AND j.deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        Ok(application)
    }

    /// Applications for a set of jobs, newest first. The caller is
    /// responsible for only passing job ids it is authorized to see.
    pub async fn list_for_jobs(&self, job_ids: &[Uuid]) -> Result<Vec<Application>> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }
        let applications = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE job_id = ANY($1) ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    pub async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE job_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    pub async fn list_for_email(&self, email: &str) -> Result<Vec<ApplicationWithJob>> {
        let applications = sqlx::query_as::<_, ApplicationWithJob>(
            r#"
            SELECT a.id, a.job_id, j.title AS job_title, j.company, a.status,
                   a.relevance_score, a.created_at
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE LOWER(a.candidate_email) = LOWER($1) AND j.deleted_at IS NULL
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    /// Recruiter status mutation, constrained to applications on the
    /// recruiter's own jobs.
    pub async fn update_status(
        &self,
        recruiter_id: Uuid,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications a
            SET status = $3, updated_at = NOW()
            FROM jobs j
            WHERE a.id = $1 AND j.id = a.job_id AND j.recruiter_id = $2 AND j.deleted_at IS NULL
            RETURNING a.id, a.job_id, a.candidate_id, a.candidate_name, a.candidate_email,
                      a.note, a.status, a.relevance_score, a.created_at, a.updated_at
            "#,
        )
        .bind(id)
        .bind(recruiter_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        Ok(application)
    }

    /// One-shot write of the asynchronous fit score. The guard keeps the
    /// first generated value: once set, the score is never overwritten.
    pub async fn set_relevance_score_once(&self, id: Uuid, score: f64) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE applications SET relevance_score = $2, updated_at = NOW() \
             WHERE id = $1 AND relevance_score IS NULL",
        )
        .bind(id)
        .bind(score.clamp(0.0, 1.0))
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
