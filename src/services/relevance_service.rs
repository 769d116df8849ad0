use crate::error::Result;
use crate::models::relevance::RelevanceReview;
use crate::services::ai_service::FitAssessment;
use sqlx::PgPool;
use uuid::Uuid;

const REVIEW_COLUMNS: &str = "id, application_id, recruiter_id, match_score, strengths, gaps, \
     recommendation, created_at";

#[derive(Clone)]
pub struct RelevanceService {
    pool: PgPool,
}

impl RelevanceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        application_id: Uuid,
        recruiter_id: Uuid,
    ) -> Result<Option<RelevanceReview>> {
        let review = sqlx::query_as::<_, RelevanceReview>(&format!(
            "SELECT {} FROM relevance_reviews WHERE application_id = $1 AND recruiter_id = $2",
            REVIEW_COLUMNS
        ))
        .bind(application_id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    /// Persist a freshly generated assessment for the pair, or return the
    /// already-stored one. Concurrent generators race on the unique index:
    /// the losing insert is a no-op and both callers read back the same
    /// single row.
    pub async fn store(
        &self,
        application_id: Uuid,
        recruiter_id: Uuid,
        assessment: FitAssessment,
    ) -> Result<RelevanceReview> {
        let inserted = sqlx::query_as::<_, RelevanceReview>(&format!(
            r#"
            INSERT INTO relevance_reviews
                (application_id, recruiter_id, match_score, strengths, gaps, recommendation)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (application_id, recruiter_id) DO NOTHING
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(application_id)
        .bind(recruiter_id)
        .bind(assessment.match_score)
        .bind(assessment.strengths)
        .bind(assessment.gaps)
        .bind(assessment.recommendation)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(review) = inserted {
            return Ok(review);
        }

        tracing::info!(
            application_id = %application_id,
            recruiter_id = %recruiter_id,
            "relevance review already generated, returning stored record"
        );
        let existing = sqlx::query_as::<_, RelevanceReview>(&format!(
            "SELECT {} FROM relevance_reviews WHERE application_id = $1 AND recruiter_id = $2",
            REVIEW_COLUMNS
        ))
        .bind(application_id)
        .bind(recruiter_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(existing)
    }
}
