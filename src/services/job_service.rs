use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use sqlx::PgPool;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, recruiter_id, title, company, description, skills, location, \
     employment_type, salary_min, salary_max, status, deleted_at, created_at, updated_at";

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

pub struct JobList {
    pub items: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, recruiter_id: Uuid, payload: CreateJobPayload) -> Result<Job> {
        let status = match payload.status.as_deref() {
            Some(raw) => JobStatus::parse(raw)
                .ok_or_else(|| Error::BadRequest(format!("Unknown job status: {}", raw)))?,
            None => JobStatus::Draft,
        };

        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (
                recruiter_id, title, company, description, skills, location,
                employment_type, salary_min, salary_max, status
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(recruiter_id)
        .bind(payload.title)
        .bind(payload.company)
        .bind(payload.description)
        .bind(payload.skills)
        .bind(payload.location)
        .bind(payload.employment_type)
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn update(
        &self,
        recruiter_id: Uuid,
        id: Uuid,
        payload: UpdateJobPayload,
    ) -> Result<Job> {
        if let Some(raw) = payload.status.as_deref() {
            JobStatus::parse(raw)
                .ok_or_else(|| Error::BadRequest(format!("Unknown job status: {}", raw)))?;
        }

        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($3, title),
                company = COALESCE($4, company),
                description = COALESCE($5, description),
                skills = COALESCE($6, skills),
                location = COALESCE($7, location),
                employment_type = COALESCE($8, employment_type),
                salary_min = COALESCE($9, salary_min),
                salary_max = COALESCE($10, salary_max),
                status = COALESCE($11, status),
                updated_at = NOW()
            WHERE id = $1 AND recruiter_id = $2 AND deleted_at IS NULL
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(recruiter_id)
        .bind(payload.title)
        .bind(payload.company)
        .bind(payload.description)
        .bind(payload.skills)
        .bind(payload.location)
        .bind(payload.employment_type)
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        Ok(job)
    }

    pub async fn get_owned(&self, recruiter_id: Uuid, id: Uuid) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1 AND recruiter_id = $2 AND deleted_at IS NULL",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        Ok(job)
    }

    /// Every non-deleted job owned by the recruiter, newest first. This is
    /// the authorization boundary for pipeline aggregation: only job ids
    /// from this list ever reach the grouper.
    pub async fn list_owned(&self, recruiter_id: Uuid) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE recruiter_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC",
            JOB_COLUMNS
        ))
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    pub async fn soft_delete(&self, recruiter_id: Uuid, id: Uuid) -> Result<()> {
        let res = sqlx::query(
            "UPDATE jobs SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND recruiter_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(recruiter_id)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        Ok(())
    }

    pub async fn get_published(&self, id: Uuid) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1 AND status = 'published' AND deleted_at IS NULL",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        Ok(job)
    }

    pub async fn list_published(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut filters = vec!["status = 'published'".to_string(), "deleted_at IS NULL".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(search) = query.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!("(title ILIKE ${} OR company ILIKE ${})", first, second));
            args.push(format!("%{}%", search.clone()));
            args.push(format!("%{}%", search));
        }
        if let Some(location) = query.location {
            filters.push(format!("location ILIKE ${}", args.len() + 1));
            args.push(format!("%{}%", location));
        }
        if let Some(employment_type) = query.employment_type {
            filters.push(format!("employment_type = ${}", args.len() + 1));
            args.push(employment_type);
        }

        let where_clause = format!("WHERE {}", filters.join(" AND "));

        let items_query = format!(
            "SELECT {} FROM jobs {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            JOB_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );

        let total_query = format!("SELECT COUNT(*) FROM jobs {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, Job>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(per_page).bind(offset);
        let items = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i64;

        Ok(JobList {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }
}
