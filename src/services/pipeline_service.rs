use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::pipeline_dto::PipelineCandidate;
use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::profile::Profile;
use crate::models::user::User;
use crate::services::application_service::ApplicationService;
use crate::services::job_service::JobService;
use crate::services::profile_service::ProfileService;
use crate::services::user_service::UserService;

/// Reduce a collection of statuses to the single highest-priority one.
/// An empty collection falls back to `not_reviewed`.
pub fn best_status<I>(statuses: I) -> ApplicationStatus
where
    I: IntoIterator<Item = ApplicationStatus>,
{
    statuses
        .into_iter()
        .max_by_key(|status| status.priority())
        .unwrap_or(ApplicationStatus::NotReviewed)
}

/// Partition applications by candidate identity (lower-cased email).
/// Relative order inside each group follows the input, which arrives
/// newest-first from the store. Guest and registered submissions sharing
/// an email land in the same group; account ids play no part in the merge.
pub fn group_by_candidate(applications: Vec<Application>) -> HashMap<String, Vec<Application>> {
    let mut groups: HashMap<String, Vec<Application>> = HashMap::new();
    for application in applications {
        groups
            .entry(application.identity_key())
            .or_default()
            .push(application);
    }
    groups
}

#[derive(Debug)]
pub struct BestMatch<'a> {
    /// Maximum non-null relevance score in the group, floored at 0.0 when
    /// nothing is scored yet so the downstream sort stays total.
    pub best_score: f64,
    pub best_application: &'a Application,
    pub best_status: ApplicationStatus,
    pub latest_application_at: DateTime<Utc>,
}

/// Collapse one candidate's applications into their best-match view.
/// Returns `None` only for an empty group, which the grouper never
/// produces.
pub fn reduce_best_match(group: &[Application]) -> Option<BestMatch<'_>> {
    let first = group.first()?;

    let mut best: Option<(f64, &Application)> = None;
    for application in group {
        if let Some(score) = application.relevance_score {
            match best {
                Some((current, _)) if score <= current => {}
                _ => best = Some((score, application)),
            }
        }
    }
    let (best_score, best_application) = best.unwrap_or((0.0, first));

    let latest_application_at = group
        .iter()
        .map(|application| application.created_at)
        .max()
        .unwrap_or(first.created_at);

    Some(BestMatch {
        best_score,
        best_application,
        best_status: best_status(group.iter().map(|a| a.parsed_status())),
        latest_application_at,
    })
}

/// Merge grouped applications with user/profile lookups into display
/// records, sorted by best match score descending. Tie order is
/// unspecified. Profile-derived fields stay empty for guests and for
/// registered candidates without a profile row.
pub fn assemble_candidates(
    groups: HashMap<String, Vec<Application>>,
    job_titles: &HashMap<Uuid, String>,
    users: &HashMap<Uuid, User>,
    profiles: &HashMap<Uuid, Profile>,
) -> Vec<PipelineCandidate> {
    let mut candidates: Vec<PipelineCandidate> = Vec::with_capacity(groups.len());

    for group in groups.values() {
        let Some(reduced) = reduce_best_match(group) else {
            continue;
        };

        let account = group
            .iter()
            .find_map(|application| application.candidate_id)
            .and_then(|id| users.get(&id));
        let profile = account.and_then(|user| profiles.get(&user.id));

        let name = account
            .map(|user| user.name.clone())
            .unwrap_or_else(|| reduced.best_application.candidate_name.clone());

        candidates.push(PipelineCandidate {
            application_id: reduced.best_application.id,
            name,
            email: reduced.best_application.candidate_email.clone(),
            registered: account.is_some(),
            headline: profile.and_then(|p| p.headline.clone()),
            location: profile.and_then(|p| p.location.clone()),
            experience_years: profile.and_then(|p| p.experience_years),
            skills: profile.map(|p| p.skills.clone()).unwrap_or_default(),
            best_match_score: reduced.best_score,
            application_count: group.len(),
            best_status: reduced.best_status.as_str().to_string(),
            job_title: job_titles
                .get(&reduced.best_application.job_id)
                .cloned()
                .unwrap_or_default(),
            latest_application_at: reduced.latest_application_at,
        });
    }

    candidates.sort_by(|a, b| {
        b.best_match_score
            .partial_cmp(&a.best_match_score)
            .unwrap_or(Ordering::Equal)
    });

    candidates
}

#[derive(Clone)]
pub struct PipelineService {
    jobs: JobService,
    applications: ApplicationService,
    users: UserService,
    profiles: ProfileService,
}

impl PipelineService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            jobs: JobService::new(pool.clone()),
            applications: ApplicationService::new(pool.clone()),
            users: UserService::new(pool.clone()),
            profiles: ProfileService::new(pool),
        }
    }

    /// The recruiter's aggregated candidate pipeline across all of their
    /// jobs. Authorization is a precondition handled here by only loading
    /// applications for jobs the recruiter owns.
    pub async fn list_candidates(&self, recruiter_id: Uuid) -> Result<Vec<PipelineCandidate>> {
        let jobs = self.jobs.list_owned(recruiter_id).await?;
        let job_ids: Vec<Uuid> = jobs.iter().map(|job| job.id).collect();
        let job_titles: HashMap<Uuid, String> = jobs
            .into_iter()
            .map(|job| (job.id, job.title))
            .collect();

        let applications = self.applications.list_for_jobs(&job_ids).await?;

        let mut account_ids: Vec<Uuid> = applications
            .iter()
            .filter_map(|application| application.candidate_id)
            .collect();
        account_ids.sort_unstable();
        account_ids.dedup();

        let users: HashMap<Uuid, User> = self
            .users
            .get_many(&account_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();
        let profiles: HashMap<Uuid, Profile> = self
            .profiles
            .get_many(&account_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.user_id, profile))
            .collect();

        let groups = group_by_candidate(applications);
        Ok(assemble_candidates(groups, &job_titles, &users, &profiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(
        email: &str,
        job_id: Uuid,
        score: Option<f64>,
        status: &str,
        created_at: DateTime<Utc>,
    ) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id,
            candidate_id: None,
            candidate_name: "Someone".to_string(),
            candidate_email: email.to_string(),
            note: None,
            status: status.to_string(),
            relevance_score: score,
            created_at,
            updated_at: created_at,
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        use chrono::TimeZone;
        Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn grouping_is_case_insensitive_and_order_preserving() {
        let job = Uuid::new_v4();
        let apps = vec![
            application("A@x.com", job, Some(0.4), "not_reviewed", at(5)),
            application("b@y.com", job, None, "not_reviewed", at(4)),
            application("a@x.com", job, Some(0.2), "not_reviewed", at(3)),
        ];
        let first_id = apps[0].id;
        let third_id = apps[2].id;

        let groups = group_by_candidate(apps);
        assert_eq!(groups.len(), 2);
        let merged = &groups["a@x.com"];
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, first_id);
        assert_eq!(merged[1].id, third_id);
    }

    #[test]
    fn reducer_picks_max_score_and_latest_date() {
        let apps = vec![
            application("a@x.com", Uuid::new_v4(), Some(0.9), "interviewing", at(5)),
            application("a@x.com", Uuid::new_v4(), Some(0.6), "under_review", at(1)),
        ];
        let reduced = reduce_best_match(&apps).unwrap();
        assert_eq!(reduced.best_score, 0.9);
        assert_eq!(reduced.best_application.id, apps[0].id);
        assert_eq!(reduced.best_status, ApplicationStatus::Interviewing);
        assert_eq!(reduced.latest_application_at, at(5));
    }

    #[test]
    fn reducer_floors_unscored_groups_at_zero() {
        let apps = vec![
            application("a@x.com", Uuid::new_v4(), None, "not_reviewed", at(2)),
            application("a@x.com", Uuid::new_v4(), None, "rejected", at(1)),
        ];
        let reduced = reduce_best_match(&apps).unwrap();
        assert_eq!(reduced.best_score, 0.0);
        // falls back to the first (most recent) application
        assert_eq!(reduced.best_application.id, apps[0].id);
    }

    #[test]
    fn best_status_prefers_highest_priority_present() {
        let statuses = vec![ApplicationStatus::Rejected, ApplicationStatus::Interviewing];
        assert_eq!(best_status(statuses), ApplicationStatus::Interviewing);

        // a group containing only rejected applications stays rejected
        let statuses = vec![ApplicationStatus::Rejected, ApplicationStatus::Rejected];
        assert_eq!(best_status(statuses), ApplicationStatus::Rejected);

        assert_eq!(best_status(Vec::new()), ApplicationStatus::NotReviewed);
    }

    #[test]
    fn assembled_list_is_sorted_by_score_descending() {
        let job = Uuid::new_v4();
        let mut job_titles = HashMap::new();
        job_titles.insert(job, "Backend Engineer".to_string());

        let apps = vec![
            application("low@x.com", job, Some(0.2), "not_reviewed", at(3)),
            application("none@x.com", job, None, "not_reviewed", at(2)),
            application("high@x.com", job, Some(0.8), "not_reviewed", at(1)),
        ];
        let groups = group_by_candidate(apps);
        let candidates =
            assemble_candidates(groups, &job_titles, &HashMap::new(), &HashMap::new());

        assert_eq!(candidates.len(), 3);
        for pair in candidates.windows(2) {
            assert!(pair[0].best_match_score >= pair[1].best_match_score);
        }
        assert_eq!(candidates[2].best_match_score, 0.0);
        assert_eq!(candidates[0].job_title, "Backend Engineer");
    }

    #[test]
    fn guest_entries_never_fabricate_profile_fields() {
        let job = Uuid::new_v4();
        let apps = vec![application("guest@x.com", job, Some(0.5), "not_reviewed", at(1))];
        let groups = group_by_candidate(apps);
        let candidates =
            assemble_candidates(groups, &HashMap::new(), &HashMap::new(), &HashMap::new());

        let entry = &candidates[0];
        assert!(!entry.registered);
        assert_eq!(entry.headline, None);
        assert_eq!(entry.location, None);
        assert_eq!(entry.experience_years, None);
        assert!(entry.skills.is_empty());
        assert_eq!(entry.name, "Someone");
    }

    #[test]
    fn worked_example_from_two_jobs() {
        let job1 = Uuid::new_v4();
        let job2 = Uuid::new_v4();
        let mut job_titles = HashMap::new();
        job_titles.insert(job1, "Job One".to_string());
        job_titles.insert(job2, "Job Two".to_string());

        // newest first, matching the store's ordering contract
        let app2 = application("a@x.com", job2, Some(0.9), "interviewing", at(5));
        let app1 = application("a@x.com", job1, Some(0.6), "under_review", at(1));
        let app2_id = app2.id;

        let groups = group_by_candidate(vec![app2, app1]);
        let candidates =
            assemble_candidates(groups, &job_titles, &HashMap::new(), &HashMap::new());

        assert_eq!(candidates.len(), 1);
        let entry = &candidates[0];
        assert_eq!(entry.application_id, app2_id);
        assert_eq!(entry.best_match_score, 0.9);
        assert_eq!(entry.best_status, "interviewing");
        assert_eq!(entry.application_count, 2);
        assert_eq!(entry.latest_application_at, at(5));
        assert_eq!(entry.job_title, "Job Two");
    }
}
