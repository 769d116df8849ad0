use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::pipeline_dto::CompareCandidate;
use crate::error::{Error, Result};
use crate::models::profile::Profile;
use crate::models::user::User;
use crate::services::profile_service::ProfileService;
use crate::services::user_service::UserService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillOverlap {
    Shared,
    Partial,
    Unique,
}

/// Classify each distinct skill across the selected candidates:
/// listed by everyone → Shared, by exactly one → Unique, else Partial.
/// Matching is case-insensitive; the returned map is keyed by the
/// lower-cased form. Behavior is undefined for fewer than two lists;
/// callers guard that case.
pub fn classify_skill_overlap(skill_lists: &[Vec<String>]) -> HashMap<String, SkillOverlap> {
    let total = skill_lists.len();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for list in skill_lists {
        // a duplicate within one candidate's list still counts once
        let mut seen: HashSet<String> = HashSet::new();
        for skill in list {
            let key = skill.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            if seen.insert(key.clone()) {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    counts
        .into_iter()
        .map(|(skill, count)| {
            let classification = if count == total {
                SkillOverlap::Shared
            } else if count == 1 {
                SkillOverlap::Unique
            } else {
                SkillOverlap::Partial
            };
            (skill, classification)
        })
        .collect()
}

#[derive(Clone)]
pub struct CompareService {
    pool: PgPool,
    users: UserService,
    profiles: ProfileService,
}

impl CompareService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            profiles: ProfileService::new(pool.clone()),
            pool,
        }
    }

    /// Side-by-side comparison records for 2-4 selected applications, all
    /// of which must target jobs the recruiter owns.
    pub async fn compare(
        &self,
        recruiter_id: Uuid,
        application_ids: &[Uuid],
    ) -> Result<(Vec<CompareCandidate>, HashMap<String, SkillOverlap>)> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: Uuid,
            candidate_id: Option<Uuid>,
            candidate_name: String,
            candidate_email: String,
            relevance_score: Option<f64>,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT a.id, a.candidate_id, a.candidate_name, a.candidate_email, a.relevance_score
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.id = ANY($1) AND j.recruiter_id = $2 AND j.deleted_at IS NULL
            "#,
        )
        .bind(application_ids)
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.len() != application_ids.len() {
            return Err(Error::NotFound("Application not found".to_string()));
        }

        let account_ids: Vec<Uuid> = rows.iter().filter_map(|row| row.candidate_id).collect();
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

        // keep the caller's selection order
        let by_id: HashMap<Uuid, Row> = rows.into_iter().map(|row| (row.id, row)).collect();
        let mut candidates = Vec::with_capacity(application_ids.len());
        for id in application_ids {
            let Some(row) = by_id.get(id) else { continue };
            let account = row.candidate_id.and_then(|uid| users.get(&uid));
            let profile = account.and_then(|user| profiles.get(&user.id));
            candidates.push(CompareCandidate {
                application_id: row.id,
                name: account
                    .map(|user| user.name.clone())
                    .unwrap_or_else(|| row.candidate_name.clone()),
                email: row.candidate_email.clone(),
                headline: profile.and_then(|p| p.headline.clone()),
                experience_years: profile.and_then(|p| p.experience_years),
                skills: profile.map(|p| p.skills.clone()).unwrap_or_default(),
                relevance_score: row.relevance_score,
            });
        }

        let skill_lists: Vec<Vec<String>> = candidates
            .iter()
            .map(|candidate| candidate.skills.clone())
            .collect();
        let overlap = classify_skill_overlap(&skill_lists);

        Ok((candidates, overlap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|list| list.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn shared_unique_and_partial_classification() {
        let skill_lists = lists(&[
            &["React", "Node"],
            &["React", "Go"],
            &["React"],
        ]);
        let overlap = classify_skill_overlap(&skill_lists);

        assert_eq!(overlap["react"], SkillOverlap::Shared);
        assert_eq!(overlap["node"], SkillOverlap::Unique);
        assert_eq!(overlap["go"], SkillOverlap::Unique);
    }

    #[test]
    fn partial_requires_more_than_one_but_not_all() {
        let skill_lists = lists(&[
            &["Rust", "SQL"],
            &["Rust", "SQL"],
            &["Rust"],
        ]);
        let overlap = classify_skill_overlap(&skill_lists);

        assert_eq!(overlap["rust"], SkillOverlap::Shared);
        assert_eq!(overlap["sql"], SkillOverlap::Partial);
    }

    #[test]
    fn classification_is_case_insensitive() {
        let skill_lists = lists(&[&["React"], &["react"]]);
        let overlap = classify_skill_overlap(&skill_lists);

        assert_eq!(overlap.len(), 1);
        assert_eq!(overlap["react"], SkillOverlap::Shared);
    }

    #[test]
    fn duplicate_skills_within_one_candidate_count_once() {
        let skill_lists = lists(&[&["Go", "go", "GO"], &["Python"]]);
        let overlap = classify_skill_overlap(&skill_lists);

        assert_eq!(overlap["go"], SkillOverlap::Unique);
        assert_eq!(overlap["python"], SkillOverlap::Unique);
    }
}
