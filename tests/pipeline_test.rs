use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use hackhyre_backend::models::application::Application;
use hackhyre_backend::services::compare_service::{classify_skill_overlap, SkillOverlap};
use hackhyre_backend::services::pipeline_service::{assemble_candidates, group_by_candidate};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, day, 9, 30, 0).unwrap()
}

fn application(
    email: &str,
    name: &str,
    job_id: Uuid,
    candidate_id: Option<Uuid>,
    score: Option<f64>,
    status: &str,
    created_at: DateTime<Utc>,
) -> Application {
    Application {
        id: Uuid::new_v4(),
        job_id,
        candidate_id,
        candidate_name: name.to_string(),
        candidate_email: email.to_string(),
        note: None,
        status: status.to_string(),
        relevance_score: score,
        created_at,
        updated_at: created_at,
    }
}

#[test]
fn pipeline_aggregates_one_entry_per_identity() {
    let job_a = Uuid::new_v4();
    let job_b = Uuid::new_v4();
    let mut job_titles = HashMap::new();
    job_titles.insert(job_a, "Platform Engineer".to_string());
    job_titles.insert(job_b, "Data Engineer".to_string());

    // newest first, the ordering contract of the application store; the
    // same person shows up as a guest and with a registered account
    let account = Uuid::new_v4();
    let applications = vec![
        application("mia@example.com", "Mia", job_b, Some(account), Some(0.9), "interviewing", at(5)),
        application("rui@example.com", "Rui", job_b, None, Some(0.4), "under_review", at(4)),
        application("MIA@example.com", "Mia (guest)", job_a, None, Some(0.6), "under_review", at(1)),
    ];

    let groups = group_by_candidate(applications);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["mia@example.com"].len(), 2);

    let candidates = assemble_candidates(groups, &job_titles, &HashMap::new(), &HashMap::new());
    assert_eq!(candidates.len(), 2);

    let mia = candidates
        .iter()
        .find(|c| c.email.eq_ignore_ascii_case("mia@example.com"))
        .expect("merged entry");
    assert_eq!(mia.best_match_score, 0.9);
    assert_eq!(mia.best_status, "interviewing");
    assert_eq!(mia.application_count, 2);
    assert_eq!(mia.job_title, "Data Engineer");
    assert_eq!(mia.latest_application_at, at(5));
}

#[test]
fn output_order_is_non_increasing_in_score() {
    let job = Uuid::new_v4();
    let mut job_titles = HashMap::new();
    job_titles.insert(job, "Any".to_string());

    let applications = vec![
        application("a@x.com", "A", job, None, Some(0.31), "not_reviewed", at(9)),
        application("b@x.com", "B", job, None, None, "not_reviewed", at(8)),
        application("c@x.com", "C", job, None, Some(0.77), "not_reviewed", at(7)),
        application("d@x.com", "D", job, None, Some(0.05), "not_reviewed", at(6)),
        application("e@x.com", "E", job, None, Some(1.0), "not_reviewed", at(5)),
    ];

    let groups = group_by_candidate(applications);
    let candidates = assemble_candidates(groups, &job_titles, &HashMap::new(), &HashMap::new());

    assert_eq!(candidates.len(), 5);
    for pair in candidates.windows(2) {
        assert!(pair[0].best_match_score >= pair[1].best_match_score);
    }
    for candidate in &candidates {
        assert!((0.0..=1.0).contains(&candidate.best_match_score));
    }
}

#[test]
fn unscored_candidates_sort_to_the_bottom_with_zero() {
    let job = Uuid::new_v4();
    let applications = vec![
        application("scored@x.com", "S", job, None, Some(0.2), "not_reviewed", at(2)),
        application("pending@x.com", "P", job, None, None, "not_reviewed", at(1)),
    ];

    let groups = group_by_candidate(applications);
    let candidates = assemble_candidates(groups, &HashMap::new(), &HashMap::new(), &HashMap::new());

    assert_eq!(candidates.last().unwrap().email, "pending@x.com");
    assert_eq!(candidates.last().unwrap().best_match_score, 0.0);
}

#[test]
fn comparison_worked_example() {
    // three candidates: [React, Node], [React, Go], [React]
    let skill_lists = vec![
        vec!["React".to_string(), "Node".to_string()],
        vec!["React".to_string(), "Go".to_string()],
        vec!["React".to_string()],
    ];

    let overlap = classify_skill_overlap(&skill_lists);

    assert_eq!(overlap["react"], SkillOverlap::Shared);
    assert_eq!(overlap["node"], SkillOverlap::Unique);
    assert_eq!(overlap["go"], SkillOverlap::Unique);
    assert_eq!(overlap.len(), 3);
}
