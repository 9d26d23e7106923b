use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use std::collections::BTreeSet;

use vacancy_harvest::data_models::{JobLevel, Salary, VacancyRecord};
use vacancy_harvest::filters::{FilterCriteria, FilterEngine};

mod test_helpers {
    use super::*;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    pub fn minsk() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    pub fn create_record(title: &str) -> VacancyRecord {
        VacancyRecord {
            title: title.to_string(),
            company: "Acme".to_string(),
            url: format!("https://rabota.by/vacancy/{title}"),
            salary: Salary {
                lower_bound: None,
                upper_bound: None,
                currency: "BYN".to_string(),
                gross: false,
            },
            experience: String::new(),
            employment: "Полная занятость".to_string(),
            work_format: "Полный день".to_string(),
            required_skills: BTreeSet::new(),
            region: "Минск".to_string(),
            published_at: now().with_timezone(&minsk()),
            level: JobLevel::Unspecified,
        }
    }

    pub fn with_salary(mut record: VacancyRecord, from: Option<f64>, to: Option<f64>) -> VacancyRecord {
        record.salary.lower_bound = from;
        record.salary.upper_bound = to;
        record
    }

    pub fn with_skills(mut record: VacancyRecord, skills: &[&str]) -> VacancyRecord {
        record.required_skills = skills.iter().map(|s| s.to_string()).collect();
        record
    }

    pub fn titles(records: &[VacancyRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    /// A small master list covering every criterion.
    pub fn master_list() -> Vec<VacancyRecord> {
        let mut junior = with_salary(create_record("junior"), Some(800.0), Some(1200.0));
        junior.level = JobLevel::Junior;
        junior.work_format = "Удалённая работа".to_string();
        junior = with_skills(junior, &["Python", "SQL"]);

        let mut middle = with_salary(create_record("middle"), Some(2000.0), None);
        middle.level = JobLevel::Middle;
        middle.region = "Гомель".to_string();
        middle = with_skills(middle, &["Python", "Go"]);

        let mut senior = with_salary(create_record("senior"), None, Some(5000.0));
        senior.level = JobLevel::Senior;
        senior.work_format = "Сменный график".to_string();
        senior.published_at = (now() - Duration::days(20)).with_timezone(&minsk());

        let mut unknown = create_record("unknown");
        unknown.work_format = "Remote".to_string();
        unknown = with_skills(unknown, &["Python"]);

        vec![junior, middle, senior, unknown]
    }
}

use test_helpers::*;

#[test]
fn test_empty_input_stays_empty() {
    let criteria = FilterCriteria::new().with_level(JobLevel::Junior).with_region("Минск");
    assert!(FilterEngine::apply_at(&[], &criteria, now()).is_empty());
    assert!(FilterEngine::apply_at(&[], &FilterCriteria::new(), now()).is_empty());
}

#[test]
fn test_no_criteria_returns_everything_in_order() {
    let master = master_list();
    let result = FilterEngine::apply_at(&master, &FilterCriteria::new(), now());
    assert_eq!(result, master);
}

#[test]
fn test_level_is_exact() {
    let master = master_list();
    let criteria = FilterCriteria::new().with_level(JobLevel::Middle);
    assert_eq!(titles(&FilterEngine::apply_at(&master, &criteria, now())), vec!["middle"]);
}

#[test]
fn test_salary_from_excludes_missing_bound() {
    let master = master_list();
    let criteria = FilterCriteria::new().with_salary_from(800.0);
    assert_eq!(
        titles(&FilterEngine::apply_at(&master, &criteria, now())),
        vec!["junior", "middle"]
    );

    let criteria = FilterCriteria::new().with_salary_from(1000.0);
    assert_eq!(titles(&FilterEngine::apply_at(&master, &criteria, now())), vec!["middle"]);
}

#[test]
fn test_salary_to_excludes_missing_bound() {
    let master = master_list();
    let criteria = FilterCriteria::new().with_salary_to(5000.0);
    assert_eq!(
        titles(&FilterEngine::apply_at(&master, &criteria, now())),
        vec!["junior", "senior"]
    );

    let criteria = FilterCriteria::new().with_salary_from(500.0).with_salary_to(1500.0);
    assert_eq!(titles(&FilterEngine::apply_at(&master, &criteria, now())), vec!["junior"]);
}

#[test]
fn test_work_format_aliasing() {
    let master = master_list();

    let remote = FilterCriteria::new().with_work_format("Remote work");
    assert_eq!(
        titles(&FilterEngine::apply_at(&master, &remote, now())),
        vec!["junior", "unknown"]
    );

    let shift = FilterCriteria::new().with_work_format("Shift schedule");
    assert_eq!(titles(&FilterEngine::apply_at(&master, &shift, now())), vec!["senior"]);

    let full_day = FilterCriteria::new().with_work_format("Полный день");
    assert_eq!(titles(&FilterEngine::apply_at(&master, &full_day, now())), vec!["middle"]);
}

#[test]
fn test_unknown_work_format_matches_nothing() {
    let master = master_list();
    let criteria = FilterCriteria::new().with_work_format("Hybrid");
    assert!(FilterEngine::apply_at(&master, &criteria, now()).is_empty());
}

#[test]
fn test_region_is_exact() {
    let master = master_list();
    let criteria = FilterCriteria::new().with_region("Гомель");
    assert_eq!(titles(&FilterEngine::apply_at(&master, &criteria, now())), vec!["middle"]);

    let criteria = FilterCriteria::new().with_region("минск");
    assert!(FilterEngine::apply_at(&master, &criteria, now()).is_empty());
}

#[test]
fn test_skills_require_every_requested_skill() {
    let record = with_skills(create_record("data"), &["Python", "SQL"]);
    let master = vec![record];

    let python = FilterCriteria::new().with_skills(["Python"]);
    assert_eq!(FilterEngine::apply_at(&master, &python, now()).len(), 1);

    let both = FilterCriteria::new().with_skills(["Python", "SQL"]);
    assert_eq!(FilterEngine::apply_at(&master, &both, now()).len(), 1);

    let python_go = FilterCriteria::new().with_skills(["Python", "Go"]);
    assert!(FilterEngine::apply_at(&master, &python_go, now()).is_empty());
}

#[test]
fn test_recency_window_boundaries() {
    let days = 7;
    let mut old = create_record("old");
    old.published_at = (now() - Duration::days(days + 1)).with_timezone(&minsk());
    let mut fresh = create_record("fresh");
    fresh.published_at = (now() - Duration::days(days - 1)).with_timezone(&minsk());
    let mut exact = create_record("exact");
    exact.published_at = (now() - Duration::days(days)).with_timezone(&minsk());

    let master = vec![old, fresh, exact];
    let criteria = FilterCriteria::new().with_published_within_days(days as u32);
    assert_eq!(titles(&FilterEngine::apply_at(&master, &criteria, now())), vec!["fresh"]);
}

#[test]
fn test_recency_compares_across_offsets() {
    let mut record = create_record("offset");
    // 5 days and 1 hour ago in UTC, expressed in a +05:00 offset
    let plus_five = FixedOffset::east_opt(5 * 3600).unwrap();
    record.published_at = (now() - Duration::days(5) - Duration::hours(1)).with_timezone(&plus_five);

    let master = vec![record];
    let five = FilterCriteria::new().with_published_within_days(5);
    assert!(FilterEngine::apply_at(&master, &five, now()).is_empty());
    let six = FilterCriteria::new().with_published_within_days(6);
    assert_eq!(FilterEngine::apply_at(&master, &six, now()).len(), 1);
}

#[test]
fn test_recency_with_huge_window_keeps_everything() {
    let master = master_list();
    let criteria = FilterCriteria::new().with_published_within_days(u32::MAX);

    assert!(FilterEngine::apply(&[], &criteria).is_empty());
    assert_eq!(FilterEngine::apply_at(&master, &criteria, now()), master);
    assert_eq!(FilterEngine::apply(&master, &criteria), master);
}

#[test]
fn test_apply_is_idempotent() {
    let master = master_list();
    let criteria = FilterCriteria::new()
        .with_skills(["Python"])
        .with_salary_from(500.0);
    let once = FilterEngine::apply_at(&master, &criteria, now());
    let twice = FilterEngine::apply_at(&once, &criteria, now());
    assert_eq!(once, twice);
    assert_eq!(titles(&once), vec!["junior", "middle"]);
}

#[test]
fn test_criteria_compose_in_any_order() {
    let master = master_list();
    let a = FilterCriteria::new().with_skills(["Python"]);
    let b = FilterCriteria::new().with_region("Минск");
    let both = FilterCriteria::new().with_skills(["Python"]).with_region("Минск");

    let a_then_b = FilterEngine::apply_at(&FilterEngine::apply_at(&master, &a, now()), &b, now());
    let b_then_a = FilterEngine::apply_at(&FilterEngine::apply_at(&master, &b, now()), &a, now());
    let together = FilterEngine::apply_at(&master, &both, now());

    assert_eq!(a_then_b, together);
    assert_eq!(b_then_a, together);
    assert_eq!(titles(&together), vec!["junior", "unknown"]);
}

#[test]
fn test_master_list_is_untouched() {
    let master = master_list();
    let snapshot = master.clone();
    let criteria = FilterCriteria::new().with_level(JobLevel::Senior);
    let _ = FilterEngine::apply_at(&master, &criteria, now());
    assert_eq!(master, snapshot);
}

#[test]
fn test_reset_criteria_restores_full_list() {
    let master = master_list();
    let mut criteria = FilterCriteria::new()
        .with_level(JobLevel::Junior)
        .with_published_within_days(1);
    assert_eq!(FilterEngine::apply_at(&master, &criteria, now()).len(), 1);

    criteria.level = None;
    assert_eq!(FilterEngine::apply_at(&master, &criteria, now()).len(), 3);

    criteria.reset();
    assert_eq!(FilterEngine::apply_at(&master, &criteria, now()).len(), 4);
}
