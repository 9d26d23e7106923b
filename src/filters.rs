use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::data_models::{JobLevel, VacancyRecord};

/// Canonical work arrangements a caller can filter by. Source data carries
/// free text, so each format owns a list of lowercase substrings it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkFormat {
    FullDay,
    FlexibleSchedule,
    ShiftSchedule,
    RemoteWork,
    RotationMethod,
}

impl WorkFormat {
    pub const ALL: [WorkFormat; 5] = [
        WorkFormat::FullDay,
        WorkFormat::FlexibleSchedule,
        WorkFormat::ShiftSchedule,
        WorkFormat::RemoteWork,
        WorkFormat::RotationMethod,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            WorkFormat::FullDay => "Full day",
            WorkFormat::FlexibleSchedule => "Flexible schedule",
            WorkFormat::ShiftSchedule => "Shift schedule",
            WorkFormat::RemoteWork => "Remote work",
            WorkFormat::RotationMethod => "Rotation method",
        }
    }

    /// Name the API itself uses for the schedule.
    pub fn source_name(&self) -> &'static str {
        match self {
            WorkFormat::FullDay => "Полный день",
            WorkFormat::FlexibleSchedule => "Гибкий график",
            WorkFormat::ShiftSchedule => "Сменный график",
            WorkFormat::RemoteWork => "Удалённая работа",
            WorkFormat::RotationMethod => "Вахтовый метод",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            WorkFormat::FullDay => &[
                "full day",
                "full-time",
                "full employment",
                "полный день",
                "полная занятость",
            ],
            WorkFormat::FlexibleSchedule => &[
                "flexible schedule",
                "flexible",
                "гибкий график",
                "гибкое расписание",
            ],
            WorkFormat::ShiftSchedule => &[
                "shift schedule",
                "shifts",
                "shift",
                "сменный график",
                "смены",
            ],
            WorkFormat::RemoteWork => &[
                "remote work",
                "remote",
                "удалённая работа",
                "удаленная работа",
            ],
            WorkFormat::RotationMethod => &["rotation method", "rotation", "вахтовый метод", "вахта"],
        }
    }

    /// Looks up a canonical name, English or source spelling, ignoring case.
    pub fn from_canonical(name: &str) -> Option<WorkFormat> {
        let wanted = name.trim().to_lowercase();
        WorkFormat::ALL.into_iter().find(|format| {
            format.canonical_name().to_lowercase() == wanted
                || format.source_name().to_lowercase() == wanted
        })
    }

    pub fn matches(&self, work_format: &str) -> bool {
        let text = work_format.to_lowercase();
        self.aliases().iter().any(|alias| text.contains(alias))
    }
}

/// The caller's current filter selection. `None` means the criterion is off;
/// active criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub level: Option<JobLevel>,
    pub salary_from: Option<f64>,
    pub salary_to: Option<f64>,
    pub work_format: Option<String>,
    pub region: Option<String>,
    pub skills: Option<BTreeSet<String>>,
    pub published_within_days: Option<u32>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: JobLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_salary_from(mut self, from: f64) -> Self {
        self.salary_from = Some(from);
        self
    }

    pub fn with_salary_to(mut self, to: f64) -> Self {
        self.salary_to = Some(to);
        self
    }

    pub fn with_work_format(mut self, format: impl Into<String>) -> Self {
        self.work_format = Some(format.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = Some(skills.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_published_within_days(mut self, days: u32) -> Self {
        self.published_within_days = Some(days);
        self
    }

    /// Turns every criterion off.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single active criterion. The engine keeps a record only if every
/// active filter keeps it.
pub trait RecordFilter: Send + Sync {
    fn keep(&self, record: &VacancyRecord) -> bool;
}

pub struct LevelFilter(pub JobLevel);

impl RecordFilter for LevelFilter {
    fn keep(&self, record: &VacancyRecord) -> bool {
        record.level == self.0
    }
}

/// Records without a lower bound never pass.
pub struct SalaryFromFilter(pub f64);

impl RecordFilter for SalaryFromFilter {
    fn keep(&self, record: &VacancyRecord) -> bool {
        record.salary.lower_bound.is_some_and(|from| from >= self.0)
    }
}

/// Records without an upper bound never pass.
pub struct SalaryToFilter(pub f64);

impl RecordFilter for SalaryToFilter {
    fn keep(&self, record: &VacancyRecord) -> bool {
        record.salary.upper_bound.is_some_and(|to| to <= self.0)
    }
}

/// An unknown canonical name keeps nothing.
pub struct WorkFormatFilter(pub Option<WorkFormat>);

impl WorkFormatFilter {
    pub fn new(canonical: &str) -> Self {
        Self(WorkFormat::from_canonical(canonical))
    }
}

impl RecordFilter for WorkFormatFilter {
    fn keep(&self, record: &VacancyRecord) -> bool {
        self.0
            .is_some_and(|format| format.matches(&record.work_format))
    }
}

pub struct RegionFilter(pub String);

impl RecordFilter for RegionFilter {
    fn keep(&self, record: &VacancyRecord) -> bool {
        record.region == self.0
    }
}

pub struct SkillsFilter(pub BTreeSet<String>);

impl RecordFilter for SkillsFilter {
    fn keep(&self, record: &VacancyRecord) -> bool {
        self.0.is_subset(&record.required_skills)
    }
}

/// Keeps records published strictly after `since`, compared in UTC.
/// `since == None` means the window reaches past the earliest representable
/// date and every record passes.
pub struct RecencyFilter {
    pub since: Option<DateTime<Utc>>,
}

impl RecencyFilter {
    pub fn new(days: u32, now: DateTime<Utc>) -> Self {
        let since = Duration::try_days(i64::from(days))
            .and_then(|window| now.checked_sub_signed(window));
        Self { since }
    }
}

impl RecordFilter for RecencyFilter {
    fn keep(&self, record: &VacancyRecord) -> bool {
        self.since
            .is_none_or(|since| record.published_at.with_timezone(&Utc) > since)
    }
}

/// Stateless: narrows a master list by a [`FilterCriteria`] without touching it.
pub struct FilterEngine;

impl FilterEngine {
    pub fn apply(records: &[VacancyRecord], criteria: &FilterCriteria) -> Vec<VacancyRecord> {
        Self::apply_at(records, criteria, Utc::now())
    }

    /// Same as [`FilterEngine::apply`], with the recency window measured from `now`.
    pub fn apply_at(
        records: &[VacancyRecord],
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> Vec<VacancyRecord> {
        let filters = Self::active_filters(criteria, now);
        let mut result = records.to_vec();
        for filter in &filters {
            if result.is_empty() {
                break;
            }
            result.retain(|record| filter.keep(record));
        }
        result
    }

    pub fn active_filters(criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<Box<dyn RecordFilter>> {
        let mut filters: Vec<Box<dyn RecordFilter>> = Vec::new();
        if let Some(level) = criteria.level {
            filters.push(Box::new(LevelFilter(level)));
        }
        if let Some(from) = criteria.salary_from {
            filters.push(Box::new(SalaryFromFilter(from)));
        }
        if let Some(to) = criteria.salary_to {
            filters.push(Box::new(SalaryToFilter(to)));
        }
        if let Some(format) = &criteria.work_format {
            filters.push(Box::new(WorkFormatFilter::new(format)));
        }
        if let Some(region) = &criteria.region {
            filters.push(Box::new(RegionFilter(region.clone())));
        }
        if let Some(skills) = &criteria.skills {
            filters.push(Box::new(SkillsFilter(skills.clone())));
        }
        if let Some(days) = criteria.published_within_days {
            filters.push(Box::new(RecencyFilter::new(days, now)));
        }
        filters
    }
}

#[test]
fn test_work_format_lookup() {
    assert_eq!(WorkFormat::from_canonical("remote work"), Some(WorkFormat::RemoteWork));
    assert_eq!(WorkFormat::from_canonical("Удалённая работа"), Some(WorkFormat::RemoteWork));
    assert_eq!(WorkFormat::from_canonical("Hybrid"), None);
}

#[test]
fn test_work_format_aliases() {
    assert!(WorkFormat::RemoteWork.matches("Удалённая работа"));
    assert!(WorkFormat::RemoteWork.matches("Fully REMOTE"));
    assert!(!WorkFormat::ShiftSchedule.matches("Удалённая работа"));
    assert!(WorkFormat::FullDay.matches("Full-time"));
    assert!(WorkFormat::RotationMethod.matches("Вахтовый метод"));
}

#[test]
fn test_criteria_reset() {
    let mut criteria = FilterCriteria::new().with_level(JobLevel::Senior).with_region("Минск");
    assert!(!criteria.is_empty());
    criteria.reset();
    assert!(criteria.is_empty());
    assert!(FilterEngine::active_filters(&criteria, Utc::now()).is_empty());
}
