//! Aggregates the chart layer draws from a (possibly filtered) record list.

use std::collections::HashMap;

use serde::Serialize;

use crate::data_models::{JobLevel, VacancyRecord};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LevelShare {
    pub level: JobLevel,
    pub count: usize,
    pub percent: f64,
}

/// Median of present lower bounds per ranked level, 0 when a level has none.
pub fn median_salary_by_level(records: &[VacancyRecord]) -> Vec<(JobLevel, f64)> {
    JobLevel::RANKED
        .into_iter()
        .map(|level| {
            let mut salaries: Vec<f64> = records
                .iter()
                .filter(|r| r.level == level)
                .filter_map(|r| r.salary.lower_bound)
                .collect();
            (level, median(&mut salaries).unwrap_or(0.0))
        })
        .collect()
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

pub fn level_distribution(records: &[VacancyRecord]) -> Vec<LevelShare> {
    let counts: Vec<(JobLevel, usize)> = JobLevel::RANKED
        .into_iter()
        .map(|level| (level, records.iter().filter(|r| r.level == level).count()))
        .collect();
    let total: usize = counts.iter().map(|(_, c)| c).sum();

    counts
        .into_iter()
        .map(|(level, count)| LevelShare {
            level,
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}

pub fn top_skills(records: &[VacancyRecord], n: usize) -> Vec<(String, usize)> {
    let mut counts = count_by(records.iter().flat_map(|r| r.required_skills.iter()));
    counts.truncate(n);
    counts
}

pub fn work_format_distribution(records: &[VacancyRecord]) -> Vec<(String, usize)> {
    count_by(records.iter().map(|r| &r.work_format))
}

pub fn top_regions(records: &[VacancyRecord], n: usize) -> Vec<(String, usize)> {
    let mut counts = count_by(records.iter().map(|r| &r.region));
    counts.truncate(n);
    counts
}

/// Counts occurrences, most frequent first, ties by name.
fn count_by<'a>(values: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[test]
fn test_median() {
    assert_eq!(median(&mut []), None);
    assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
    assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
}
