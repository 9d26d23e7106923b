use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::data_models::VacancyRecord;

/// `vacancies_<query>_<YYYYmmdd_HHMM>.json`, with path separators in the
/// query replaced.
pub fn default_file_name(query: &str, now: DateTime<Local>) -> String {
    let query: String = query
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("vacancies_{}_{}.json", query, now.format("%Y%m%d_%H%M"))
}

pub fn save_to_json(records: &[VacancyRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)
        .with_context(|| format!("Failed to serialize vacancies to {}", path.display()))?;
    writer.flush().context("Failed to flush vacancies file")?;
    log::info!("saved {} vacancies to {}", records.len(), path.display());
    Ok(())
}

pub fn load_from_json(path: impl AsRef<Path>) -> Result<Vec<VacancyRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse vacancies from {}", path.display()))
}

#[test]
fn test_default_file_name() {
    use chrono::TimeZone;
    let now = Local.with_ymd_and_hms(2024, 5, 1, 9, 7, 0).unwrap();
    assert_eq!(
        default_file_name(" C/C++ ", now),
        "vacancies_C_C++_20240501_0907.json"
    );
}
