use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Region used when the source payload carries no area.
pub const UNSPECIFIED_REGION: &str = "Unspecified";

/// Inputs of a single search. Built per invocation and dropped afterwards.
#[derive(Debug, Clone)]
pub struct VacancySearchRequest {
    pub query: String,
    pub area: String,
    pub host: String,
    pub per_page: u32,
    pub max_pages: u32,
}

impl VacancySearchRequest {
    pub fn new(query: String, area: String, host: String, per_page: u32, max_pages: u32) -> Self {
        VacancySearchRequest {
            query,
            area,
            host,
            per_page,
            max_pages,
        }
    }

    /// Number of listing pages worth requesting for `found` matches.
    pub fn pages_for(&self, found: u64) -> u32 {
        if found == 0 || self.per_page == 0 {
            return 0;
        }
        let pages = found.div_ceil(u64::from(self.per_page));
        pages.min(u64::from(self.max_pages)) as u32
    }
}

/// One page of the search endpoint.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ListingPage {
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub items: Vec<VacancyListingItem>,
}

/// Opaque reference to a vacancy, only alive between the listing and detail phases.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VacancyListingItem {
    pub id: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NamedRef {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DetailSalary {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub currency: Option<String>,
    pub gross: Option<bool>,
}

/// Full vacancy payload as returned by the detail endpoint.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct VacancyDetail {
    pub name: Option<String>,
    pub employer: Option<NamedRef>,
    pub alternate_url: Option<String>,
    pub salary: Option<DetailSalary>,
    pub experience: Option<NamedRef>,
    pub employment: Option<NamedRef>,
    pub schedule: Option<NamedRef>,
    pub key_skills: Option<Vec<NamedRef>>,
    pub area: Option<NamedRef>,
    pub published_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobLevel {
    Junior,
    Middle,
    Senior,
    Unspecified,
}

impl JobLevel {
    /// The levels a caller can filter or chart by.
    pub const RANKED: [JobLevel; 3] = [JobLevel::Junior, JobLevel::Middle, JobLevel::Senior];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobLevel::Junior => "Junior",
            JobLevel::Middle => "Middle",
            JobLevel::Senior => "Senior",
            JobLevel::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for JobLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for JobLevel {
    type Err = anyhow::Error;

    /// Accepts the three ranked levels in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        JobLevel::RANKED
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("unknown level: {s}"))
    }
}

/// Salary in the reporting currency. Bounds absent at the source stay absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Salary {
    #[serde(rename = "from")]
    pub lower_bound: Option<f64>,
    #[serde(rename = "to")]
    pub upper_bound: Option<f64>,
    pub currency: String,
    pub gross: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VacancyRecord {
    pub title: String,
    pub company: String,
    pub url: String,
    pub salary: Salary,
    pub experience: String,
    pub employment: String,
    pub work_format: String,
    pub required_skills: BTreeSet<String>,
    pub region: String,
    pub published_at: DateTime<FixedOffset>,
    pub level: JobLevel,
}

#[test]
fn test_pages_for_caps_and_rounds_up() {
    let request = |max_pages| {
        VacancySearchRequest::new("rust".into(), "16".into(), "rabota.by".into(), 100, max_pages)
    };
    assert_eq!(request(20).pages_for(0), 0);
    assert_eq!(request(20).pages_for(1), 1);
    assert_eq!(request(20).pages_for(100), 1);
    assert_eq!(request(20).pages_for(101), 2);
    assert_eq!(request(20).pages_for(5_000), 20);
    assert_eq!(request(3).pages_for(301), 3);
}

#[test]
fn test_job_level_from_str() {
    assert_eq!("middle".parse::<JobLevel>().unwrap(), JobLevel::Middle);
    assert_eq!(" Senior ".parse::<JobLevel>().unwrap(), JobLevel::Senior);
    assert!("Unspecified".parse::<JobLevel>().is_err());
    assert!("Lead".parse::<JobLevel>().is_err());
}
