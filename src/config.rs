use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        app_token: get_env("HH_APP_TOKEN"),
        user_agent: get_env_or_default("HH_USER_AGENT", "VacancyHarvest/1.0"),
        api_url: get_env_or_default("HH_API_URL", "https://api.hh.ru/vacancies"),
        area: get_env_or_default("HH_AREA", "16"),
        host: get_env_or_default("HH_HOST", "rabota.by"),
        per_page: get_parsed_or_default("HH_PER_PAGE", 100),
        max_pages: get_parsed_or_default("HH_MAX_PAGES", 20),
        listing_workers: get_parsed_or_default("HH_LISTING_WORKERS", 5),
        detail_workers: get_parsed_or_default("HH_DETAIL_WORKERS", 10),
        timeout_secs: get_parsed_or_default("HH_TIMEOUT_SECS", 10),
    }
});

pub struct Config {
    pub app_token: String,
    pub user_agent: String,
    pub api_url: String,
    pub area: String,
    pub host: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub listing_workers: usize,
    pub detail_workers: usize,
    pub timeout_secs: u64,
}

/// Everything the fetcher needs to talk to the search API.
///
/// Built from [`CONFIG`] in the binary, or by hand in tests so the fetcher
/// can be pointed at a mock server.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_url: String,
    pub app_token: String,
    pub user_agent: String,
    pub area: String,
    pub host: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub listing_workers: usize,
    pub detail_workers: usize,
    pub timeout: Duration,
}

impl FetchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_url: config.api_url.clone(),
            app_token: config.app_token.clone(),
            user_agent: config.user_agent.clone(),
            area: config.area.clone(),
            host: config.host.clone(),
            per_page: config.per_page,
            max_pages: config.max_pages,
            listing_workers: config.listing_workers,
            detail_workers: config.detail_workers,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Defaults for everything except where to connect and how to authenticate.
    pub fn new(api_url: impl Into<String>, app_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            app_token: app_token.into(),
            user_agent: "VacancyHarvest/1.0".to_string(),
            area: "16".to_string(),
            host: "rabota.by".to_string(),
            per_page: 100,
            max_pages: 20,
            listing_workers: 5,
            detail_workers: 10,
            timeout: Duration::from_secs(10),
        }
    }
}

fn get_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("Missing required environment variable: {key}"))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_parsed_or_default<T: FromStr>(key: &str, default: T) -> T {
    parse_or_default(env::var(key).ok(), default)
}

fn parse_or_default<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[test]
fn test_parse_or_default_falls_back() {
    assert_eq!(parse_or_default(Some("not-a-number".into()), 7u32), 7);
    assert_eq!(parse_or_default(Some(" 12 ".into()), 7u32), 12);
    assert_eq!(parse_or_default(Some("-1".into()), 5usize), 5);
    assert_eq!(parse_or_default(None, 3usize), 3);
}
