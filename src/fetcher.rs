use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset};
use reqwest::{StatusCode, Url};
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::FetchSettings;
use crate::currency::CurrencyTable;
use crate::data_models::{
    ListingPage, NamedRef, UNSPECIFIED_REGION, VacancyDetail, VacancyListingItem, VacancyRecord,
    VacancySearchRequest,
};
use crate::level::LevelClassifier;
use crate::worker_pool::WorkerPool;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("vacancy payload is missing {field}")]
    Incomplete { field: &'static str },
}

/// Turns a free-text query into normalized vacancy records.
///
/// Two phases, each on its own bounded pool: listing pages are fetched to
/// discover vacancy ids, then every id is fetched in full and normalized.
/// Any page or detail that fails is logged and skipped, so `search` itself
/// never fails; it just returns fewer records.
pub struct VacancyFetcher {
    client: reqwest::Client,
    api_url: Url,
    settings: FetchSettings,
    currencies: CurrencyTable,
    levels: LevelClassifier,
    listing_pool: WorkerPool,
    detail_pool: WorkerPool,
}

impl VacancyFetcher {
    pub fn new(settings: FetchSettings) -> Result<VacancyFetcher> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let api_url = Url::parse(&settings.api_url)
            .with_context(|| format!("Invalid API url {}", settings.api_url))?;
        if api_url.cannot_be_a_base() {
            bail!("API url {api_url} cannot carry a vacancy id");
        }

        Ok(VacancyFetcher {
            client,
            api_url,
            listing_pool: WorkerPool::new("listing", settings.listing_workers),
            detail_pool: WorkerPool::new("detail", settings.detail_workers),
            settings,
            currencies: CurrencyTable::default(),
            levels: LevelClassifier::default(),
        })
    }

    pub fn with_currencies(mut self, currencies: CurrencyTable) -> Self {
        self.currencies = currencies;
        self
    }

    pub fn with_levels(mut self, levels: LevelClassifier) -> Self {
        self.levels = levels;
        self
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    pub fn request_for(&self, query: &str) -> VacancySearchRequest {
        VacancySearchRequest::new(
            query.to_string(),
            self.settings.area.clone(),
            self.settings.host.clone(),
            self.settings.per_page,
            self.settings.max_pages,
        )
    }

    pub async fn search(self: Arc<Self>, query: &str) -> Vec<VacancyRecord> {
        let request = self.request_for(query);
        self.search_request(request).await
    }

    pub async fn search_request(self: Arc<Self>, request: VacancySearchRequest) -> Vec<VacancyRecord> {
        let found = match self.fetch_listing(&request, None).await {
            Ok(listing) => listing.found,
            Err(e) => {
                log::warn!("error counting vacancies for {:?}, error: {:#}", request.query, e);
                return Vec::new();
            }
        };
        if found == 0 {
            log::info!("no vacancies found for {:?}", request.query);
            return Vec::new();
        }

        let pages = request.pages_for(found);
        log::info!(
            "{found} vacancies found for {:?}, fetching {pages} page(s)",
            request.query
        );

        let items = self.clone().collect_listing(Arc::new(request), pages).await;
        self.collect_details(items).await
    }

    async fn collect_listing(
        self: Arc<Self>,
        request: Arc<VacancySearchRequest>,
        pages: u32,
    ) -> Vec<VacancyListingItem> {
        let fetcher = self.clone();
        let listings = self
            .listing_pool
            .run((0..pages).collect(), move |page: u32| {
                let fetcher = fetcher.clone();
                let request = request.clone();
                async move {
                    match fetcher.fetch_listing(&request, Some(page)).await {
                        Ok(listing) => Some(listing.items),
                        Err(e) => {
                            log::warn!("error fetching listing page {page}, error: {:#}", e);
                            None
                        }
                    }
                }
            })
            .await;

        listings.into_iter().flatten().collect()
    }

    async fn collect_details(self: Arc<Self>, items: Vec<VacancyListingItem>) -> Vec<VacancyRecord> {
        let fetcher = self.clone();
        self.detail_pool
            .run(items, move |item: VacancyListingItem| {
                let fetcher = fetcher.clone();
                async move {
                    match fetcher.fetch_detail(&item).await {
                        Ok(record) => Some(record),
                        Err(e) => {
                            log::warn!("error fetching vacancy {}, error: {:#}", item.id, e);
                            None
                        }
                    }
                }
            })
            .await
    }

    /// `page == None` is the discovery request that only reads the total.
    async fn fetch_listing(
        &self,
        request: &VacancySearchRequest,
        page: Option<u32>,
    ) -> Result<ListingPage, FetchError> {
        let mut query = vec![
            ("text", request.query.clone()),
            ("area", request.area.clone()),
            ("per_page", request.per_page.to_string()),
            ("host", request.host.clone()),
        ];
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        self.get_json(self.api_url.clone(), &query).await
    }

    /// Listing url with the id appended as one escaped path segment.
    fn detail_url(&self, id: &str) -> Url {
        let mut url = self.api_url.clone();
        // `new` rejects urls that cannot be a base
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    async fn fetch_detail(&self, item: &VacancyListingItem) -> Result<VacancyRecord, FetchError> {
        let detail: VacancyDetail = self.get_json(self.detail_url(&item.id), &[]).await?;
        self.normalize(detail)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let res = self
            .client
            .get(url.clone())
            .bearer_auth(&self.settings.app_token)
            .header(USER_AGENT, &self.settings.user_agent)
            .header("HH-User-Agent", &self.settings.user_agent)
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        res.json::<T>().await.map_err(|source| FetchError::Payload {
            url: url.to_string(),
            source,
        })
    }

    pub fn normalize(&self, detail: VacancyDetail) -> Result<VacancyRecord, FetchError> {
        let title = detail.name.ok_or(FetchError::Incomplete { field: "name" })?;
        let company = name_of(&detail.employer).ok_or(FetchError::Incomplete {
            field: "employer.name",
        })?;
        let published_at = detail
            .published_at
            .as_deref()
            .and_then(parse_published_at)
            .ok_or(FetchError::Incomplete {
                field: "published_at",
            })?;

        let experience = name_of(&detail.experience);
        let level = self.levels.classify(experience.as_deref());
        let required_skills = detail
            .key_skills
            .unwrap_or_default()
            .into_iter()
            .filter_map(|skill| skill.name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        Ok(VacancyRecord {
            title,
            company,
            url: detail.alternate_url.unwrap_or_default(),
            salary: self.currencies.normalize(detail.salary.as_ref()),
            experience: experience.unwrap_or_default(),
            employment: name_of(&detail.employment).unwrap_or_default(),
            work_format: name_of(&detail.schedule).unwrap_or_default(),
            required_skills,
            region: name_of(&detail.area).unwrap_or_else(|| UNSPECIFIED_REGION.to_string()),
            published_at,
            level,
        })
    }
}

fn name_of(named: &Option<NamedRef>) -> Option<String> {
    named.as_ref().and_then(|n| n.name.clone())
}

/// The API sends `2024-05-01T10:00:00+0300`; RFC 3339 is accepted as well.
pub fn parse_published_at(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}
