use crate::config::OmdbConfig;
use crate::error::Result;
use crate::types::{MovieDetails, NOT_AVAILABLE};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

/// External metadata lookup seam. `Ok(None)` means the provider reported no
/// match for the title/year; `Err` means a transport or response-shape
/// failure. Callers decide how to degrade.
#[async_trait]
pub trait MetadataService: Send + Sync {
    async fn lookup(&self, title: &str, year: Option<i32>) -> Result<Option<MovieDetails>>;
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "BoxOffice")]
    box_office: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
}

impl OmdbResponse {
    fn into_details(self) -> MovieDetails {
        let or_na = |field: Option<String>| field.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        MovieDetails {
            director: or_na(self.director),
            plot: or_na(self.plot),
            box_office: or_na(self.box_office),
            runtime: or_na(self.runtime),
            country: or_na(self.country),
            imdb_rating: or_na(self.imdb_rating),
        }
    }
}

/// OMDb API client. One lookup request per movie, keyed by clean title and,
/// when known, release year.
pub struct OmdbClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl MetadataService for OmdbClient {
    async fn lookup(&self, title: &str, year: Option<i32>) -> Result<Option<MovieDetails>> {
        let mut params = vec![
            ("t", title.to_string()),
            ("apikey", self.api_key.clone()),
            ("type", "movie".to_string()),
        ];
        if let Some(year) = year {
            params.push(("y", year.to_string()));
        }

        let resp = self.client.get(&self.url).query(&params).send().await?;
        if !resp.status().is_success() {
            debug!("OMDb responded with status {} for '{}'", resp.status().as_u16(), title);
            return Ok(None);
        }

        let data: OmdbResponse = resp.json().await?;
        if data.response == "True" {
            Ok(Some(data.into_details()))
        } else {
            Ok(None)
        }
    }
}

/// Sequential enrichment with a fixed minimum interval imposed before every
/// lookup, respecting the provider's rate limit. Per-movie failures never
/// propagate: no-match, transport errors, and malformed responses all
/// collapse into the all-sentinel record, and the pipeline continues. No
/// retries.
pub struct RateLimitedEnricher {
    service: Box<dyn MetadataService>,
    delay: Duration,
    calls_made: u64,
}

impl RateLimitedEnricher {
    pub fn new(service: Box<dyn MetadataService>, delay: Duration) -> Self {
        Self {
            service,
            delay,
            calls_made: 0,
        }
    }

    /// Look up one movie, sleeping the configured delay first.
    pub async fn enrich(&mut self, title: &str, year: Option<i32>) -> MovieDetails {
        tokio::time::sleep(self.delay).await;
        self.calls_made += 1;

        match self.service.lookup(title, year).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                warn!("No OMDb data found for: {} ({:?})", title, year);
                MovieDetails::not_available()
            }
            Err(e) => {
                error!("API error for {}: {}", title, e);
                MovieDetails::not_available()
            }
        }
    }

    /// Number of lookups attempted so far, including failed ones.
    pub fn calls_made(&self) -> u64 {
        self.calls_made
    }
}
