use crate::{CandidateMatch, MetadataProvider, ProviderError, ShowDetails};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com";

#[derive(Clone)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct OmdbProvider {
    client: Client,
    cfg: Arc<OmdbConfig>,
}

impl OmdbProvider {
    pub fn new(cfg: OmdbConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            cfg: Arc::new(cfg),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.cfg.base_url.trim_end_matches('/'))
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        if self.cfg.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("omdb"));
        }
        Ok(&self.cfg.api_key)
    }

    /// Single-title endpoint, keyed by `t` (title) or `i` (imdb id).
    async fn fetch_title(&self, key: &str, value: &str) -> Result<Option<ShowDetails>, ProviderError> {
        let resp = self
            .client
            .get(self.endpoint())
            .query(&[(key, value), ("apikey", self.api_key()?), ("type", "series")])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            debug!("omdb {}={} returned status {}", key, value, resp.status());
            return Ok(None);
        }
        let parsed: OmdbTitle = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if parsed.response != "True" {
            debug!("omdb {}={} not found", key, value);
            return Ok(None);
        }
        Ok(Some(parsed.into()))
    }
}

#[derive(Deserialize)]
struct OmdbTitle {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Production", default)]
    production: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
}

#[derive(Deserialize)]
struct OmdbSearch {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
}

#[derive(Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
}

/// OMDb spells missing values as "N/A".
fn present(value: String) -> String {
    if value.trim() == "N/A" {
        String::new()
    } else {
        value
    }
}

impl From<OmdbTitle> for ShowDetails {
    fn from(t: OmdbTitle) -> Self {
        ShowDetails {
            title: present(t.title),
            genre: present(t.genre),
            imdb_rating: present(t.imdb_rating),
            years_aired: present(t.year),
            production: present(t.production),
            streaming: String::new(),
            released: present(t.released),
            poster: present(t.poster),
            external_id: present(t.imdb_id),
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    fn name(&self) -> &'static str {
        "omdb"
    }

    async fn lookup_title(&self, title: &str) -> Result<Option<ShowDetails>, ProviderError> {
        self.fetch_title("t", title).await
    }

    async fn search(&self, query: &str) -> Result<Vec<CandidateMatch>, ProviderError> {
        let resp = self
            .client
            .get(self.endpoint())
            .query(&[("s", query), ("apikey", self.api_key()?), ("type", "series")])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            debug!("omdb search {:?} returned status {}", query, resp.status());
            return Ok(Vec::new());
        }
        let parsed: OmdbSearch = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if parsed.response != "True" {
            return Ok(Vec::new());
        }
        Ok(parsed
            .search
            .into_iter()
            .map(|item| CandidateMatch {
                title: item.title,
                year: present(item.year),
                id: present(item.imdb_id),
            })
            .collect())
    }

    async fn details(
        &self,
        candidate: &CandidateMatch,
    ) -> Result<Option<ShowDetails>, ProviderError> {
        if candidate.id.is_empty() {
            self.fetch_title("t", &candidate.title).await
        } else {
            self.fetch_title("i", &candidate.id).await
        }
    }
}
