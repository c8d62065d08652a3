use crate::{first_non_empty, CandidateMatch, MetadataProvider, ProviderError, ShowDetails};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://imdb8.p.rapidapi.com";
pub const DEFAULT_HOST: &str = "imdb8.p.rapidapi.com";

const PRODUCTION_KEYS: &[&str] = &[
    "/production/company/name",
    "/production/distributor/name",
    "/productionStatus",
];

const STREAMING_KEYS: &[&str] = &[
    "/streaming/0/name",
    "/streaming/name",
    "/production/distributor/name",
];

#[derive(Clone)]
pub struct RapidApiConfig {
    pub api_key: String,
    pub host: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

/// IMDb proxy hosted on RapidAPI. Search and detail are separate calls, so
/// candidates can be surfaced before any detail record is fetched.
#[derive(Clone)]
pub struct RapidApiProvider {
    client: Client,
    cfg: Arc<RapidApiConfig>,
}

impl RapidApiProvider {
    pub fn new(cfg: RapidApiConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            cfg: Arc::new(cfg),
        }
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, ProviderError> {
        if self.cfg.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("rapidapi"));
        }
        let url = format!("{}{}", self.cfg.base_url.trim_end_matches('/'), path);
        Ok(self
            .client
            .get(url)
            .header("X-RapidAPI-Key", &self.cfg.api_key)
            .header("X-RapidAPI-Host", &self.cfg.host))
    }

    /// Sends the request; `Ok(None)` on a non-success status.
    async fn fetch_json(&self, builder: RequestBuilder) -> Result<Option<Value>, ProviderError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            debug!("rapidapi {} returned status {}", resp.url(), resp.status());
            return Ok(None);
        }
        let parsed: Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(Some(parsed))
    }

    async fn rating(&self, id: &str) -> Result<String, ProviderError> {
        let builder = self.get(&format!("/title/{}/ratings", id))?;
        Ok(self
            .fetch_json(builder)
            .await?
            .map(|v| rating_text(v.get("rating")))
            .unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn rating_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(obj)) => first_non_empty(
            ["star", "value", "rating"]
                .iter()
                .map(|k| scalar_text(obj.get(*k))),
        ),
        other => scalar_text(other),
    }
}

/// Genres arrive as a list of names, a list of `{name}` objects or a plain string.
fn genre_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Object(obj) => scalar_text(obj.get("name")),
                other => scalar_text(Some(other)),
            })
            .filter(|g| !g.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_text(other),
    }
}

fn pointer_text(doc: &Value, keys: &[&str]) -> String {
    first_non_empty(keys.iter().map(|k| scalar_text(doc.pointer(k))))
}

fn candidate_from(item: &Value) -> Option<CandidateMatch> {
    let id = scalar_text(item.get("id"));
    let title = first_non_empty([scalar_text(item.get("title")), scalar_text(item.get("l"))]);
    if id.is_empty() && title.is_empty() {
        return None;
    }
    Some(CandidateMatch {
        title,
        year: first_non_empty([scalar_text(item.get("year")), scalar_text(item.get("y"))]),
        id: id.trim_start_matches("/title/").trim_end_matches('/').to_string(),
    })
}

fn details_from(doc: &Value, candidate: &CandidateMatch) -> ShowDetails {
    ShowDetails {
        title: first_non_empty([scalar_text(doc.get("title")), candidate.title.clone()]),
        genre: genre_text(doc.get("genres")),
        imdb_rating: rating_text(doc.get("rating")),
        years_aired: first_non_empty([
            scalar_text(doc.get("years")),
            scalar_text(doc.get("year")),
            candidate.year.clone(),
        ]),
        production: pointer_text(doc, PRODUCTION_KEYS),
        streaming: pointer_text(doc, STREAMING_KEYS),
        released: scalar_text(doc.get("releaseDate")),
        poster: pointer_text(doc, &["/image/url", "/poster"]),
        external_id: first_non_empty([scalar_text(doc.get("id")), candidate.id.clone()]),
    }
}

#[async_trait::async_trait]
impl MetadataProvider for RapidApiProvider {
    fn name(&self) -> &'static str {
        "rapidapi"
    }

    async fn lookup_title(&self, title: &str) -> Result<Option<ShowDetails>, ProviderError> {
        let wanted = title.trim().to_lowercase();
        let exact = self
            .search(title)
            .await?
            .into_iter()
            .find(|c| c.title.to_lowercase() == wanted);
        match exact {
            Some(candidate) => self.details(&candidate).await,
            None => Ok(None),
        }
    }

    async fn resolve_title(&self, title: &str) -> Result<Option<ShowDetails>, ProviderError> {
        let wanted = title.trim().to_lowercase();
        let mut hits = self.search(title).await?;
        if hits.is_empty() {
            return Ok(None);
        }
        let pos = hits
            .iter()
            .position(|c| c.title.to_lowercase() == wanted)
            .unwrap_or(0);
        let best = hits.swap_remove(pos);
        debug!("rapidapi resolved '{}' to '{}'", title, best.title);
        self.details(&best).await
    }

    async fn search(&self, query: &str) -> Result<Vec<CandidateMatch>, ProviderError> {
        let builder = self.get("/search")?.query(&[("query", query)]);
        let Some(doc) = self.fetch_json(builder).await? else {
            return Ok(Vec::new());
        };
        let parsed: SearchResponse = serde_json::from_value(doc)
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(parsed.results.iter().filter_map(candidate_from).collect())
    }

    async fn details(
        &self,
        candidate: &CandidateMatch,
    ) -> Result<Option<ShowDetails>, ProviderError> {
        if candidate.id.is_empty() {
            return Ok(None);
        }
        let builder = self.get(&format!("/title/{}", candidate.id))?;
        let Some(doc) = self.fetch_json(builder).await? else {
            return Ok(None);
        };
        let mut details = details_from(&doc, candidate);
        let rating = self.rating(&candidate.id).await?;
        if !rating.is_empty() {
            details.imdb_rating = rating;
        }
        Ok(Some(details))
    }
}
