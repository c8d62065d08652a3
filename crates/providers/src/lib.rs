//! Provider abstractions for show metadata lookups.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub mod noop;
pub mod omdb;
pub mod rapidapi;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("missing api key for {0}")]
    MissingApiKey(&'static str),
}

/// One search hit. Only lives until the user picks it or gives up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub title: String,
    pub year: String,
    pub id: String,
}

/// Normalized attribute set for a single show. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub title: String,
    pub genre: String,
    pub imdb_rating: String,
    pub years_aired: String,
    pub production: String,
    pub streaming: String,
    pub released: String,
    pub poster: String,
    pub external_id: String,
}

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Exact-title lookup. `Ok(None)` means the API had no match.
    async fn lookup_title(&self, title: &str) -> Result<Option<ShowDetails>, ProviderError>;

    /// Fuzzy search returning candidates in API order.
    async fn search(&self, query: &str) -> Result<Vec<CandidateMatch>, ProviderError>;

    /// Full detail record for a previously returned candidate.
    async fn details(
        &self,
        candidate: &CandidateMatch,
    ) -> Result<Option<ShowDetails>, ProviderError>;

    /// Exact lookup, falling back to the first search hit's full record.
    /// Providers whose exact lookup is itself a search override this to
    /// avoid asking twice.
    async fn resolve_title(&self, title: &str) -> Result<Option<ShowDetails>, ProviderError> {
        if let Some(details) = self.lookup_title(title).await? {
            debug!("exact match for '{}' on {}", title, self.name());
            return Ok(Some(details));
        }
        let Some(best) = self.search(title).await?.into_iter().next() else {
            return Ok(None);
        };
        debug!("best search match for '{}' is '{}'", title, best.title);
        self.details(&best).await
    }
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn MetadataProvider>>,
    pub preferred: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, name: &str, provider: Arc<dyn MetadataProvider>) -> Self {
        self.providers.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred(mut self, name: &str) -> Self {
        self.preferred = Some(name.to_string());
        self
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn provider(&self, name: Option<&str>) -> Result<Arc<dyn MetadataProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred.clone())
            .ok_or_else(|| ProviderError::UnknownProvider("no metadata provider configured".into()))?;
        self.providers
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}

/// Returns the first candidate that is non-empty after trimming.
pub(crate) fn first_non_empty<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_falls_back_to_preferred() {
        let reg = ProviderRegistry::new()
            .with_provider("noop", Arc::new(noop::NoopProvider))
            .set_preferred("noop");
        assert_eq!(reg.provider(None).unwrap().name(), "noop");
        assert_eq!(reg.names(), vec!["noop".to_string()]);
    }

    #[test]
    fn registry_reports_unknown_names() {
        let reg = ProviderRegistry::new();
        match reg.provider(Some("omdb")) {
            Err(ProviderError::UnknownProvider(name)) => assert_eq!(name, "omdb"),
            other => panic!("unexpected: {:?}", other.map(|p| p.name())),
        }
        assert!(reg.provider(None).is_err());
    }

    #[test]
    fn first_non_empty_skips_blanks() {
        assert_eq!(first_non_empty(["", "  ", "NBC", "WB"]), "NBC");
        assert_eq!(first_non_empty(Vec::<String>::new()), "");
    }
}
