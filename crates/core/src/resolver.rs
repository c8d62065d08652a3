//! Title resolution against a metadata provider.
//!
//! Fallback mode tries an exact lookup, then a fuzzy search whose first hit is
//! re-fetched in full. Select mode stops after the search so the caller can
//! choose a candidate. There are no retries: a transport failure is returned
//! as an error, an empty answer as [`Resolution::NotFound`].

use crate::config::ResolveMode;
use providers::{CandidateMatch, MetadataProvider, ShowDetails};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Found { details: ShowDetails },
    Candidates { candidates: Vec<CandidateMatch> },
    NotFound,
}

#[derive(Clone)]
pub struct Resolver {
    provider: Arc<dyn MetadataProvider>,
    mode: ResolveMode,
}

impl Resolver {
    pub fn new(provider: Arc<dyn MetadataProvider>, mode: ResolveMode) -> Self {
        Self { provider, mode }
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn resolve(&self, title: &str) -> anyhow::Result<Resolution> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Resolution::NotFound);
        }
        match self.mode {
            ResolveMode::Fallback => Ok(self
                .resolve_fallback(title)
                .await?
                .map(|details| Resolution::Found { details })
                .unwrap_or(Resolution::NotFound)),
            ResolveMode::Select => {
                let candidates = self.candidates(title).await?;
                if candidates.is_empty() {
                    warn!("no candidates for '{}' on {}", title, self.provider.name());
                    Ok(Resolution::NotFound)
                } else {
                    Ok(Resolution::Candidates { candidates })
                }
            }
        }
    }

    /// Exact lookup, then the first search hit's full record.
    pub async fn resolve_fallback(&self, title: &str) -> anyhow::Result<Option<ShowDetails>> {
        let found = self.provider.resolve_title(title).await?;
        if found.is_none() {
            warn!("'{}' not found on {}", title, self.provider.name());
        }
        Ok(found)
    }

    pub async fn candidates(&self, title: &str) -> anyhow::Result<Vec<CandidateMatch>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.provider.search(title).await?)
    }

    pub async fn select(&self, candidate: &CandidateMatch) -> anyhow::Result<Option<ShowDetails>> {
        Ok(self.provider.details(candidate).await?)
    }
}
