use crate::{CandidateMatch, MetadataProvider, ProviderError, ShowDetails};

/// Offline provider: every lookup comes back empty.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl MetadataProvider for NoopProvider {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn lookup_title(&self, _title: &str) -> Result<Option<ShowDetails>, ProviderError> {
        Ok(None)
    }

    async fn search(&self, _query: &str) -> Result<Vec<CandidateMatch>, ProviderError> {
        Ok(Vec::new())
    }

    async fn details(
        &self,
        _candidate: &CandidateMatch,
    ) -> Result<Option<ShowDetails>, ProviderError> {
        Ok(None)
    }
}
