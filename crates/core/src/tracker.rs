use crate::config::ResolveMode;
use crate::entry::{self, EntryForm};
use crate::resolver::{Resolution, Resolver};
use anyhow::{bail, Context};
use providers::{CandidateMatch, ShowDetails};
use storage::{Dataset, RecordStore, Scores, ShowRecord};
use tracing::{info, warn};

#[derive(Debug)]
pub enum AddOutcome {
    Added { record: ShowRecord, dataset: Dataset },
    /// Select mode without a pick: the caller has to choose one.
    Candidates(Vec<CandidateMatch>),
    NotFound,
}

/// Resolver plus record store: the operations a front end needs.
#[derive(Clone)]
pub struct Tracker {
    resolver: Resolver,
    store: RecordStore,
}

impl Tracker {
    pub fn new(resolver: Resolver, store: RecordStore) -> Self {
        Self { resolver, store }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub async fn search(&self, title: &str) -> anyhow::Result<Resolution> {
        self.resolver.resolve(title).await
    }

    /// Resolve `title`, merge it with `form` and append the result.
    /// `pick` is a zero-based index into the candidate list (select mode only).
    pub async fn add(
        &self,
        title: &str,
        form: &EntryForm,
        pick: Option<usize>,
    ) -> anyhow::Result<AddOutcome> {
        // reject bad input before any network call
        Scores::from_slice(&form.scores)?;
        if pick.is_some() && self.resolver.mode() == ResolveMode::Fallback {
            bail!("a candidate pick needs the provider in select mode");
        }

        let details = match self.resolver.resolve(title).await? {
            Resolution::Found { details } => details,
            Resolution::NotFound => return Ok(AddOutcome::NotFound),
            Resolution::Candidates { candidates } => {
                let Some(index) = pick else {
                    return Ok(AddOutcome::Candidates(candidates));
                };
                let candidate = candidates.get(index).with_context(|| {
                    format!(
                        "pick {} is out of range ({} candidates)",
                        index + 1,
                        candidates.len()
                    )
                })?;
                match self.resolver.select(candidate).await? {
                    Some(details) => details,
                    None => {
                        warn!("no details for candidate '{}'", candidate.title);
                        return Ok(AddOutcome::NotFound);
                    }
                }
            }
        };

        let (record, dataset) = self.submit(&details, form)?;
        Ok(AddOutcome::Added { record, dataset })
    }

    pub fn submit(
        &self,
        details: &ShowDetails,
        form: &EntryForm,
    ) -> anyhow::Result<(ShowRecord, Dataset)> {
        let record = entry::merge(details, form)?;
        let dataset = self
            .store
            .append(record.clone())
            .with_context(|| format!("saving to {}", self.store.path().display()))?;
        info!(
            "saved '{}' (avg {:.2}), {} rows total",
            record.title,
            record.avg_score(),
            dataset.len()
        );
        Ok((record, dataset))
    }

    pub fn dataset(&self) -> anyhow::Result<Dataset> {
        self.store
            .load()
            .with_context(|| format!("loading {}", self.store.path().display()))
    }

    pub fn import(&self, bytes: &[u8]) -> anyhow::Result<Dataset> {
        self.store.replace(bytes).context("importing dataset")
    }

    pub fn export(&self) -> anyhow::Result<String> {
        Ok(self.store.export()?)
    }
}
