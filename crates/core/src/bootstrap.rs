use crate::config::AppConfig;
use crate::resolver::Resolver;
use crate::tracker::Tracker;
use providers::noop::NoopProvider;
use providers::omdb::{OmdbConfig, OmdbProvider};
use providers::rapidapi::{RapidApiConfig, RapidApiProvider};
use providers::ProviderRegistry;
use std::sync::Arc;
use std::time::Duration;
use storage::RecordStore;
use tracing::debug;

/// Non-empty configured value, else the environment variable.
fn key_or_env(configured: &str, var: &str) -> String {
    if !configured.trim().is_empty() {
        return configured.to_string();
    }
    std::env::var(var).unwrap_or_default()
}

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let timeout = Some(config.provider.timeout_secs)
        .filter(|s| *s > 0)
        .map(Duration::from_secs);

    let omdb = OmdbProvider::new(OmdbConfig {
        api_key: key_or_env(&config.provider.omdb.api_key, "OMDB_API_KEY"),
        base_url: config.provider.omdb.base_url.clone(),
        timeout,
    });
    let rapidapi = RapidApiProvider::new(RapidApiConfig {
        api_key: key_or_env(&config.provider.rapidapi.api_key, "RAPIDAPI_KEY"),
        host: config.provider.rapidapi.host.clone(),
        base_url: config.provider.rapidapi.base_url.clone(),
        timeout,
    });

    ProviderRegistry::new()
        .with_provider("noop", Arc::new(NoopProvider))
        .with_provider("omdb", Arc::new(omdb))
        .with_provider("rapidapi", Arc::new(rapidapi))
        .set_preferred(&config.provider.name)
}

pub fn build_tracker(config: &AppConfig) -> anyhow::Result<Tracker> {
    let registry = build_registry(config);
    let provider = registry.provider(None)?;
    debug!(
        "using provider {} in {:?} mode, store {}",
        provider.name(),
        config.provider.mode,
        config.store.path
    );
    Ok(Tracker::new(
        Resolver::new(provider, config.provider.mode),
        RecordStore::new(&config.store.path),
    ))
}
