use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub provider: ProviderConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "tv_tracker.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Exact lookup, then first fuzzy-search hit.
    #[default]
    Fallback,
    /// Surface search candidates and let the caller pick one.
    Select,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: String,
    pub mode: ResolveMode,
    /// Seconds; 0 disables the timeout.
    pub timeout_secs: u64,
    pub omdb: OmdbSection,
    pub rapidapi: RapidApiSection,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "omdb".to_string(),
            mode: ResolveMode::default(),
            timeout_secs: 0,
            omdb: OmdbSection::default(),
            rapidapi: RapidApiSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbSection {
    pub base_url: String,
    pub api_key: String,
}

impl Default for OmdbSection {
    fn default() -> Self {
        Self {
            base_url: providers::omdb::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RapidApiSection {
    pub base_url: String,
    pub host: String,
    pub api_key: String,
}

impl Default for RapidApiSection {
    fn default() -> Self {
        Self {
            base_url: providers::rapidapi::DEFAULT_BASE_URL.to_string(),
            host: providers::rapidapi::DEFAULT_HOST.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared password; empty disables the gate.
    pub password: String,
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("TRACKER")
            .prefix_separator("__")
            .separator("__"),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_apply_without_a_file() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.store.path, "tv_tracker.csv");
        assert_eq!(cfg.provider.name, "omdb");
        assert_eq!(cfg.provider.mode, ResolveMode::Fallback);
        assert!(cfg.auth.password.is_empty());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        fs::write(
            &path,
            r#"
            [store]
            path = "shows.csv"

            [provider]
            name = "rapidapi"
            mode = "select"

            [provider.rapidapi]
            api_key = "abc"
            "#,
        )
        .unwrap();
        let cfg = load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.store.path, "shows.csv");
        assert_eq!(cfg.provider.name, "rapidapi");
        assert_eq!(cfg.provider.mode, ResolveMode::Select);
        assert_eq!(cfg.provider.rapidapi.api_key, "abc");
        assert_eq!(cfg.provider.rapidapi.host, providers::rapidapi::DEFAULT_HOST);
        assert_eq!(cfg.provider.omdb.base_url, providers::omdb::DEFAULT_BASE_URL);
    }
}
