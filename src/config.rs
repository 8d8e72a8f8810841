// src/config.rs
//! Service configuration: upstream sources and fetch settings.
//!
//! Resolution order:
//! 1) `$WORLD_EVENTS_CONFIG_PATH` (must exist when set)
//! 2) `config/world_events.toml`
//! 3) built-in defaults
//!
//! `WORLD_EVENTS_MAX_EVENTS` and `WORLD_EVENTS_TIMEOUT_SECS` override the file.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/world_events.toml";
pub const ENV_CONFIG_PATH: &str = "WORLD_EVENTS_CONFIG_PATH";
pub const ENV_MAX_EVENTS: &str = "WORLD_EVENTS_MAX_EVENTS";
pub const ENV_TIMEOUT_SECS: &str = "WORLD_EVENTS_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_reddit")]
    pub reddit: SourceConfig,
    #[serde(default = "default_wikimedia")]
    pub wikimedia: SourceConfig,
    #[serde(default = "default_aljazeera")]
    pub aljazeera: SourceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub url: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_user_agent() -> String {
    concat!("world-event-agent/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_events() -> usize {
    60
}
fn default_enabled() -> bool {
    true
}
fn default_limit() -> usize {
    20
}

fn default_reddit() -> SourceConfig {
    SourceConfig {
        enabled: true,
        url: "https://www.reddit.com/r/worldnews/top.json?limit=25&t=day".to_string(),
        limit: default_limit(),
    }
}
fn default_wikimedia() -> SourceConfig {
    SourceConfig {
        enabled: true,
        url: "https://api.wikimedia.org/feed/v1/wikipedia/en/featured".to_string(),
        limit: default_limit(),
    }
}
fn default_aljazeera() -> SourceConfig {
    SourceConfig {
        enabled: true,
        url: "https://www.aljazeera.com/xml/rss/all.xml".to_string(),
        limit: default_limit(),
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_events: default_max_events(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            reddit: default_reddit(),
            wikimedia: default_wikimedia(),
            aljazeera: default_aljazeera(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s).context("parsing world events config")?;
        cfg.clamp_fetch_limits();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Env path → default path → built-in defaults, then env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                tracing::info!(target: "config", "no config file found; using defaults");
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(n) = parse_clamped_env(ENV_MAX_EVENTS, MAX_EVENTS_MIN, MAX_EVENTS_MAX) {
            self.fetch.max_events = n as usize;
        }
        if let Some(n) = parse_clamped_env(ENV_TIMEOUT_SECS, TIMEOUT_MIN_SECS, TIMEOUT_MAX_SECS) {
            self.fetch.timeout_secs = n;
        }
    }

    // File values obey the same bounds as env overrides.
    fn clamp_fetch_limits(&mut self) {
        self.fetch.max_events = self
            .fetch
            .max_events
            .clamp(MAX_EVENTS_MIN as usize, MAX_EVENTS_MAX as usize);
        self.fetch.timeout_secs = self
            .fetch
            .timeout_secs
            .clamp(TIMEOUT_MIN_SECS, TIMEOUT_MAX_SECS);
    }
}

const MAX_EVENTS_MIN: u64 = 1;
const MAX_EVENTS_MAX: u64 = 500;
const TIMEOUT_MIN_SECS: u64 = 1;
const TIMEOUT_MAX_SECS: u64 = 120;

// parse optional integer env and clamp to <min..=max>
fn parse_clamped_env(name: &str, min: u64, max: u64) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(|v| v.clamp(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
[fetch]
max_events = 12

[sources.reddit]
enabled = false
url = "http://localhost/reddit.json"
"#,
        )
        .unwrap();
        assert_eq!(cfg.fetch.max_events, 12);
        assert_eq!(cfg.fetch.timeout_secs, 10);
        assert!(!cfg.sources.reddit.enabled);
        assert_eq!(cfg.sources.reddit.limit, 20);
        assert!(cfg.sources.aljazeera.enabled);
        assert!(cfg.sources.wikimedia.url.ends_with("/featured"));
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.fetch.max_events, 60);
        assert!(cfg.fetch.user_agent.starts_with("world-event-agent/"));
    }

    #[test]
    fn source_without_url_is_rejected() {
        assert!(AppConfig::from_toml_str("[sources.reddit]\nenabled = true\n").is_err());
    }
}
