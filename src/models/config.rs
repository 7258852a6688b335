//! Configuration model.
//!
//! Settings come from, in increasing precedence: built-in defaults, the TOML
//! config file, environment variables, and command-line flags (applied by the
//! CLI layer).
//!
//! Environment variables:
//! - `TVSORT_TV_SHOWS`: library roots, colon-separated (first is primary)
//! - `TVSORT_CLIENT_URL`: download client base URL
//! - `TVSORT_API_KEY`: download client API key

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_THRESHOLD: f64 = 0.6;
const DEFAULT_CLIENT_URL: &str = "http://localhost:8080";
const DEFAULT_CATEGORY: &str = "tv";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Show library settings.
    pub library: LibraryConfig,
    /// Feed processing settings.
    pub prequeue: PrequeueConfig,
    /// Download client settings.
    pub client: ClientConfig,
}

/// Show library configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library roots in priority order. The first one receives new shows.
    pub tv_shows: Vec<PathBuf>,
    /// Title similarity that must be strictly exceeded to count as a match.
    pub threshold: f64,
}

/// Which episodes count as pilots for automatic fetching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PilotRule {
    /// Episode 1 of any season.
    #[default]
    SeasonPremiere,
    /// Season 1, episode 1 only.
    SeriesPremiere,
}

/// Feed processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrequeueConfig {
    /// Feed URL.
    pub feed: Option<String>,
    /// Fetch items even when the show is not in the library.
    pub get_all: bool,
    /// Do not fetch pilots automatically.
    pub no_pilots: bool,
    /// Decide but never submit.
    pub no_upload: bool,
    /// Pilot definition.
    pub pilot_rule: PilotRule,
}

/// Supported download clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    #[default]
    Sabnzbd,
    Transmission,
}

/// Download client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Client flavour.
    pub kind: ClientKind,
    /// Base URL.
    pub url: String,
    /// API key (SABnzbd).
    pub api_key: Option<String>,
    /// User name (Transmission).
    pub username: Option<String>,
    /// Password (Transmission).
    pub password: Option<String>,
    /// Category or download directory handed to the client.
    pub category: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            tv_shows: vec![PathBuf::from(".")],
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            kind: ClientKind::default(),
            url: DEFAULT_CLIENT_URL.to_string(),
            api_key: None,
            username: None,
            password: None,
            category: DEFAULT_CATEGORY.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay environment variables onto this configuration.
    pub fn apply_env(&mut self) {
        if let Ok(roots) = std::env::var("TVSORT_TV_SHOWS") {
            let roots: Vec<PathBuf> = std::env::split_paths(&roots)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if !roots.is_empty() {
                self.library.tv_shows = roots;
            }
        }
        if let Ok(url) = std::env::var("TVSORT_CLIENT_URL") {
            self.client.url = url;
        }
        if let Ok(key) = std::env::var("TVSORT_API_KEY") {
            self.client.api_key = Some(key);
        }
    }

    /// Check values that cannot be expressed in the type.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.library.threshold) {
            return Err(crate::Error::Config(format!(
                "threshold {} is outside [0, 1]",
                self.library.threshold
            )));
        }
        if self.library.tv_shows.is_empty() {
            return Err(crate::Error::Config(
                "at least one tv-shows library is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tvsort")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Load configuration.
///
/// An explicit `path` must exist and parse. Without one, the default location
/// is used when present and defaults otherwise. Environment overrides are
/// applied in both cases.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                crate::Error::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&content)?
        }
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                let content = std::fs::read_to_string(&default_path)?;
                Config::from_toml(&content)?
            } else {
                Config::default()
            }
        }
    };

    config.apply_env();
    Ok(config)
}
