//! `addrmap.toml` configuration.

use std::path::{Path, PathBuf};

use addrmap_core::cache::DEFAULT_CAPACITY;
use addrmap_core::markup::DEFAULT_PROFILE_URL;
use addrmap_core::render::DEFAULT_DETAIL_URL;
use addrmap_provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name searched for in the working directory and its parents.
pub const CONFIG_FILE: &str = "addrmap.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddrmapConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

/// Where map data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    Http,
    Local,
}

/// Map provider section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_source")]
    pub source: ProviderSource,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Game identifier prefixed to map names (`smw` → `smwram`).
    #[serde(default = "default_game")]
    pub game: String,
    /// Directory of JSON listings when `source = "local"`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            source: default_source(),
            base_url: default_base_url(),
            game: default_game(),
            dir: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Render cache section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: default_capacity(),
        }
    }
}

/// Link templates used while rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Detail page template with `{game}`, `{region}` and `{detail}`.
    #[serde(default = "default_detail_url")]
    pub detail_url: String,
    /// User profile template with `{id}`.
    #[serde(default = "default_profile_url")]
    pub profile_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        LinksConfig {
            detail_url: default_detail_url(),
            profile_url: default_profile_url(),
        }
    }
}

fn default_source() -> ProviderSource {
    ProviderSource::Http
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_game() -> String {
    "smw".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_detail_url() -> String {
    DEFAULT_DETAIL_URL.to_string()
}

fn default_profile_url() -> String {
    DEFAULT_PROFILE_URL.to_string()
}

impl AddrmapConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Search `start_dir` and its ancestors for `addrmap.toml`.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Explicit path if given, else discovery from `cwd`, else defaults.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        Ok(Self::find_and_load(cwd)?
            .map(|(config, path)| {
                tracing::debug!("using configuration {}", path.display());
                config
            })
            .unwrap_or_default())
    }
}
