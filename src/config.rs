use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Defaults
// =============================================================================

/// Published version database
pub const DATA_URL: &str =
    "https://raw.githubusercontent.com/jwodder/pyversion-info-data/master/pyversion-info-data.v1.json";

/// How long a downloaded database stays fresh when the server sends no
/// `Cache-Control: max-age` (5 minutes)
pub const DEFAULT_MAX_AGE_SECS: u64 = 300;

/// Timeout for HTTP requests in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

pub const USER_AGENT: &str = concat!("pyversion-info/", env!("CARGO_PKG_VERSION"));

const APP_DIR: &str = "pyversion-info";

/// User configuration, read from `config.json` in the config directory
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// File path or http(s) URL of the version database
    pub database_url: String,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DATA_URL.to_string(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    /// Seconds
    pub default_max_age: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_max_age: DEFAULT_MAX_AGE_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Milliseconds
    pub timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: FETCH_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Read the configuration at `path`, falling back to defaults when the
    /// file does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(anyhow::anyhow!("Failed to read {}: {}", path.display(), e)),
        }
    }
}

/// Returns the cache directory for pyversion-info.
/// Uses $XDG_CACHE_HOME/pyversion-info if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/pyversion-info,
/// or ./pyversion-info if neither is available.
pub fn cache_dir() -> PathBuf {
    dir_with_env(std::env::var("XDG_CACHE_HOME").ok(), dirs::home_dir(), ".cache")
}

/// Returns the path to the HTTP cache database inside `cache_dir`.
pub fn http_cache_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("http-cache.db")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir(), ".config")
        .join("config.json")
}

fn dir_with_env(xdg_home: Option<String>, home_dir: Option<PathBuf>, home_subdir: &str) -> PathBuf {
    let base = xdg_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(home_subdir)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_DIR)
}
