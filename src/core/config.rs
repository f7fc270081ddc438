//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.atlas/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::SortOrder;
use crate::api::http::{
    DEFAULT_CITIES_URL, DEFAULT_COUNTRIES_FIELDS, DEFAULT_COUNTRIES_URL, DEFAULT_TIMEOUT_SECS,
};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_sort: Option<SortOrder>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub countries_url: Option<String>,
    pub countries_fields: Option<String>,
    pub cities_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "atlas.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub sort_order: SortOrder,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
    pub countries_url: String,
    pub countries_fields: Option<String>,
    pub cities_url: String,
    pub timeout: Duration,
}

/// Values taken from command-line flags (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub sort: Option<SortOrder>,
    pub countries_url: Option<String>,
    pub cities_url: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.atlas/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".atlas").join("config.toml"))
}

/// Load config from `~/.atlas/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AtlasConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AtlasConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AtlasConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AtlasConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AtlasConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AtlasConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Atlas Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_sort = "asc"               # "asc" or "desc"
# log_file = "atlas.log"
# log_level = "info"                 # "error", "warn", "info", "debug", "trace"

# [api]
# countries_url = "https://restcountries.com/v3.1/all"     # Or ATLAS_COUNTRIES_URL
# countries_fields = "name,capital,population,languages,flags,flag,region,currencies"  # "" sends no filter
# cities_url = "https://countriesnow.space/api/v0.1/countries/population/cities/filter"
# timeout_secs = 15
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AtlasConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env<F>(config: &AtlasConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let sort_order = cli
        .sort
        .or(config.general.default_sort)
        .unwrap_or_default();

    // Countries URL: CLI → env → config → default
    let countries_url = cli
        .countries_url
        .clone()
        .or_else(|| env("ATLAS_COUNTRIES_URL"))
        .or_else(|| config.api.countries_url.clone())
        .unwrap_or_else(|| DEFAULT_COUNTRIES_URL.to_string());

    // Cities URL: CLI → env → config → default
    let cities_url = cli
        .cities_url
        .clone()
        .or_else(|| env("ATLAS_CITIES_URL"))
        .or_else(|| config.api.cities_url.clone())
        .unwrap_or_else(|| DEFAULT_CITIES_URL.to_string());

    let level_name = cli
        .log_level
        .clone()
        .or_else(|| env("ATLAS_LOG_LEVEL"))
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_level = level_name.parse().unwrap_or_else(|_| {
        warn!("Unknown log level {:?}, falling back to info", level_name);
        log::LevelFilter::Info
    });

    ResolvedConfig {
        sort_order,
        log_file: PathBuf::from(
            config
                .general
                .log_file
                .as_deref()
                .unwrap_or(DEFAULT_LOG_FILE),
        ),
        log_level,
        countries_url,
        // Unset means the default filter; an empty string means none.
        countries_fields: match config.api.countries_fields.as_deref() {
            None => Some(DEFAULT_COUNTRIES_FIELDS.to_string()),
            Some(fields) if fields.trim().is_empty() => None,
            Some(fields) => Some(fields.to_string()),
        },
        cities_url,
        timeout: Duration::from_secs(config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    }
}
