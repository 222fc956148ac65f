//! Environment-driven application settings.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use reelpick_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};
use serde::Serialize;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Primary API key variable.
pub const API_KEY_ENV: &str = "RAWG_API_KEY";
/// Legacy API key variable, read when [`API_KEY_ENV`] is unset.
pub const LEGACY_API_KEY_ENV: &str = "NEXT_PUBLIC_RAWG_API_KEY";
/// Base URL override.
pub const API_URL_ENV: &str = "REELPICK_API_URL";
/// Page size override.
pub const PAGE_SIZE_ENV: &str = "REELPICK_PAGE_SIZE";
/// HTTP timeout override, in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "REELPICK_HTTP_TIMEOUT_SECS";
/// Wishlist directory override.
pub const DATA_DIR_ENV: &str = "REELPICK_DATA_DIR";
/// Log level override.
pub const LOG_LEVEL_ENV: &str = "REELPICK_LOG_LEVEL";
/// Log format override.
pub const LOG_FORMAT_ENV: &str = "REELPICK_LOG_FORMAT";

/// Default provider endpoint.
pub const DEFAULT_API_URL: &str = "https://api.rawg.io/api";
/// Default items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size the provider accepts.
pub const MAX_PAGE_SIZE: u32 = 40;
/// Default HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
/// Placeholder shipped in sample environment files; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Whether `key` is a usable API key.
///
/// A key is usable when present, non-blank, and not the sample placeholder.
#[must_use]
pub fn api_key_available(key: Option<&str>) -> bool {
    key.map(str::trim)
        .is_some_and(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    /// Provider API key, if configured.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Provider base URL.
    pub api_url: Url,
    /// Items requested per page.
    pub page_size: u32,
    /// Timeout applied to every provider request.
    pub http_timeout: Duration,
    /// Directory holding the wishlist record.
    pub data_dir: PathBuf,
    /// Log filter directive handed to the subscriber.
    pub log_level: String,
    /// Log output format.
    #[serde(serialize_with = "serialize_log_format")]
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable holds an
    /// unusable value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable holds an
    /// unusable value.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = read(API_KEY_ENV).or_else(|| read(LEGACY_API_KEY_ENV));
        let api_url = read(API_URL_ENV).map_or_else(
            || parse_api_url(DEFAULT_API_URL),
            |value| parse_api_url(&value),
        )?;
        let page_size = read(PAGE_SIZE_ENV)
            .map_or(Ok(DEFAULT_PAGE_SIZE), |value| parse_page_size(&value))?;
        let http_timeout = read(HTTP_TIMEOUT_ENV)
            .map_or(Ok(DEFAULT_HTTP_TIMEOUT), |value| parse_timeout(&value))?;
        let data_dir = read(DATA_DIR_ENV).map_or_else(default_data_dir, PathBuf::from);
        let log_level = read(LOG_LEVEL_ENV).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = read(LOG_FORMAT_ENV).map_or(Ok(LogFormat::infer()), |value| {
            value
                .parse()
                .map_err(|_| ConfigError::invalid(LOG_FORMAT_ENV, &value, "unknown_format"))
        })?;

        Ok(Self {
            api_key,
            api_url,
            page_size,
            http_timeout,
            data_dir,
            log_level,
            log_format,
        })
    }

    /// Whether the configured key is usable.
    #[must_use]
    pub fn api_key_available(&self) -> bool {
        api_key_available(self.api_key.as_deref())
    }

    /// Replace the API key when `key` is provided.
    #[must_use]
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if key.is_some() {
            self.api_key = key;
        }
        self
    }

    /// Replace the data directory when `dir` is provided.
    #[must_use]
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    /// Replace the log filter when `level` is provided.
    #[must_use]
    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level.filter(|level| !level.trim().is_empty()) {
            self.log_level = level;
        }
        self
    }

    /// Replace the page size when `size` is provided.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when `size` is out of range.
    pub fn with_page_size(mut self, size: Option<u32>) -> ConfigResult<Self> {
        if let Some(size) = size {
            self.page_size = validate_page_size(size, "--page-size")?;
        }
        Ok(self)
    }
}

/// Platform data directory for the wishlist, or `./.reelpick` when none exists.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("io", "reelpick", "reelpick")
        .map_or_else(|| PathBuf::from(".reelpick"), |dirs| dirs.data_dir().to_path_buf())
}

fn parse_api_url(value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value.trim())
        .map_err(|_| ConfigError::invalid(API_URL_ENV, value, "invalid_url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(API_URL_ENV, value, "unsupported_scheme"));
    }
    Ok(url)
}

fn parse_page_size(value: &str) -> ConfigResult<u32> {
    let size = value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::invalid(PAGE_SIZE_ENV, value, "not_a_number"))?;
    validate_page_size(size, PAGE_SIZE_ENV)
}

fn validate_page_size(size: u32, field: &'static str) -> ConfigResult<u32> {
    if (1..=MAX_PAGE_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::invalid(field, &size.to_string(), "out_of_range"))
    }
}

fn parse_timeout(value: &str) -> ConfigResult<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::invalid(HTTP_TIMEOUT_ENV, value, "must_be_positive")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ConfigError::invalid(HTTP_TIMEOUT_ENV, value, "not_a_number")),
    }
}

fn serialize_log_format<S: serde::Serializer>(
    format: &LogFormat,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(format.as_str())
}
