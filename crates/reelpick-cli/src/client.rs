//! Shared command context, error types, and construction of the core services.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use reelpick_catalog::{ApiKeyProbe, CatalogError, CatalogProvider, ViewCache};
use reelpick_config::{API_KEY_ENV, AppConfig, ConfigError};
use reelpick_rawg::{RawgClient, RawgError};
use reelpick_wishlist::{JsonFileStorage, PickerError, WishlistError, WishlistStore};

use crate::cli::OutputFormat;

/// Shown when catalog commands run without a usable API key.
pub(crate) const CATALOG_DISABLED: &str = "catalog browsing is disabled: no RAWG API key configured";

/// Command failure, split by exit code: bad input (2) or runtime failure (3).
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Result returned by every command handler.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Validation(err.detail())
    }
}

impl From<RawgError> for CliError {
    fn from(err: RawgError) -> Self {
        match err {
            RawgError::Status { .. } => Self::Failure(anyhow!(err.detail())),
            other => Self::Failure(other.into()),
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::Failure(anyhow!(err.detail()))
    }
}

impl From<WishlistError> for CliError {
    fn from(err: WishlistError) -> Self {
        Self::Failure(err.into())
    }
}

impl From<PickerError> for CliError {
    fn from(err: PickerError) -> Self {
        match err {
            PickerError::EmptyWishlist => Self::Validation(
                "wishlist is empty; save a game with `reelpick wishlist add <id>` first"
                    .to_string(),
            ),
            PickerError::SpinInProgress => Self::Failure(err.into()),
        }
    }
}

/// Resolved configuration plus the shared RAWG client for one invocation.
pub(crate) struct AppContext {
    pub(crate) config: AppConfig,
    pub(crate) rawg: Arc<RawgClient>,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    pub(crate) fn new(config: AppConfig, output: OutputFormat) -> CliResult<Self> {
        let rawg = RawgClient::new(&config)?;
        Ok(Self {
            config,
            rawg: Arc::new(rawg),
            output,
        })
    }

    /// Whether catalog requests may be issued.
    pub(crate) fn catalog_enabled(&self) -> bool {
        self.rawg.api_key_available()
    }

    /// Fresh view cache over the RAWG client, gated on its key.
    pub(crate) fn catalog_cache(&self) -> ViewCache {
        let provider: Arc<dyn CatalogProvider> = self.rawg.clone();
        let client = Arc::clone(&self.rawg);
        let probe: Arc<dyn ApiKeyProbe> = Arc::new(move || client.api_key_available());
        ViewCache::new(provider, probe, self.config.page_size)
    }

    /// Wishlist persisted under the configured data directory.
    pub(crate) fn wishlist(&self) -> WishlistStore {
        WishlistStore::open(Arc::new(JsonFileStorage::in_dir(&self.config.data_dir)))
    }

    pub(crate) fn disabled_hint() -> String {
        format!("{CATALOG_DISABLED}; set {API_KEY_ENV} or pass --api-key")
    }
}
