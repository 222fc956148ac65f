//! Error types for catalog paging.

use thiserror::Error;

use crate::view::View;

/// Primary error type for catalog operations.
///
/// Cloneable so that a single coalesced fetch can hand its outcome to every
/// waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The provider failed to deliver one page.
    #[error("catalog page fetch failed")]
    FetchFailed {
        /// View the page belongs to.
        view: View,
        /// One-based page number that failed.
        page: u32,
        /// Provider failure rendered as text.
        message: String,
    },
    /// The view is disabled: no API key, or its parameter is missing.
    #[error("catalog capability unavailable")]
    CapabilityUnavailable {
        /// View that was requested.
        view: View,
    },
}

impl CatalogError {
    /// View the error is scoped to.
    #[must_use]
    pub const fn view(&self) -> &View {
        match self {
            Self::FetchFailed { view, .. } | Self::CapabilityUnavailable { view } => view,
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    /// Human-readable detail including the provider message when present.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::FetchFailed {
                view,
                page,
                message,
            } => format!("{self} ({view}, page {page}): {message}"),
            Self::CapabilityUnavailable { view } => format!("{self} ({view})"),
        }
    }
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;
