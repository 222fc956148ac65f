//! Error types for wishlist persistence and the picker.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting or reading the wishlist.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// Filesystem access failed.
    #[error("wishlist storage io failed")]
    Io {
        /// Operation being performed.
        operation: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot could not be encoded.
    #[error("wishlist snapshot encoding failed")]
    Encode {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
    /// The persisted snapshot is malformed.
    #[error("wishlist snapshot is corrupt")]
    Corrupt {
        /// Path of the corrupt record.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for wishlist results.
pub type WishlistResult<T> = Result<T, WishlistError>;

/// Errors raised by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PickerError {
    /// There is nothing to pick from.
    #[error("wishlist is empty")]
    EmptyWishlist,
    /// A spin is already running; its pool is left untouched.
    #[error("a spin is already in progress")]
    SpinInProgress,
}
