#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Configuration for Reelpick.
//!
//! Settings come from environment variables, with command-line overrides
//! layered on top by the caller. The API key availability rule lives here so
//! every surface agrees on when catalog browsing is enabled.

pub mod error;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{
    API_KEY_ENV, AppConfig, DEFAULT_API_URL, DEFAULT_PAGE_SIZE, LEGACY_API_KEY_ENV, MAX_PAGE_SIZE,
    PLACEHOLDER_API_KEY, api_key_available, default_data_dir,
};
