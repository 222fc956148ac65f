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

//! RAWG video game database client.
//!
//! [`RawgClient`] implements [`reelpick_catalog::CatalogProvider`] by mapping
//! each view onto a `/games` query, and adds the detail, screenshot, genre and
//! platform lookups used by the command-line surface. Every request carries
//! the API key as a query parameter; without a usable key no request is sent.

pub mod client;
pub mod error;
pub mod models;
pub mod query;

pub use client::{GENRE_LIST_SIZE, PLATFORM_LIST_SIZE, RawgClient};
pub use error::{RawgError, RawgResult};
pub use models::{Classification, GameDetails};
pub use query::{TRENDING_WINDOW_DAYS, page_params, trending_window, view_params};
