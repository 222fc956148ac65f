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

//! Catalog browsing core for Reelpick.
//!
//! A [`View`] names a browsing mode and its parameters. The [`ViewCache`]
//! keeps an ordered page list per view and coalesces concurrent fetches of
//! the same page, while the [`CatalogController`] tracks which view is active
//! and drives "load more" requests against it. The remote source sits behind
//! the [`CatalogProvider`] seam and is gated by an [`ApiKeyProbe`].

pub mod cache;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod view;

pub use cache::{DEFAULT_PAGE_SIZE, PageFetch, ViewCache};
pub use controller::{CatalogController, LoadOutcome, LoadState, ViewStatus};
pub use error::{CatalogError, CatalogResult};
pub use model::{Item, ItemId, NamedRef, Page, PlatformEntry, Screenshot, Tag};
pub use provider::{ApiKeyProbe, CatalogProvider, StaticProbe};
pub use view::{HOME_GENRES, PageRequest, View, home_rows};
