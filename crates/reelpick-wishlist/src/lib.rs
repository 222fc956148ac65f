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

//! Persisted wishlist and the random picker built on top of it.
//!
//! [`WishlistStore`] writes every mutation through a [`WishlistStorage`]
//! backend before it becomes visible. [`PickerEngine`] turns a wishlist
//! snapshot into a winner plus a reel for animated reveal.

pub mod error;
pub mod picker;
pub mod storage;
pub mod store;

pub use error::{PickerError, WishlistError, WishlistResult};
pub use picker::{
    PickerEngine, REEL_CENTER, REEL_LENGTH, ReelGeometry, SPIN_DURATION, Spin, SpinPhase,
};
pub use storage::{
    JsonFileStorage, MemoryStorage, STORE_NAME, SnapshotState, WishlistSnapshot, WishlistStorage,
};
pub use store::WishlistStore;
