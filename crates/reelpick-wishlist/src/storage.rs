//! Durable storage backends for the wishlist snapshot.
//!
//! The snapshot is a single named record shaped like the browser store it
//! replaces: `{"state": {"savedGames": [...]}, "version": 0}`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use reelpick_catalog::Item;
use serde::{Deserialize, Serialize};

use crate::error::{WishlistError, WishlistResult};

/// Name of the persisted record.
pub const STORE_NAME: &str = "game-store";

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Persisted wishlist record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistSnapshot {
    /// Persisted state.
    pub state: SnapshotState,
    /// Layout version.
    #[serde(default)]
    pub version: u32,
}

/// Body of a [`WishlistSnapshot`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotState {
    /// Saved items in insertion order.
    #[serde(rename = "savedGames", default)]
    pub saved_games: Vec<Item>,
}

impl WishlistSnapshot {
    /// Snapshot of `items` at the current version.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            state: SnapshotState { saved_games: items },
            version: SNAPSHOT_VERSION,
        }
    }

    /// Saved items.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.state.saved_games
    }
}

/// Backend that loads and saves the wishlist snapshot.
pub trait WishlistStorage: Send + Sync {
    /// Load the last saved snapshot, or `None` when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error when the record exists but cannot be read or parsed.
    fn load(&self) -> WishlistResult<Option<WishlistSnapshot>>;

    /// Replace the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be written.
    fn save(&self, snapshot: &WishlistSnapshot) -> WishlistResult<()>;
}

/// JSON file backend.
///
/// Writes go to a sibling temporary file that is renamed over the record, so
/// a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Store the record at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the record as `game-store.json` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{STORE_NAME}.json")))
    }

    /// Location of the record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl WishlistStorage for JsonFileStorage {
    fn load(&self) -> WishlistResult<Option<WishlistSnapshot>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(WishlistError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| WishlistError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, snapshot: &WishlistSnapshot) -> WishlistResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| WishlistError::Io {
                operation: "create_dir",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let body = serde_json::to_vec_pretty(snapshot)
            .map_err(|source| WishlistError::Encode { source })?;
        let temp = self.temp_path();
        fs::write(&temp, body).map_err(|source| WishlistError::Io {
            operation: "write",
            path: temp.clone(),
            source,
        })?;
        fs::rename(&temp, &self.path).map_err(|source| WishlistError::Io {
            operation: "rename",
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<WishlistSnapshot>>,
}

impl MemoryStorage {
    /// Empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: WishlistSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    /// Last saved snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<WishlistSnapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl WishlistStorage for MemoryStorage {
    fn load(&self) -> WishlistResult<Option<WishlistSnapshot>> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &WishlistSnapshot) -> WishlistResult<()> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}
