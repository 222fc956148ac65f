//! The persisted wishlist.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use reelpick_catalog::{Item, ItemId};
use tracing::{info, warn};

use crate::error::WishlistResult;
use crate::storage::{WishlistSnapshot, WishlistStorage};

/// Durable set of saved items keyed by identity.
///
/// Every mutation is written through to storage while the set is locked, so
/// readers never see an in-memory state that was not persisted. A failed
/// write rolls the mutation back and reports the error.
pub struct WishlistStore {
    storage: Arc<dyn WishlistStorage>,
    items: Mutex<Vec<Item>>,
}

impl WishlistStore {
    /// Rehydrate the wishlist from `storage`.
    ///
    /// An absent or unreadable snapshot starts an empty wishlist.
    #[must_use]
    pub fn open(storage: Arc<dyn WishlistStorage>) -> Self {
        let items = match storage.load() {
            Ok(Some(snapshot)) => dedupe(snapshot.into_items()),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, detail = ?err, "discarding unreadable wishlist snapshot");
                Vec::new()
            }
        };
        info!(entries = items.len(), "wishlist loaded");
        Self {
            storage,
            items: Mutex::new(items),
        }
    }

    /// Save `item`. Returns `false` when an entry with its id already exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the updated set cannot be persisted; the set is
    /// left unchanged.
    pub fn add(&self, mut item: Item) -> WishlistResult<bool> {
        let mut items = self.lock_items();
        if items.iter().any(|entry| entry.id == item.id) {
            return Ok(false);
        }
        item.added_to_wishlist = true;
        let id = item.id;
        items.push(item);
        if let Err(err) = self.persist(&items) {
            items.pop();
            return Err(err);
        }
        info!(id, entries = items.len(), "wishlist entry added");
        Ok(true)
    }

    /// Remove the entry with `id`. Returns `false` when none existed.
    ///
    /// # Errors
    ///
    /// Returns an error when the updated set cannot be persisted; the set is
    /// left unchanged.
    pub fn remove(&self, id: ItemId) -> WishlistResult<bool> {
        let mut items = self.lock_items();
        let Some(position) = items.iter().position(|entry| entry.id == id) else {
            return Ok(false);
        };
        let removed = items.remove(position);
        if let Err(err) = self.persist(&items) {
            items.insert(position, removed);
            return Err(err);
        }
        info!(id, entries = items.len(), "wishlist entry removed");
        Ok(true)
    }

    /// Remove every entry.
    ///
    /// # Errors
    ///
    /// Returns an error when the empty set cannot be persisted; the entries
    /// are kept.
    pub fn clear(&self) -> WishlistResult<()> {
        let mut items = self.lock_items();
        let previous = std::mem::take(&mut *items);
        if let Err(err) = self.persist(&items) {
            *items = previous;
            return Err(err);
        }
        info!(removed = previous.len(), "wishlist cleared");
        Ok(())
    }

    /// Whether an entry with `id` exists.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.lock_items().iter().any(|entry| entry.id == id)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Item> {
        self.lock_items().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_items().len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    /// Uniformly random entry, or `None` when empty.
    #[must_use]
    pub fn pick_random(&self) -> Option<Item> {
        self.pick_random_with(&mut rand::rng())
    }

    /// Uniformly random entry drawn from `rng`, or `None` when empty.
    pub fn pick_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Item> {
        pick_uniform(&self.lock_items(), rng).cloned()
    }

    fn persist(&self, items: &[Item]) -> WishlistResult<()> {
        self.storage
            .save(&WishlistSnapshot::new(items.to_vec()))
            .inspect_err(|err| warn!(error = %err, detail = ?err, "wishlist persistence failed"))
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<Item>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Uniform draw from `items`.
pub(crate) fn pick_uniform<'a, R: Rng + ?Sized>(items: &'a [Item], rng: &mut R) -> Option<&'a Item> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

fn dedupe(items: Vec<Item>) -> Vec<Item> {
    let mut unique: Vec<Item> = Vec::with_capacity(items.len());
    for mut item in items {
        if unique.iter().all(|entry| entry.id != item.id) {
            item.added_to_wishlist = true;
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WishlistError;
    use crate::storage::MemoryStorage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn item(id: ItemId) -> Item {
        Item {
            id,
            name: format!("Game {id}"),
            slug: String::new(),
            background_image: None,
            released: None,
            rating: 0.0,
            rating_top: 5,
            ratings_count: 0,
            metacritic: None,
            playtime: 0,
            platforms: Vec::new(),
            genres: Vec::new(),
            tags: Vec::new(),
            short_screenshots: Vec::new(),
            added_to_wishlist: false,
        }
    }

    #[derive(Default)]
    struct FlakyStorage {
        failing: AtomicBool,
        inner: MemoryStorage,
    }

    impl WishlistStorage for FlakyStorage {
        fn load(&self) -> WishlistResult<Option<WishlistSnapshot>> {
            self.inner.load()
        }

        fn save(&self, snapshot: &WishlistSnapshot) -> WishlistResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(WishlistError::Io {
                    operation: "write",
                    path: PathBuf::from("/readonly/game-store.json"),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            self.inner.save(snapshot)
        }
    }

    #[test]
    fn add_is_idempotent() -> WishlistResult<()> {
        let store = WishlistStore::open(Arc::new(MemoryStorage::new()));
        assert!(store.add(item(7))?);
        assert!(!store.add(item(7))?);
        assert!(store.contains(7));
        assert_eq!(store.len(), 1);
        assert!(store.list()[0].added_to_wishlist);
        Ok(())
    }

    #[test]
    fn every_mutation_is_persisted() -> WishlistResult<()> {
        let storage = Arc::new(MemoryStorage::new());
        let store = WishlistStore::open(storage.clone());

        store.add(item(1))?;
        store.add(item(2))?;
        let saved = storage.snapshot().map(WishlistSnapshot::into_items);
        assert_eq!(saved.map(|items| items.len()), Some(2));

        assert!(store.remove(1)?);
        assert!(!store.remove(1)?);
        let saved = storage.snapshot().map(WishlistSnapshot::into_items).unwrap_or_default();
        assert_eq!(saved.iter().map(|entry| entry.id).collect::<Vec<_>>(), vec![2]);

        store.clear()?;
        assert!(store.is_empty());
        assert_eq!(
            storage.snapshot().map(|snapshot| snapshot.state.saved_games.len()),
            Some(0)
        );
        Ok(())
    }

    #[test]
    fn failed_save_rolls_back() -> WishlistResult<()> {
        let storage = Arc::new(FlakyStorage::default());
        let store = WishlistStore::open(storage.clone());
        store.add(item(1))?;

        storage.failing.store(true, Ordering::SeqCst);
        assert!(store.add(item(2)).is_err());
        assert!(!store.contains(2));
        assert!(store.remove(1).is_err());
        assert!(store.contains(1));
        assert!(store.clear().is_err());
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[test]
    fn rehydration_drops_duplicate_ids() {
        let storage = MemoryStorage::with_snapshot(WishlistSnapshot::new(vec![item(3), item(3), item(4)]));
        let store = WishlistStore::open(Arc::new(storage));
        assert_eq!(store.len(), 2);
        assert!(store.list().iter().all(|entry| entry.added_to_wishlist));
    }

    #[test]
    fn empty_wishlist_picks_nothing() {
        let store = WishlistStore::open(Arc::new(MemoryStorage::new()));
        assert_eq!(store.pick_random(), None);
    }

    #[test]
    fn picks_are_roughly_uniform() -> WishlistResult<()> {
        let store = WishlistStore::open(Arc::new(MemoryStorage::new()));
        for id in 1..=4 {
            store.add(item(id))?;
        }
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0_u32; 4];
        let trials = 8_000;
        for _ in 0..trials {
            let picked = store.pick_random_with(&mut rng).map(|entry| entry.id);
            let index = picked.and_then(|id| usize::try_from(id).ok()).map(|id| id - 1);
            counts[index.unwrap_or(0)] += 1;
        }
        for count in counts {
            let share = f64::from(count) / f64::from(trials);
            assert!((share - 0.25).abs() < 0.03, "share {share} too far from 1/4");
        }
        Ok(())
    }
}
