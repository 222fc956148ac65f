//! Per-view page cache with single-flight fetches.
//!
//! # Design
//! - One entry per [`View`]; entries never share state, so fetches for
//!   different views proceed independently.
//! - At most one provider call is outstanding per `(view, page)`. Callers that
//!   arrive while it is running await the same shared future.
//! - Results are appended only when they extend the page list in order and
//!   the entry has not been evicted or replaced in the meantime.
//! - Failures leave earlier pages untouched; the same page can be retried.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Item, Page};
use crate::provider::{ApiKeyProbe, CatalogProvider};
use crate::view::{PageRequest, View};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

type SharedFetch = Shared<BoxFuture<'static, CatalogResult<Arc<Page>>>>;

/// Page returned by [`ViewCache::load_page`].
#[derive(Debug, Clone)]
pub struct PageFetch {
    /// The requested page.
    pub page: Arc<Page>,
    /// Whether the page is part of the view's cached page list. `false` when
    /// the view was evicted or replaced while the fetch ran, or when the page
    /// did not extend the list in order.
    pub stored: bool,
}

struct ViewEntry {
    generation: u64,
    pages: Vec<Arc<Page>>,
    in_flight: HashMap<u32, SharedFetch>,
}

impl ViewEntry {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            pages: Vec::new(),
            in_flight: HashMap::new(),
        }
    }

    fn has_more(&self) -> bool {
        self.pages.last().is_none_or(|page| page.has_next())
    }
}

/// Cache of ordered pages keyed by view.
pub struct ViewCache {
    provider: Arc<dyn CatalogProvider>,
    probe: Arc<dyn ApiKeyProbe>,
    page_size: u32,
    views: Mutex<HashMap<View, ViewEntry>>,
    generations: AtomicU64,
}

impl ViewCache {
    /// Build a cache over `provider`, gated by `probe`.
    #[must_use]
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        probe: Arc<dyn ApiKeyProbe>,
        page_size: u32,
    ) -> Self {
        Self {
            provider,
            probe,
            page_size: page_size.max(1),
            views: Mutex::new(HashMap::new()),
            generations: AtomicU64::new(0),
        }
    }

    /// Items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether `view` may be fetched right now.
    #[must_use]
    pub fn is_enabled(&self, view: &View) -> bool {
        view.has_required_param() && self.probe.api_key_available()
    }

    /// Return page `page` of `view`, fetching it if it is not cached.
    ///
    /// Concurrent calls for the same `(view, page)` share one provider call.
    /// Pages must be requested in order (see [`Self::next_page_number`]); a
    /// page that does not directly extend the cached list is returned but not
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CapabilityUnavailable`] when the view is
    /// disabled and [`CatalogError::FetchFailed`] when the provider fails.
    pub async fn get_page(&self, view: &View, page: u32) -> CatalogResult<Arc<Page>> {
        self.load_page(view, page).await.map(|fetch| fetch.page)
    }

    /// Like [`Self::get_page`], also reporting whether the page was kept.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_page`].
    pub async fn load_page(&self, view: &View, page: u32) -> CatalogResult<PageFetch> {
        if !self.is_enabled(view) {
            return Err(CatalogError::CapabilityUnavailable { view: view.clone() });
        }

        let (fetch, generation) = {
            let mut views = self.lock_views();
            let entry = views
                .entry(view.clone())
                .or_insert_with(|| ViewEntry::new(self.next_generation()));
            if let Some(cached) = cached_page(entry, page) {
                return Ok(PageFetch {
                    page: cached,
                    stored: true,
                });
            }
            let fetch = entry
                .in_flight
                .entry(page)
                .or_insert_with(|| self.start_fetch(view, page))
                .clone();
            (fetch, entry.generation)
        };

        let outcome = fetch.clone().await;
        let stored = self.settle(view, page, generation, &fetch, &outcome);
        outcome.map(|fetched| PageFetch {
            page: fetched,
            stored,
        })
    }

    /// Whether another page may exist for `view`.
    ///
    /// Optimistically `true` until the first page resolves; always `false`
    /// while the view is disabled.
    #[must_use]
    pub fn has_more(&self, view: &View) -> bool {
        if !self.is_enabled(view) {
            return false;
        }
        self.lock_views()
            .get(view)
            .is_none_or(ViewEntry::has_more)
    }

    /// Page number the next sequential request for `view` must use.
    #[must_use]
    pub fn next_page_number(&self, view: &View) -> u32 {
        let fetched = self.lock_views().get(view).map_or(0, |entry| entry.pages.len());
        u32::try_from(fetched).map_or(u32::MAX, |count| count.saturating_add(1))
    }

    /// Number of pages cached for `view`.
    #[must_use]
    pub fn page_count(&self, view: &View) -> usize {
        self.lock_views().get(view).map_or(0, |entry| entry.pages.len())
    }

    /// Flattened items of every cached page of `view`, in fetch order.
    #[must_use]
    pub fn items(&self, view: &View) -> Vec<Item> {
        self.lock_views().get(view).map_or_else(Vec::new, |entry| {
            entry
                .pages
                .iter()
                .flat_map(|page| page.items.iter().cloned())
                .collect()
        })
    }

    /// Total result count reported by the most recent page of `view`.
    #[must_use]
    pub fn total_count(&self, view: &View) -> Option<u64> {
        self.lock_views()
            .get(view)
            .and_then(|entry| entry.pages.last())
            .map(|page| page.count)
    }

    /// Whether a provider call for `view` is outstanding.
    #[must_use]
    pub fn is_pending(&self, view: &View) -> bool {
        self.lock_views()
            .get(view)
            .is_some_and(|entry| !entry.in_flight.is_empty())
    }

    /// Drop every cached page of `view`.
    ///
    /// In-flight fetches still resolve for their callers, but their results
    /// are discarded instead of being stored.
    pub fn evict(&self, view: &View) {
        if self.lock_views().remove(view).is_some() {
            debug!(view = %view, "evicted catalog view");
        }
    }

    fn start_fetch(&self, view: &View, page: u32) -> SharedFetch {
        let provider = Arc::clone(&self.provider);
        let request = PageRequest {
            view: view.clone(),
            page,
            page_size: self.page_size,
        };
        debug!(view = %view, page, "fetching catalog page");
        async move {
            let view = request.view.clone();
            provider
                .fetch_page(request)
                .await
                .map(Arc::new)
                .map_err(|err| CatalogError::FetchFailed {
                    view,
                    page,
                    message: format!("{err:#}"),
                })
        }
        .boxed()
        .shared()
    }

    /// Record a finished fetch. Returns whether the page now sits at its
    /// position in the view's page list.
    fn settle(
        &self,
        view: &View,
        page: u32,
        generation: u64,
        fetch: &SharedFetch,
        outcome: &CatalogResult<Arc<Page>>,
    ) -> bool {
        let mut views = self.lock_views();
        let Some(entry) = views.get_mut(view) else {
            debug!(view = %view, page, "discarding page for evicted view");
            return false;
        };
        if entry.generation != generation {
            debug!(view = %view, page, "discarding page for replaced view");
            return false;
        }

        let first = entry
            .in_flight
            .get(&page)
            .is_some_and(|current| current.ptr_eq(fetch));
        if first {
            entry.in_flight.remove(&page);
        }

        match outcome {
            Ok(fetched) => {
                let expected = entry.pages.len().saturating_add(1);
                match usize::try_from(page).map_or(Ordering::Greater, |p| p.cmp(&expected)) {
                    Ordering::Equal => {
                        entry.pages.push(Arc::clone(fetched));
                        info!(
                            view = %view,
                            page,
                            items = fetched.len(),
                            has_more = fetched.has_next(),
                            "catalog page cached"
                        );
                        true
                    }
                    Ordering::Less => cached_page(entry, page)
                        .is_some_and(|cached| Arc::ptr_eq(&cached, fetched)),
                    Ordering::Greater => {
                        warn!(view = %view, page, expected, "out-of-order page not cached");
                        false
                    }
                }
            }
            Err(err) => {
                if first {
                    warn!(view = %view, page, error = %err.detail(), "catalog page fetch failed");
                }
                false
            }
        }
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, AtomicOrdering::Relaxed)
    }

    fn lock_views(&self) -> MutexGuard<'_, HashMap<View, ViewEntry>> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn cached_page(entry: &ViewEntry, page: u32) -> Option<Arc<Page>> {
    let index = usize::try_from(page.checked_sub(1)?).ok()?;
    entry.pages.get(index).map(Arc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticProbe;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    struct StubProvider {
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
        fail_once: Mutex<HashSet<(View, u32)>>,
        last_page: u32,
    }

    impl StubProvider {
        fn new(last_page: u32) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                fail_once: Mutex::new(HashSet::new()),
                last_page,
            }
        }

        fn gated(last_page: u32, gate: Arc<Semaphore>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(last_page)
            }
        }

        fn fail_next(&self, view: View, page: u32) {
            self.fail_once
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert((view, page));
        }

        fn calls(&self) -> usize {
            self.calls.load(AtomicOrdering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogProvider for StubProvider {
        async fn fetch_page(&self, request: PageRequest) -> anyhow::Result<Page> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await?.forget();
            }
            let should_fail = self
                .fail_once
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&(request.view.clone(), request.page));
            if should_fail {
                bail!("provider unavailable");
            }
            let base = u64::from(request.page) * 100;
            let items = (0..u64::from(request.page_size))
                .map(|offset| item(base + offset))
                .collect();
            Ok(Page {
                count: u64::from(self.last_page * request.page_size),
                next: (request.page < self.last_page).then(|| format!("page={}", request.page + 1)),
                items,
            })
        }
    }

    fn item(id: u64) -> Item {
        Item {
            id,
            name: format!("Item {id}"),
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

    fn cache_with(provider: &Arc<StubProvider>, available: bool) -> ViewCache {
        let provider: Arc<dyn CatalogProvider> = provider.clone();
        ViewCache::new(provider, Arc::new(StaticProbe(available)), 2)
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() -> anyhow::Result<()> {
        let gate = Arc::new(Semaphore::new(0));
        let provider = Arc::new(StubProvider::gated(3, Arc::clone(&gate)));
        let cache = cache_with(&provider, true);

        let (first, second, ()) = tokio::join!(
            cache.load_page(&View::Popular, 1),
            cache.load_page(&View::Popular, 1),
            async {
                tokio::task::yield_now().await;
                gate.add_permits(1);
            }
        );

        let (first, second) = (first?, second?);
        assert_eq!(provider.calls(), 1);
        assert_eq!(first.page, second.page);
        assert!(first.stored && second.stored);
        assert_eq!(cache.page_count(&View::Popular), 1);
        assert!(!cache.is_pending(&View::Popular));
        Ok(())
    }

    #[tokio::test]
    async fn cached_pages_are_not_refetched() -> anyhow::Result<()> {
        let provider = Arc::new(StubProvider::new(3));
        let cache = cache_with(&provider, true);

        cache.get_page(&View::Trending, 1).await?;
        cache.get_page(&View::Trending, 1).await?;

        assert_eq!(provider.calls(), 1);
        assert_eq!(cache.next_page_number(&View::Trending), 2);
        Ok(())
    }

    #[tokio::test]
    async fn has_more_follows_the_last_page() -> anyhow::Result<()> {
        let provider = Arc::new(StubProvider::new(2));
        let cache = cache_with(&provider, true);
        let view = View::Genre(4);

        assert!(cache.has_more(&view));
        cache.get_page(&view, 1).await?;
        assert!(cache.has_more(&view));
        cache.get_page(&view, 2).await?;
        assert!(!cache.has_more(&view));
        assert_eq!(cache.items(&view).len(), 4);
        assert_eq!(cache.total_count(&view), Some(4));
        Ok(())
    }

    #[tokio::test]
    async fn failure_keeps_earlier_pages_and_allows_retry() -> anyhow::Result<()> {
        let provider = Arc::new(StubProvider::new(3));
        let cache = cache_with(&provider, true);
        let view = View::Platform(187);

        cache.get_page(&view, 1).await?;
        provider.fail_next(view.clone(), 2);

        let err = cache
            .get_page(&view, 2)
            .await
            .expect_err("second page should fail");
        assert!(matches!(err, CatalogError::FetchFailed { page: 2, .. }));
        assert_eq!(cache.page_count(&view), 1);
        assert_eq!(cache.next_page_number(&view), 2);
        assert!(cache.has_more(&view));

        cache.get_page(&view, 2).await?;
        assert_eq!(cache.page_count(&view), 2);
        assert_eq!(provider.calls(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn disabled_capability_suppresses_fetches() {
        let provider = Arc::new(StubProvider::new(3));
        let cache = cache_with(&provider, false);

        let err = cache
            .get_page(&View::Popular, 1)
            .await
            .expect_err("fetch must be refused");
        assert!(matches!(err, CatalogError::CapabilityUnavailable { .. }));
        assert!(!cache.has_more(&View::Popular));
        assert!(cache.items(&View::Popular).is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn missing_parameter_disables_view() {
        let provider = Arc::new(StubProvider::new(3));
        let cache = cache_with(&provider, true);

        for view in [View::Genre(0), View::Platform(0), View::search("")] {
            assert!(!cache.is_enabled(&view));
            assert!(!cache.has_more(&view));
            assert!(cache.get_page(&view, 1).await.is_err());
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn views_are_isolated() -> anyhow::Result<()> {
        let provider = Arc::new(StubProvider::new(3));
        let cache = cache_with(&provider, true);

        cache.get_page(&View::Popular, 1).await?;
        cache.get_page(&View::Popular, 2).await?;
        cache.get_page(&View::search("zelda"), 1).await?;

        assert_eq!(cache.items(&View::Popular).len(), 4);
        assert_eq!(cache.items(&View::search("zelda")).len(), 2);
        assert!(cache.items(&View::Trending).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn evicted_view_discards_late_result() -> anyhow::Result<()> {
        let gate = Arc::new(Semaphore::new(0));
        let provider = Arc::new(StubProvider::gated(3, Arc::clone(&gate)));
        let cache = cache_with(&provider, true);
        let view = View::search("zelda");

        let (fetch, ()) = tokio::join!(cache.load_page(&view, 1), async {
            tokio::task::yield_now().await;
            cache.evict(&view);
            gate.add_permits(1);
        });

        let fetch = fetch?;
        assert_eq!(fetch.page.len(), 2);
        assert!(!fetch.stored);
        assert_eq!(cache.page_count(&view), 0);
        assert_eq!(cache.next_page_number(&view), 1);
        Ok(())
    }

    #[tokio::test]
    async fn out_of_order_page_is_not_cached() -> anyhow::Result<()> {
        let provider = Arc::new(StubProvider::new(5));
        let cache = cache_with(&provider, true);

        assert!(!cache.load_page(&View::Popular, 3).await?.stored);
        assert_eq!(cache.page_count(&View::Popular), 0);
        Ok(())
    }
}
