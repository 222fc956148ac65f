//! Active-view selection and load-more driving over a [`ViewCache`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::ViewCache;
use crate::error::{CatalogError, CatalogResult};
use crate::model::Item;
use crate::view::View;

/// Load state tracked per view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No load has been attempted.
    #[default]
    Idle,
    /// A load for `page` is in progress.
    Loading {
        /// Page being fetched.
        page: u32,
        /// Identifies the `load_more` call that owns this marker.
        ticket: u64,
    },
    /// The last load succeeded.
    Loaded {
        /// Whether another page may exist.
        has_more: bool,
    },
    /// The last load failed; earlier pages remain visible.
    Failed(CatalogError),
}

/// Result of a [`CatalogController::load_more`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// A new page was appended.
    Loaded {
        /// Page number that was loaded.
        page: u32,
        /// Items in that page.
        items: usize,
        /// Whether another page may exist.
        has_more: bool,
    },
    /// The view has no further pages.
    Exhausted,
    /// A load for this view is already running; nothing was started.
    AlreadyPending,
    /// The view was reset while the page was in flight, so the page was
    /// dropped instead of appended.
    Discarded {
        /// Page that was dropped.
        page: u32,
    },
    /// The view is disabled; nothing was fetched.
    Unavailable,
}

/// Snapshot of the active view for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewStatus {
    /// Active view.
    pub view: View,
    /// Whether the view can fetch at all.
    pub enabled: bool,
    /// Number of items accumulated.
    pub items: usize,
    /// Pages fetched so far.
    pub pages: usize,
    /// Whether another page may exist.
    pub has_more: bool,
    /// Whether a load is running.
    pub loading: bool,
    /// Total reported by the provider, when known.
    pub total: Option<u64>,
    /// Message of the last failure, if the last load failed.
    pub error: Option<String>,
}

struct ControllerState {
    active: View,
    loads: HashMap<View, LoadState>,
    next_ticket: u64,
}

impl ControllerState {
    fn owns(&self, view: &View, ticket: u64) -> bool {
        matches!(
            self.loads.get(view),
            Some(LoadState::Loading { ticket: current, .. }) if *current == ticket
        )
    }

    /// Write `next` only while `ticket` still owns the view's marker.
    fn finish(&mut self, view: &View, ticket: u64, next: LoadState) {
        if self.owns(view, ticket) {
            self.loads.insert(view.clone(), next);
        } else {
            debug!(view = %view, "load finished after its view was reset");
        }
    }
}

/// Drives paging of the active view.
///
/// Each view keeps its own load state, so a result for a view that is no
/// longer active updates only that view and never the active one.
pub struct CatalogController {
    cache: Arc<ViewCache>,
    state: Mutex<ControllerState>,
}

impl CatalogController {
    /// Create a controller starting on `initial`.
    #[must_use]
    pub fn new(cache: Arc<ViewCache>, initial: View) -> Self {
        Self {
            cache,
            state: Mutex::new(ControllerState {
                active: initial,
                loads: HashMap::new(),
                next_ticket: 0,
            }),
        }
    }

    /// Underlying cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<ViewCache> {
        &self.cache
    }

    /// Currently active view.
    #[must_use]
    pub fn active_view(&self) -> View {
        self.lock_state().active.clone()
    }

    /// Make `view` active. Returns `false` when it already was.
    ///
    /// Cached pages of every other view are retained, except that replacing
    /// one search with another discards the previous search's pages.
    pub fn select_view(&self, view: View) -> bool {
        let previous = {
            let mut state = self.lock_state();
            if state.active == view {
                return false;
            }
            std::mem::replace(&mut state.active, view.clone())
        };
        if matches!(previous, View::Search(_)) && matches!(view, View::Search(_)) {
            self.cache.evict(&previous);
            self.lock_state().loads.remove(&previous);
        }
        debug!(from = %previous, to = %view, "catalog view changed");
        true
    }

    /// Switch to a search for `text`.
    pub fn set_search_text(&self, text: &str) -> bool {
        self.select_view(View::search(text))
    }

    /// Fetch the next page of the active view.
    ///
    /// A load that finishes after its view was reset returns
    /// [`LoadOutcome::Discarded`] and leaves the view's load state alone.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::FetchFailed`] when the provider fails; the
    /// view's earlier pages stay intact and the same page is retried on the
    /// next call.
    pub async fn load_more(&self) -> CatalogResult<LoadOutcome> {
        let view = self.active_view();
        if !self.cache.is_enabled(&view) {
            return Ok(LoadOutcome::Unavailable);
        }
        if !self.cache.has_more(&view) {
            return Ok(LoadOutcome::Exhausted);
        }

        let (page, ticket) = {
            let mut state = self.lock_state();
            if matches!(state.loads.get(&view), Some(LoadState::Loading { .. })) {
                return Ok(LoadOutcome::AlreadyPending);
            }
            let page = self.cache.next_page_number(&view);
            let ticket = state.next_ticket;
            state.next_ticket = ticket.wrapping_add(1);
            state
                .loads
                .insert(view.clone(), LoadState::Loading { page, ticket });
            (page, ticket)
        };

        let mut guard = LoadingGuard {
            controller: self,
            view: &view,
            ticket,
            armed: true,
        };
        let result = self.cache.load_page(&view, page).await;
        guard.armed = false;

        let (next, outcome) = match result {
            Ok(fetched) if fetched.stored => {
                let has_more = fetched.page.has_next();
                let items = fetched.page.len();
                info!(view = %view, page, items, has_more, "loaded more");
                (
                    LoadState::Loaded { has_more },
                    Ok(LoadOutcome::Loaded {
                        page,
                        items,
                        has_more,
                    }),
                )
            }
            Ok(_) => {
                debug!(view = %view, page, "page dropped by the cache");
                (LoadState::Idle, Ok(LoadOutcome::Discarded { page }))
            }
            Err(err @ CatalogError::CapabilityUnavailable { .. }) => {
                debug!(view = %view, error = %err, "view became unavailable mid-load");
                (LoadState::Idle, Ok(LoadOutcome::Unavailable))
            }
            Err(err) => (LoadState::Failed(err.clone()), Err(err)),
        };
        self.lock_state().finish(&view, ticket, next);
        outcome
    }

    /// Flattened items of the active view.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.cache.items(&self.active_view())
    }

    /// Whether the active view may have another page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.cache.has_more(&self.active_view())
    }

    /// Whether a load for the active view is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        let state = self.lock_state();
        matches!(
            state.loads.get(&state.active),
            Some(LoadState::Loading { .. })
        )
    }

    /// Error of the active view's last load, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<CatalogError> {
        let state = self.lock_state();
        match state.loads.get(&state.active) {
            Some(LoadState::Failed(err)) => Some(err.clone()),
            _ => None,
        }
    }

    /// Load state recorded for `view`.
    #[must_use]
    pub fn load_state(&self, view: &View) -> LoadState {
        self.lock_state().loads.get(view).cloned().unwrap_or_default()
    }

    /// Presentation snapshot of the active view.
    #[must_use]
    pub fn status(&self) -> ViewStatus {
        let view = self.active_view();
        let load = self.load_state(&view);
        ViewStatus {
            enabled: self.cache.is_enabled(&view),
            items: self.cache.items(&view).len(),
            pages: self.cache.page_count(&view),
            has_more: self.cache.has_more(&view),
            loading: matches!(load, LoadState::Loading { .. }),
            total: self.cache.total_count(&view),
            error: match load {
                LoadState::Failed(err) => Some(err.detail()),
                _ => None,
            },
            view,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resets a `Loading` marker when a `load_more` future is dropped mid-flight.
struct LoadingGuard<'a> {
    controller: &'a CatalogController,
    view: &'a View,
    ticket: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.controller.lock_state();
        if state.owns(self.view, self.ticket) {
            state.loads.insert(self.view.clone(), LoadState::Idle);
        }
    }
}
