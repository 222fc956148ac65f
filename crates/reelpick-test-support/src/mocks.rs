//! Scripted catalog provider for exercising the cache and controller.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reelpick_catalog::{CatalogProvider, Item, ItemId, Page, PageRequest, View};
use tokio::sync::Semaphore;

use crate::fixtures::sample_item;

type Script = HashMap<(View, u32), VecDeque<Result<Page, String>>>;

/// Provider that replays queued responses and records every request.
///
/// Requests without a queued response are answered from a synthetic catalog
/// of `total_per_view` items per view, or fail when no total is configured.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<Script>,
    calls: Mutex<Vec<PageRequest>>,
    total_per_view: Option<u64>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedProvider {
    /// Provider that only answers scripted requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that synthesizes `total` items for every view.
    #[must_use]
    pub fn with_catalog(total: u64) -> Self {
        Self {
            total_per_view: Some(total),
            ..Self::default()
        }
    }

    /// Hold every fetch until a permit is added to `gate`.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Queue a successful response for `(view, page)`.
    pub fn push_page(&self, view: View, page: u32, response: Page) {
        self.lock_script()
            .entry((view, page))
            .or_default()
            .push_back(Ok(response));
    }

    /// Queue a failure for `(view, page)`.
    pub fn push_failure(&self, view: View, page: u32, message: &str) {
        self.lock_script()
            .entry((view, page))
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<PageRequest> {
        self.lock_calls().clone()
    }

    /// Number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Page numbers requested for `view`, in arrival order.
    #[must_use]
    pub fn pages_requested(&self, view: &View) -> Vec<u32> {
        self.lock_calls()
            .iter()
            .filter(|request| &request.view == view)
            .map(|request| request.page)
            .collect()
    }

    fn synthesize(&self, request: &PageRequest) -> Result<Page> {
        let total = self
            .total_per_view
            .ok_or_else(|| anyhow!("no scripted response for {} page {}", request.view, request.page))?;
        let size = u64::from(request.page_size);
        let start = u64::from(request.page.saturating_sub(1)) * size;
        let end = (start + size).min(total);
        let base = view_base(&request.view);
        let items: Vec<Item> = (start..end).map(|offset| sample_item(base + offset)).collect();
        Ok(Page {
            count: total,
            next: (end < total).then(|| format!("page={}", request.page + 1)),
            items,
        })
    }

    fn lock_script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<PageRequest>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CatalogProvider for ScriptedProvider {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page> {
        self.lock_calls().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }
        let scripted = self
            .lock_script()
            .get_mut(&(request.view.clone(), request.page))
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(anyhow!(message)),
            None => self.synthesize(&request),
        }
    }
}

/// Id range reserved for synthesized items of `view`.
#[must_use]
pub fn view_base(view: &View) -> ItemId {
    match view {
        View::Popular => 100_000,
        View::Trending => 200_000,
        View::Genre(id) => 300_000 + id * 1_000,
        View::Platform(id) => 400_000 + id * 1_000,
        View::Search(text) => 500_000 + text.len() as u64 * 1_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(view: View, page: u32) -> PageRequest {
        PageRequest {
            view,
            page,
            page_size: 20,
        }
    }

    #[tokio::test]
    async fn scripted_responses_take_priority() -> Result<()> {
        let provider = ScriptedProvider::with_catalog(50);
        provider.push_failure(View::Popular, 1, "boom");

        assert!(provider.fetch_page(request(View::Popular, 1)).await.is_err());
        let page = provider.fetch_page(request(View::Popular, 1)).await?;
        assert_eq!(page.len(), 20);
        assert_eq!(provider.pages_requested(&View::Popular), vec![1, 1]);
        Ok(())
    }

    #[tokio::test]
    async fn synthetic_catalog_ends_on_partial_page() -> Result<()> {
        let provider = ScriptedProvider::with_catalog(25);
        let last = provider.fetch_page(request(View::Trending, 2)).await?;
        assert_eq!(last.len(), 5);
        assert!(!last.has_next());
        Ok(())
    }

    #[tokio::test]
    async fn unscripted_request_fails_without_catalog() {
        let provider = ScriptedProvider::new();
        assert!(provider.fetch_page(request(View::Popular, 1)).await.is_err());
        assert_eq!(provider.call_count(), 1);
    }
}
