use std::sync::Arc;

use anyhow::anyhow;
use futures_util::future::join_all;
use reelpick_catalog::{ViewCache, home_rows};
use tracing::warn;

use crate::client::{AppContext, CliError, CliResult};
use crate::output::{HomeRow, render_home, render_notice};

pub(crate) async fn handle_home(ctx: &AppContext) -> CliResult<()> {
    if !ctx.catalog_enabled() {
        return render_notice(&AppContext::disabled_hint(), ctx.output);
    }

    let rows = load_home_rows(Arc::new(ctx.catalog_cache())).await;
    render_home(&rows, ctx.output)?;

    if rows.iter().all(|row| row.error.is_some()) {
        return Err(CliError::failure(anyhow!(
            "no home row could be loaded; run the command again to retry"
        )));
    }
    Ok(())
}

/// First page of every home row, fetched concurrently through one cache.
pub(crate) async fn load_home_rows(cache: Arc<ViewCache>) -> Vec<HomeRow> {
    let loads = home_rows().into_iter().map(|(title, view)| {
        let cache = Arc::clone(&cache);
        async move {
            let result = cache.get_page(&view, 1).await;
            let (items, error) = match result {
                Ok(page) => (page.items.clone(), None),
                Err(err) => {
                    warn!(row = title, error = %err.detail(), "home row failed");
                    (Vec::new(), Some(err.detail()))
                }
            };
            HomeRow {
                title: title.to_string(),
                has_more: cache.has_more(&view),
                view,
                items,
                error,
            }
        }
    });
    join_all(loads).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelpick_catalog::{CatalogProvider, StaticProbe, View};
    use reelpick_test_support::mocks::{ScriptedProvider, view_base};
    use tokio::sync::Semaphore;

    #[tokio::test]
    async fn rows_load_concurrently_and_in_order() {
        let gate = Arc::new(Semaphore::new(0));
        let provider = Arc::new(ScriptedProvider::with_catalog(30).gated(Arc::clone(&gate)));
        let shared: Arc<dyn CatalogProvider> = provider.clone();
        let cache = Arc::new(ViewCache::new(shared, Arc::new(StaticProbe(true)), 10));

        let task = tokio::spawn(load_home_rows(Arc::clone(&cache)));
        while provider.call_count() < home_rows().len() {
            tokio::task::yield_now().await;
        }
        gate.add_permits(home_rows().len());
        let rows = task.await.expect("home rows task");

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].title, "Popular");
        assert_eq!(rows[3].view, View::Genre(5));
        assert_eq!(rows[3].items[0].id, view_base(&View::Genre(5)));
        assert!(rows.iter().all(|row| row.items.len() == 10 && row.has_more));
        assert_eq!(cache.page_count(&View::Trending), 1);
    }

    #[tokio::test]
    async fn one_failing_row_leaves_the_others() {
        let provider = Arc::new(ScriptedProvider::with_catalog(5));
        provider.push_failure(View::Genre(2), 1, "shooter outage");
        let cache = Arc::new(ViewCache::new(provider, Arc::new(StaticProbe(true)), 10));

        let rows = load_home_rows(cache).await;

        let failed: Vec<_> = rows.iter().filter(|row| row.error.is_some()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].title, "Shooter");
        assert!(rows[0].error.is_none());
        assert!(!rows[0].has_more);
    }
}
