use std::sync::Arc;

use anyhow::anyhow;
use reelpick_catalog::{CatalogController, CatalogError, LoadOutcome};
use tracing::info;

use crate::cli::{BrowseArgs, view_from_args};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{BrowseReport, render_browse, render_notice};

pub(crate) async fn handle_browse(ctx: &AppContext, args: BrowseArgs) -> CliResult<()> {
    let view = view_from_args(args.kind, &args.param)?;
    if args.pages == 0 {
        return Err(CliError::validation("--pages must be at least 1"));
    }
    if !ctx.catalog_enabled() {
        return render_notice(&AppContext::disabled_hint(), ctx.output);
    }

    let controller = CatalogController::new(Arc::new(ctx.catalog_cache()), view);
    let (report, failure) = collect_pages(&controller, args.pages).await;
    render_browse(&report, ctx.output)?;

    match failure {
        Some(err) => Err(CliError::failure(anyhow!(
            "{}; loaded pages are kept, run the command again to retry",
            err.detail()
        ))),
        None => Ok(()),
    }
}

/// Load up to `pages` pages of the active view in sequence.
///
/// Stops at the first outcome that is not a loaded page. A provider failure
/// is returned alongside whatever was loaded before it.
pub(crate) async fn collect_pages(
    controller: &CatalogController,
    pages: u32,
) -> (BrowseReport, Option<CatalogError>) {
    let mut outcomes = Vec::new();
    let mut failure = None;

    for _ in 0..pages {
        match controller.load_more().await {
            Ok(
                outcome @ (LoadOutcome::Exhausted
                | LoadOutcome::Unavailable
                | LoadOutcome::Discarded { .. }),
            ) => {
                outcomes.push(outcome);
                break;
            }
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let status = controller.status();
    info!(view = %status.view, items = status.items, pages = status.pages, "browse finished");
    let report = BrowseReport {
        status,
        outcomes,
        items: controller.items(),
    };
    (report, failure)
}
