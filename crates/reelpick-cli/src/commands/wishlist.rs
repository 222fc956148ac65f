use reelpick_wishlist::PickerError;

use crate::cli::GameArgs;
use crate::client::{AppContext, CliResult};
use crate::output::{MutationReport, render_item, render_mutation, render_notice, render_wishlist};

pub(crate) fn handle_wishlist_list(ctx: &AppContext) -> CliResult<()> {
    render_wishlist(&ctx.wishlist().list(), ctx.output)
}

pub(crate) async fn handle_wishlist_add(ctx: &AppContext, args: GameArgs) -> CliResult<()> {
    let store = ctx.wishlist();
    if store.contains(args.id) {
        return render_mutation(
            &MutationReport {
                action: "add",
                id: Some(args.id),
                changed: false,
                size: store.len(),
            },
            ctx.output,
        );
    }
    if !ctx.catalog_enabled() {
        return render_notice(&AppContext::disabled_hint(), ctx.output);
    }

    let details = ctx.rawg.game_details(args.id).await?;
    let changed = store.add(details.item)?;
    render_mutation(
        &MutationReport {
            action: "add",
            id: Some(args.id),
            changed,
            size: store.len(),
        },
        ctx.output,
    )
}

pub(crate) fn handle_wishlist_remove(ctx: &AppContext, args: GameArgs) -> CliResult<()> {
    let store = ctx.wishlist();
    let changed = store.remove(args.id)?;
    render_mutation(
        &MutationReport {
            action: "remove",
            id: Some(args.id),
            changed,
            size: store.len(),
        },
        ctx.output,
    )
}

pub(crate) fn handle_wishlist_clear(ctx: &AppContext) -> CliResult<()> {
    let store = ctx.wishlist();
    let changed = !store.is_empty();
    store.clear()?;
    render_mutation(
        &MutationReport {
            action: "clear",
            id: None,
            changed,
            size: 0,
        },
        ctx.output,
    )
}

pub(crate) fn handle_wishlist_random(ctx: &AppContext) -> CliResult<()> {
    let item = ctx
        .wishlist()
        .pick_random()
        .ok_or(PickerError::EmptyWishlist)?;
    render_item(&item, ctx.output)
}
