use crate::client::{AppContext, CliResult};
use crate::output::{render_classifications, render_notice};

pub(crate) async fn handle_genres(ctx: &AppContext) -> CliResult<()> {
    if !ctx.catalog_enabled() {
        return render_notice(&AppContext::disabled_hint(), ctx.output);
    }
    let genres = ctx.rawg.genres().await?;
    render_classifications(&genres, ctx.output)
}

pub(crate) async fn handle_platforms(ctx: &AppContext) -> CliResult<()> {
    if !ctx.catalog_enabled() {
        return render_notice(&AppContext::disabled_hint(), ctx.output);
    }
    let platforms = ctx.rawg.platforms().await?;
    render_classifications(&platforms, ctx.output)
}
