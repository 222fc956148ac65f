use crate::cli::GameArgs;
use crate::client::{AppContext, CliResult};
use crate::output::{GameReport, render_game, render_notice};

pub(crate) async fn handle_game(ctx: &AppContext, args: GameArgs) -> CliResult<()> {
    if !ctx.catalog_enabled() {
        return render_notice(&AppContext::disabled_hint(), ctx.output);
    }

    let (details, screenshots) = tokio::try_join!(
        ctx.rawg.game_details(args.id),
        ctx.rawg.screenshots(args.id)
    )?;
    render_game(
        &GameReport {
            details,
            screenshots,
        },
        ctx.output,
    )
}
