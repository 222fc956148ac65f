//! Command-line entrypoint: argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reelpick_catalog::View;
use reelpick_config::AppConfig;
use reelpick_telemetry::{
    LoggingConfig, build_sha, current_command, current_trace_id, init_logging, new_trace_id,
    with_invocation_context,
};

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::browse::handle_browse;
use crate::commands::catalog::{handle_genres, handle_platforms};
use crate::commands::game::handle_game;
use crate::commands::home::handle_home;
use crate::commands::pick::handle_pick;
use crate::commands::wishlist::{
    handle_wishlist_add, handle_wishlist_clear, handle_wishlist_list, handle_wishlist_random,
    handle_wishlist_remove,
};

/// Parses CLI arguments, executes the requested command inside an invocation
/// span, and returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);

    let ctx = match prepare(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let trace_id = new_trace_id();
    with_invocation_context(trace_id, command_name, async {
        match dispatch(cli.command, &ctx).await {
            Ok(()) => 0,
            Err(err) => {
                for line in error_report(&err) {
                    eprintln!("{line}");
                }
                err.exit_code()
            }
        }
    })
    .await
}

/// Lines printed for a failed command. Runtime failures also carry the
/// invocation's trace id so they can be matched against the logs.
pub(crate) fn error_report(err: &CliError) -> Vec<String> {
    tracing::debug!(
        command = current_command().as_deref().unwrap_or("unknown"),
        exit_code = err.exit_code(),
        "command failed"
    );
    let mut lines = vec![format!("error: {}", err.display_message())];
    if let (CliError::Failure(_), Some(trace_id)) = (err, current_trace_id()) {
        lines.push(format!("trace id: {trace_id}"));
    }
    lines
}

fn prepare(cli: &Cli) -> CliResult<AppContext> {
    let config = AppConfig::from_env()?
        .with_api_key(cli.api_key.clone())
        .with_data_dir(cli.data_dir.clone())
        .with_log_level(cli.log_level.clone())
        .with_page_size(cli.page_size)?;

    init_logging(&LoggingConfig {
        level: &config.log_level,
        format: config.log_format,
        build_sha: build_sha(),
    })
    .map_err(CliError::failure)?;

    AppContext::new(config, cli.output)
}

pub(crate) async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Browse(args) => handle_browse(ctx, args).await,
        Command::Home => handle_home(ctx).await,
        Command::Game(args) => handle_game(ctx, args).await,
        Command::Genres => handle_genres(ctx).await,
        Command::Platforms => handle_platforms(ctx).await,
        Command::Wishlist(wishlist) => match wishlist {
            WishlistCommand::List => handle_wishlist_list(ctx),
            WishlistCommand::Add(args) => handle_wishlist_add(ctx, args).await,
            WishlistCommand::Remove(args) => handle_wishlist_remove(ctx, args),
            WishlistCommand::Clear => handle_wishlist_clear(ctx),
            WishlistCommand::Random => handle_wishlist_random(ctx),
        },
        Command::Pick(args) => handle_pick(ctx, args).await,
    }
}

#[derive(Parser)]
#[command(
    name = "reelpick",
    version,
    about = "Browse the RAWG game catalog and pick your next game from a wishlist"
)]
pub(crate) struct Cli {
    /// RAWG API key; overrides `RAWG_API_KEY`.
    #[arg(long, global = true)]
    pub(crate) api_key: Option<String>,
    /// Directory holding the wishlist record; overrides `REELPICK_DATA_DIR`.
    #[arg(long, global = true)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Items requested per catalog page; overrides `REELPICK_PAGE_SIZE`.
    #[arg(long, global = true)]
    pub(crate) page_size: Option<u32>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    /// Log filter for stderr output; overrides `REELPICK_LOG_LEVEL`.
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Page through one catalog view.
    Browse(BrowseArgs),
    /// Show the first page of every home row.
    Home,
    /// Show details and screenshots for one game.
    Game(GameArgs),
    /// List the genre catalog.
    Genres,
    /// List the platform catalog.
    Platforms,
    /// Manage the persisted wishlist.
    #[command(subcommand)]
    Wishlist(WishlistCommand),
    /// Spin the picker over the wishlist.
    Pick(PickArgs),
}

#[derive(Subcommand)]
pub(crate) enum WishlistCommand {
    /// Show saved games in the order they were added.
    List,
    /// Fetch a game by id and save it.
    Add(GameArgs),
    /// Remove a saved game.
    Remove(GameArgs),
    /// Remove every saved game.
    Clear,
    /// Show one saved game chosen uniformly at random.
    Random,
}

#[derive(Args)]
pub(crate) struct BrowseArgs {
    #[arg(value_enum)]
    pub(crate) kind: ViewKind,
    /// Genre or platform id, or search text.
    pub(crate) param: Vec<String>,
    /// Number of pages to load in sequence.
    #[arg(long, default_value_t = 1)]
    pub(crate) pages: u32,
}

#[derive(Args, Clone, Copy)]
pub(crate) struct GameArgs {
    /// RAWG game id.
    pub(crate) id: u64,
}

#[derive(Args, Clone, Copy)]
pub(crate) struct PickArgs {
    /// Seed both random sources for a reproducible spin.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Step through the reel before revealing the winner.
    #[arg(long)]
    pub(crate) animate: bool,
    /// Viewport width in pixels; adds the reel's landing offset to the report.
    #[arg(long)]
    pub(crate) viewport_width: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ViewKind {
    Popular,
    Trending,
    Genre,
    Platform,
    Search,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Build the view named on the command line.
///
/// Zero ids and blank search text are passed through; the catalog reports
/// such views as unavailable instead of fetching them.
pub(crate) fn view_from_args(kind: ViewKind, param: &[String]) -> CliResult<View> {
    match kind {
        ViewKind::Popular | ViewKind::Trending if !param.is_empty() => Err(CliError::validation(
            format!("{} does not take a parameter", kind_name(kind)),
        )),
        ViewKind::Popular => Ok(View::Popular),
        ViewKind::Trending => Ok(View::Trending),
        ViewKind::Genre => parse_id(kind, param).map(View::Genre),
        ViewKind::Platform => parse_id(kind, param).map(View::Platform),
        ViewKind::Search => {
            if param.is_empty() {
                return Err(CliError::validation("search requires text"));
            }
            Ok(View::search(param.join(" ")))
        }
    }
}

fn parse_id(kind: ViewKind, param: &[String]) -> CliResult<u64> {
    match param {
        [raw] => raw.trim().parse().map_err(|_| {
            CliError::validation(format!("{} id must be a number, got '{raw}'", kind_name(kind)))
        }),
        [] => Err(CliError::validation(format!(
            "{} requires an id",
            kind_name(kind)
        ))),
        _ => Err(CliError::validation(format!(
            "{} takes exactly one id",
            kind_name(kind)
        ))),
    }
}

const fn kind_name(kind: ViewKind) -> &'static str {
    match kind {
        ViewKind::Popular => "popular",
        ViewKind::Trending => "trending",
        ViewKind::Genre => "genre",
        ViewKind::Platform => "platform",
        ViewKind::Search => "search",
    }
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Browse(args) => match args.kind {
            ViewKind::Popular => "browse_popular",
            ViewKind::Trending => "browse_trending",
            ViewKind::Genre => "browse_genre",
            ViewKind::Platform => "browse_platform",
            ViewKind::Search => "browse_search",
        },
        Command::Home => "home",
        Command::Game(_) => "game",
        Command::Genres => "genres",
        Command::Platforms => "platforms",
        Command::Wishlist(WishlistCommand::List) => "wishlist_list",
        Command::Wishlist(WishlistCommand::Add(_)) => "wishlist_add",
        Command::Wishlist(WishlistCommand::Remove(_)) => "wishlist_remove",
        Command::Wishlist(WishlistCommand::Clear) => "wishlist_clear",
        Command::Wishlist(WishlistCommand::Random) => "wishlist_random",
        Command::Pick(_) => "pick",
    }
}
