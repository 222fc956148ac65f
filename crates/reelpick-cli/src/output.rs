//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use reelpick_catalog::{Item, LoadOutcome, Screenshot, View, ViewStatus};
use reelpick_rawg::{Classification, GameDetails};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Items shown per home row in table output.
pub(crate) const HOME_ROW_PREVIEW: usize = 5;

/// Accumulated result of a `browse` invocation.
#[derive(Debug, Serialize)]
pub(crate) struct BrowseReport {
    pub(crate) status: ViewStatus,
    pub(crate) outcomes: Vec<LoadOutcome>,
    pub(crate) items: Vec<Item>,
}

/// One row of the home screen.
#[derive(Debug, Serialize)]
pub(crate) struct HomeRow {
    pub(crate) title: String,
    pub(crate) view: View,
    pub(crate) items: Vec<Item>,
    pub(crate) has_more: bool,
    pub(crate) error: Option<String>,
}

/// Details plus screenshots for one game.
#[derive(Debug, Serialize)]
pub(crate) struct GameReport {
    pub(crate) details: GameDetails,
    pub(crate) screenshots: Vec<Screenshot>,
}

/// Result of a wishlist mutation.
#[derive(Debug, Serialize)]
pub(crate) struct MutationReport {
    pub(crate) action: &'static str,
    pub(crate) id: Option<u64>,
    pub(crate) changed: bool,
    pub(crate) size: usize,
}

/// One visible reel slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ReelSlot {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) winner: bool,
}

/// Result of a picker spin.
#[derive(Debug, Serialize)]
pub(crate) struct PickReport {
    pub(crate) winner: Item,
    pub(crate) center: usize,
    pub(crate) candidates: usize,
    pub(crate) window: Vec<ReelSlot>,
    /// Reel translation in pixels that centres the winner, when a viewport
    /// width was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) landing_offset: Option<f64>,
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_notice(message: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "notice": message }))?,
        OutputFormat::Table => println!("{message}"),
    }
    Ok(())
}

pub(crate) fn render_browse(report: &BrowseReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            let status = &report.status;
            if !status.enabled {
                println!("{}: view is unavailable (missing parameter or API key)", status.view);
                return Ok(());
            }
            println!("{}", status_line(status));
            print_item_table(&report.items);
            if let Some(error) = &status.error {
                println!("last load failed: {error}");
            } else if status.has_more {
                println!("more results available (use --pages {})", status.pages + 1);
            } else {
                println!("end of results");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_home(rows: &[HomeRow], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(rows)?,
        OutputFormat::Table => {
            for (index, row) in rows.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                println!("== {} ==", row.title);
                if let Some(error) = &row.error {
                    println!("  unavailable: {error}");
                    continue;
                }
                for item in row.items.iter().take(HOME_ROW_PREVIEW) {
                    println!("  {}", item_row(item));
                }
                if row.items.len() > HOME_ROW_PREVIEW || row.has_more {
                    println!("  ... browse with `reelpick browse {}`", browse_hint(&row.view));
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn render_game(report: &GameReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            let details = &report.details;
            let item = &details.item;
            println!("id: {}", item.id);
            println!("name: {}", item.name);
            println!("released: {}", format_released(item));
            println!("rating: {:.2} / {}", item.rating, item.rating_top);
            if let Some(score) = item.metacritic {
                println!("metacritic: {score}");
            }
            if item.playtime > 0 {
                println!("playtime: {}h", item.playtime);
            }
            if !item.genres.is_empty() {
                println!("genres: {}", item.genre_names().join(", "));
            }
            if !item.platforms.is_empty() {
                println!("platforms: {}", item.platform_names().join(", "));
            }
            if let Some(rating) = &details.esrb_rating {
                println!("esrb: {}", rating.name);
            }
            if !details.alternative_names.is_empty() {
                println!("also known as: {}", details.alternative_names.join(", "));
            }
            for (label, link) in [
                ("website", &details.website),
                ("reddit", &details.reddit_url),
                ("metacritic url", &details.metacritic_url),
            ] {
                if let Some(link) = link.as_deref().filter(|link| !link.is_empty()) {
                    println!("{label}: {link}");
                }
            }
            if let Some(description) = details
                .description_raw
                .as_deref()
                .filter(|text| !text.trim().is_empty())
            {
                println!();
                println!("{}", description.trim());
            }
            if !report.screenshots.is_empty() {
                println!();
                println!("screenshots:");
                for shot in &report.screenshots {
                    println!("  {}", shot.image);
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn render_classifications(
    entries: &[Classification],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(entries)?,
        OutputFormat::Table => {
            println!("{:>6} {:>8} NAME", "ID", "GAMES");
            for entry in entries {
                println!("{:>6} {:>8} {}", entry.id, entry.games_count, entry.name);
            }
        }
    }
    Ok(())
}

pub(crate) fn render_wishlist(items: &[Item], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(items)?,
        OutputFormat::Table => {
            if items.is_empty() {
                println!("wishlist is empty");
            } else {
                print_item_table(items);
                println!("{} saved", items.len());
            }
        }
    }
    Ok(())
}

pub(crate) fn render_item(item: &Item, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(item)?,
        OutputFormat::Table => print_item_table(std::slice::from_ref(item)),
    }
    Ok(())
}

pub(crate) fn render_mutation(report: &MutationReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => println!("{}", mutation_line(report)),
    }
    Ok(())
}

pub(crate) fn render_pick(report: &PickReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            for slot in &report.window {
                let marker = if slot.winner { ">" } else { " " };
                println!("{marker} {:>2} {}", slot.index, slot.name);
            }
            println!();
            println!(
                "picked {} (#{}) from {} saved",
                report.winner.name, report.winner.id, report.candidates
            );
            if let Some(offset) = report.landing_offset {
                println!("landing offset: {offset}px");
            }
        }
    }
    Ok(())
}

/// Slots within `radius` of `center`, clamped to the pool.
pub(crate) fn reel_window(pool: &[Item], center: usize, radius: usize) -> Vec<ReelSlot> {
    let start = center.saturating_sub(radius);
    let end = center.saturating_add(radius).min(pool.len().saturating_sub(1));
    pool.get(start..=end)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(offset, item)| ReelSlot {
            index: start + offset,
            name: item.name.clone(),
            winner: start + offset == center,
        })
        .collect()
}

pub(crate) fn item_row(item: &Item) -> String {
    format!(
        "{:>8} {:>6.2} {:<10} {}",
        item.id,
        item.rating,
        format_released(item),
        item.name
    )
}

pub(crate) fn format_released(item: &Item) -> String {
    item.released
        .map_or_else(|| "-".to_string(), |date| date.format("%Y-%m-%d").to_string())
}

fn status_line(status: &ViewStatus) -> String {
    let total = status
        .total
        .map_or_else(String::new, |total| format!(" of {total}"));
    let pages = if status.pages == 1 { "page" } else { "pages" };
    format!(
        "{}: {} items{total} ({} {pages})",
        status.view, status.items, status.pages
    )
}

fn mutation_line(report: &MutationReport) -> String {
    let subject = report
        .id
        .map_or_else(|| "wishlist".to_string(), |id| format!("game {id}"));
    let verb = match (report.action, report.changed) {
        ("add", true) => "added to wishlist",
        ("add", false) => "already in wishlist",
        ("remove", true) => "removed from wishlist",
        ("remove", false) => "not in wishlist",
        (_, true) => "cleared",
        (_, false) => "already empty",
    };
    format!("{subject} {verb} ({} saved)", report.size)
}

fn browse_hint(view: &View) -> String {
    match view {
        View::Genre(id) | View::Platform(id) => format!("{} {id}", view.kind()),
        View::Search(text) => format!("search {text}"),
        View::Popular | View::Trending => view.kind().to_string(),
    }
}

fn print_item_table(items: &[Item]) {
    println!("{:>8} {:>6} {:<10} NAME", "ID", "RATING", "RELEASED");
    for item in items {
        println!("{}", item_row(item));
    }
}
