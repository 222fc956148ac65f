use std::time::Duration;

use anyhow::anyhow;
use reelpick_wishlist::{PickerEngine, ReelGeometry, SPIN_DURATION, Spin};
use tokio::time::sleep;

use crate::cli::{OutputFormat, PickArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{PickReport, reel_window, render_pick};

/// Slots shown on each side of the winner.
const WINDOW_RADIUS: usize = 3;

pub(crate) async fn handle_pick(ctx: &AppContext, args: PickArgs) -> CliResult<()> {
    let geometry = args.viewport_width.map(reel_geometry).transpose()?;
    let store = ctx.wishlist();
    let mut engine = args.seed.map_or_else(PickerEngine::new, PickerEngine::seeded);

    let spin = engine.spin(&store)?.clone();
    if args.animate && ctx.output == OutputFormat::Table {
        animate(&spin).await;
    }
    let winner = engine
        .finish()
        .cloned()
        .ok_or_else(|| CliError::failure(anyhow!("picker finished without a winner")))?;

    render_pick(
        &PickReport {
            winner,
            center: spin.center,
            candidates: store.len(),
            window: reel_window(&spin.pool, spin.center, WINDOW_RADIUS),
            landing_offset: geometry.map(|geometry| geometry.landing_offset(spin.center)),
        },
        ctx.output,
    )
}

fn reel_geometry(viewport_width: f64) -> CliResult<ReelGeometry> {
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
        return Err(CliError::validation(format!(
            "viewport width must be a positive number, got {viewport_width}"
        )));
    }
    Ok(ReelGeometry {
        item_width: ReelGeometry::DEFAULT_ITEM_WIDTH,
        viewport_width,
    })
}

async fn animate(spin: &Spin) {
    let slots = &spin.pool[..=spin.center.min(spin.pool.len().saturating_sub(1))];
    for (item, delay) in slots.iter().zip(reveal_schedule(slots.len())) {
        println!("  {}", item.name);
        sleep(delay).await;
    }
}

/// Per-slot delays that slow down towards the winner and add up to
/// [`SPIN_DURATION`].
///
/// Slot `i` waits in proportion to `(i + 1)^2`; rounding slack goes to the
/// final slot.
pub(crate) fn reveal_schedule(steps: usize) -> Vec<Duration> {
    if steps == 0 {
        return Vec::new();
    }
    let total = u64::try_from(SPIN_DURATION.as_millis()).unwrap_or(u64::MAX);
    let steps = u64::try_from(steps).unwrap_or(u64::MAX);
    let weights: Vec<u64> = (1..=steps).map(|step| step * step).collect();
    let weight_sum: u64 = weights.iter().sum();

    let mut delays: Vec<u64> = weights
        .iter()
        .map(|weight| total * weight / weight_sum)
        .collect();
    let assigned: u64 = delays.iter().sum();
    if let Some(last) = delays.last_mut() {
        *last += total - assigned;
    }
    delays.into_iter().map(Duration::from_millis).collect()
}
