//! Random pick with a reel for animated reveal.
//!
//! A spin snapshots the wishlist, draws the winner, and fills a fixed-length
//! reel with independent draws, forcing the centre slot to the winner. The
//! winner and the filler come from separate random sources so tests can pin
//! one while varying the other.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use reelpick_catalog::Item;
use serde::Serialize;
use tracing::info;

use crate::error::PickerError;
use crate::store::{WishlistStore, pick_uniform};

/// Number of slots on the reel.
pub const REEL_LENGTH: usize = 50;
/// Slot that always holds the winner.
pub const REEL_CENTER: usize = REEL_LENGTH / 2;
/// Advisory animation length for presenters.
pub const SPIN_DURATION: Duration = Duration::from_millis(4_000);

type RandomSource = Box<dyn RngCore + Send>;

/// Lifecycle of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    /// No active pool.
    Idle,
    /// Pool built; the presenter is animating.
    Spinning,
    /// Animation finished; the winner is shown.
    Revealed,
}

/// Outcome of one spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spin {
    /// Reel contents; `pool[center]` is the winner.
    pub pool: Vec<Item>,
    /// Index of the winning slot.
    pub center: usize,
    /// The picked item.
    pub winner: Item,
}

/// Builds reels and tracks the active spin.
pub struct PickerEngine {
    winner_rng: RandomSource,
    filler_rng: RandomSource,
    phase: SpinPhase,
    current: Option<Spin>,
}

impl PickerEngine {
    /// Engine seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(
            Box::new(StdRng::from_os_rng()),
            Box::new(StdRng::from_os_rng()),
        )
    }

    /// Engine with reproducible draws derived from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_sources(
            Box::new(StdRng::seed_from_u64(seed)),
            Box::new(StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x5eed)),
        )
    }

    /// Engine drawing the winner from `winner_rng` and filler from `filler_rng`.
    #[must_use]
    pub fn with_sources(winner_rng: RandomSource, filler_rng: RandomSource) -> Self {
        Self {
            winner_rng,
            filler_rng,
            phase: SpinPhase::Idle,
            current: None,
        }
    }

    /// Start a spin over the current contents of `store`.
    ///
    /// # Errors
    ///
    /// [`PickerError::SpinInProgress`] while a spin is animating, and
    /// [`PickerError::EmptyWishlist`] when there is nothing to pick. Neither
    /// changes the engine state.
    pub fn spin(&mut self, store: &WishlistStore) -> Result<&Spin, PickerError> {
        self.spin_over(&store.list())
    }

    /// Start a spin over an explicit wishlist snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Self::spin`].
    pub fn spin_over(&mut self, snapshot: &[Item]) -> Result<&Spin, PickerError> {
        if self.phase == SpinPhase::Spinning {
            return Err(PickerError::SpinInProgress);
        }
        let winner = pick_uniform(snapshot, &mut self.winner_rng)
            .cloned()
            .ok_or(PickerError::EmptyWishlist)?;

        let mut pool = Vec::with_capacity(REEL_LENGTH);
        for slot in 0..REEL_LENGTH {
            if slot == REEL_CENTER {
                pool.push(winner.clone());
            } else {
                let filler = snapshot[self.filler_rng.random_range(0..snapshot.len())].clone();
                pool.push(filler);
            }
        }

        info!(winner = winner.id, entries = snapshot.len(), "picker spin started");
        self.phase = SpinPhase::Spinning;
        Ok(self.current.insert(Spin {
            pool,
            center: REEL_CENTER,
            winner,
        }))
    }

    /// Mark the animation finished and return the winner.
    ///
    /// Returns `None` when no spin is active.
    pub fn finish(&mut self) -> Option<&Item> {
        if self.phase == SpinPhase::Spinning {
            self.phase = SpinPhase::Revealed;
        }
        self.current_winner()
    }

    /// Discard the active spin. Safe to call at any time.
    pub fn reset(&mut self) {
        self.phase = SpinPhase::Idle;
        self.current = None;
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Active spin, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Spin> {
        self.current.as_ref()
    }

    /// Reel of the active spin; empty when idle.
    #[must_use]
    pub fn current_pool(&self) -> &[Item] {
        match &self.current {
            Some(spin) => &spin.pool,
            None => &[],
        }
    }

    /// Winner of the active spin.
    #[must_use]
    pub fn current_winner(&self) -> Option<&Item> {
        self.current.as_ref().map(|spin| &spin.winner)
    }
}

impl Default for PickerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontal reel layout used to land the winner in the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelGeometry {
    /// Width of one slot.
    pub item_width: f64,
    /// Width of the visible window.
    pub viewport_width: f64,
}

impl ReelGeometry {
    /// Default slot width.
    pub const DEFAULT_ITEM_WIDTH: f64 = 200.0;

    /// Translation that centres slot `center` in the viewport.
    #[must_use]
    pub fn landing_offset(&self, center: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let center = center as f64;
        -(center * self.item_width - self.viewport_width / 2.0 + self.item_width / 2.0)
    }
}
