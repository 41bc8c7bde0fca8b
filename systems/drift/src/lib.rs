#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Current-driven drift system.
//!
//! On every tick the system samples the ocean current beneath the selected
//! cell, picks one of eight compass headings at random and proposes a
//! [`Command::Drift`] to wherever the current carries the selection. The world
//! decides whether the move is legal.

use ocean_descent_core::{CellCoord, Command, CurrentField};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Unit steps for the eight compass headings, as `(column, row)` deltas.
pub const COMPASS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Fractional part above which a drifted coordinate rounds up.
const ROUNDING_THRESHOLD: f32 = 0.5;

/// Settings controlling drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Whether ticks move the selection at all.
    pub enabled: bool,
    /// Seed for heading selection.
    pub seed: u64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 0,
        }
    }
}

/// Pure system that proposes drift commands from the current field.
#[derive(Clone, Debug)]
pub struct Drift {
    rng: ChaCha8Rng,
}

impl Drift {
    /// Creates a drift system with a deterministic heading sequence.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits at most one drift command for the selected play cell.
    ///
    /// `scale` converts play coordinates back to the source grid the current
    /// field is keyed by. Nothing is emitted without a selection, without a
    /// current sample, or when the drifted cell would be negative or equal to
    /// the selection.
    pub fn handle(
        &mut self,
        selected: Option<CellCoord>,
        currents: &CurrentField,
        scale: u32,
        out: &mut Vec<Command>,
    ) {
        let Some(selected) = selected else {
            return;
        };
        let scale = scale.max(1);
        let source = CellCoord::new(selected.column() / scale, selected.row() / scale);
        let Some(current) = currents.at(source) else {
            tracing::trace!(?source, "no current sampled beneath selection");
            return;
        };
        let Some(&(dx, dy)) = COMPASS.choose(&mut self.rng) else {
            return;
        };

        let column = round_by_threshold(selected.column() as f32 + f32::from(dx) * current.u_mps);
        let row = round_by_threshold(selected.row() as f32 + f32::from(dy) * current.v_mps);
        if column < 0.0 || row < 0.0 {
            tracing::trace!(column, row, "drift would leave the grid");
            return;
        }

        let to = CellCoord::new(column as u32, row as u32);
        if to != selected {
            out.push(Command::Drift { to });
        }
    }
}

/// Rounds up only when the fractional part exceeds one half.
#[must_use]
pub fn round_by_threshold(value: f32) -> f32 {
    let floor = value.floor();
    if value - floor > ROUNDING_THRESHOLD {
        floor + 1.0
    } else {
        floor
    }
}
