//! Fixed session configuration validated before the world is built.

use ocean_descent_core::GridDimensions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PLAY_EXTENT: u32 = 200;
const DEFAULT_SOURCE_EXTENT: u32 = 50;
const DEFAULT_LAYER_COUNT: u32 = 6;
const DEFAULT_TOP_RADIUS: u32 = 75;
const DEFAULT_MIN_RADIUS: u32 = 20;

/// Grid sizes, layer count and viewport radii for a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of columns on the play grid.
    pub play_columns: u32,
    /// Number of rows on the play grid.
    pub play_rows: u32,
    /// Number of columns in the authored source grid.
    pub source_columns: u32,
    /// Number of rows in the authored source grid.
    pub source_rows: u32,
    /// Number of depth layers.
    pub layer_count: u32,
    /// Viewport radius at the surface layer.
    pub top_radius: u32,
    /// Viewport radius at the deepest layer.
    pub min_radius: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            play_columns: DEFAULT_PLAY_EXTENT,
            play_rows: DEFAULT_PLAY_EXTENT,
            source_columns: DEFAULT_SOURCE_EXTENT,
            source_rows: DEFAULT_SOURCE_EXTENT,
            layer_count: DEFAULT_LAYER_COUNT,
            top_radius: DEFAULT_TOP_RADIUS,
            min_radius: DEFAULT_MIN_RADIUS,
        }
    }
}

impl WorldConfig {
    /// Rejects configurations that no session can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.play_columns == 0 || self.play_rows == 0 {
            return Err(ConfigError::EmptyPlayGrid {
                columns: self.play_columns,
                rows: self.play_rows,
            });
        }
        if self.source_columns == 0 || self.source_rows == 0 {
            return Err(ConfigError::EmptySourceGrid {
                columns: self.source_columns,
                rows: self.source_rows,
            });
        }
        if self.layer_count == 0 {
            return Err(ConfigError::NoLayers);
        }
        Ok(())
    }

    /// Dimensions of the play grid.
    #[must_use]
    pub const fn play_grid(&self) -> GridDimensions {
        GridDimensions::new(self.play_columns, self.play_rows)
    }

    /// Dimensions of the authored source grid.
    #[must_use]
    pub const fn source_grid(&self) -> GridDimensions {
        GridDimensions::new(self.source_columns, self.source_rows)
    }
}

/// Configuration mistakes detected when the world is built.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The play grid has no cells.
    #[error("play grid must have at least one column and one row (got {columns}x{rows})")]
    EmptyPlayGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The source grid has no cells.
    #[error("source grid must have at least one column and one row (got {columns}x{rows})")]
    EmptySourceGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The layer count is zero.
    #[error("layer count must be at least 1")]
    NoLayers,
}
