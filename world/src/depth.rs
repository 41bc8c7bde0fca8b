//! Layer state machine that owns the viewport center.

use ocean_descent_core::{CellCoord, Layer};

/// Current layer and viewport center.
///
/// The center is unset only until the first selection; afterwards it always
/// names an in-grid cell. The layer stays within `1..=layer_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportState {
    center: Option<CellCoord>,
    layer: Layer,
    layer_count: u32,
}

/// Outcome of a successful layer transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerTransition {
    /// Layer active before the transition.
    pub from: Layer,
    /// Layer active after the transition.
    pub to: Layer,
    /// New viewport center, when the transition moved it.
    pub recentered: Option<CellCoord>,
}

impl ViewportState {
    /// Starts at the surface with no center.
    #[must_use]
    pub fn new(layer_count: u32) -> Self {
        Self {
            center: None,
            layer: Layer::SURFACE,
            layer_count: layer_count.max(1),
        }
    }

    /// Layer currently shown.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// Deepest layer available.
    #[must_use]
    pub const fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Cell the viewport is anchored on, if any.
    #[must_use]
    pub const fn center(&self) -> Option<CellCoord> {
        self.center
    }

    /// Depth of the current layer in meters.
    #[must_use]
    pub const fn depth_meters(&self) -> u32 {
        self.layer.depth_meters()
    }

    /// Moves one layer deeper, recentering on the selection when present.
    ///
    /// Returns `None` at the deepest layer.
    pub fn descend(&mut self, selected: Option<CellCoord>) -> Option<LayerTransition> {
        if self.layer.get() >= self.layer_count {
            return None;
        }

        let from = self.layer;
        let recentered = selected.filter(|cell| self.center != Some(*cell));
        if let Some(cell) = selected {
            self.center = Some(cell);
        }
        self.layer = Layer::new(from.get() + 1);
        Some(LayerTransition {
            from,
            to: self.layer,
            recentered,
        })
    }

    /// Moves one layer shallower without moving the center.
    ///
    /// Returns `None` at the surface.
    pub fn ascend(&mut self) -> Option<LayerTransition> {
        if self.layer.get() <= 1 {
            return None;
        }

        let from = self.layer;
        self.layer = Layer::new(from.get() - 1);
        Some(LayerTransition {
            from,
            to: self.layer,
            recentered: None,
        })
    }

    /// Anchors the viewport for the first time.
    ///
    /// Returns `false` and leaves the center alone when one is already set.
    pub fn establish_center(&mut self, cell: CellCoord) -> bool {
        if self.center.is_some() {
            return false;
        }
        self.center = Some(cell);
        true
    }
}
