#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Ocean Descent.
//!
//! The [`World`] owns the layer object store, the viewport state and the
//! selection tracker. Adapters mutate it exclusively through [`apply`] and
//! read it through the [`query`] module.

pub mod config;
pub mod depth;
pub mod scaler;
pub mod selection;
pub mod store;
pub mod viewport;

use ocean_descent_core::{Command, Event, LayerTables};

pub use config::{ConfigError, WorldConfig};
pub use depth::{LayerTransition, ViewportState};
pub use scaler::{CoordinateScaler, ScaledPlacement};
pub use selection::{SelectResult, SelectionTracker};
pub use store::{BuildReport, CategoryObjects, LayerObjectStore};

/// Represents the authoritative Ocean Descent world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    scaler: CoordinateScaler,
    store: LayerObjectStore,
    viewport: ViewportState,
    selection: SelectionTracker,
    build_report: BuildReport,
}

impl World {
    /// Validates the configuration and builds the object store from the
    /// per-layer record tables.
    pub fn new(config: WorldConfig, tables: &LayerTables) -> Result<Self, ConfigError> {
        config.validate()?;
        let scaler = CoordinateScaler::new(config.play_grid(), config.source_grid());
        let (store, build_report) = LayerObjectStore::build(tables, config.layer_count, &scaler);
        tracing::info!(
            placed = build_report.placed(),
            skipped = build_report.skipped_total(),
            layers = config.layer_count,
            scale = scaler.scale(),
            "built layer object store"
        );

        Ok(Self {
            viewport: ViewportState::new(config.layer_count),
            selection: SelectionTracker::new(),
            config,
            scaler,
            store,
            build_report,
        })
    }

    fn radius(&self) -> u32 {
        viewport::radius_for_layer(
            self.viewport.layer(),
            self.config.layer_count,
            self.config.top_radius,
            self.config.min_radius,
        )
    }

    fn record_transition(&self, transition: LayerTransition, out_events: &mut Vec<Event>) {
        if let Some(center) = transition.recentered {
            out_events.push(Event::ViewportCentered { center });
        }
        let radius = self.radius();
        tracing::debug!(
            from = transition.from.get(),
            to = transition.to.get(),
            radius,
            "layer changed"
        );
        out_events.push(Event::LayerChanged {
            from: transition.from,
            to: transition.to,
            radius,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let grid = world.config.play_grid();
    match command {
        Command::SelectCell { cell } => {
            let radius = world.radius();
            let center = world.viewport.center();
            match world.selection.select_cell(cell, center, radius, grid) {
                SelectResult::Bootstrapped { cell } => {
                    let _ = world.viewport.establish_center(cell);
                    out_events.push(Event::ViewportCentered { center: cell });
                    out_events.push(Event::CellSelected {
                        cell,
                        previous: None,
                        bootstrap: true,
                    });
                }
                SelectResult::Accepted {
                    cell,
                    previous,
                    fuel_cost,
                } => {
                    out_events.push(Event::CellSelected {
                        cell,
                        previous,
                        bootstrap: false,
                    });
                    if let Some(amount) = fuel_cost {
                        out_events.push(Event::FuelConsumed { amount });
                    }
                    let layer = world.viewport.layer();
                    if let Some(object) = world.store.collect_at(layer, cell) {
                        tracing::debug!(
                            layer = layer.get(),
                            id = object.id.get(),
                            category = ?object.category,
                            "collected object"
                        );
                        out_events.push(Event::ObjectCollected { layer, object });
                    }
                }
                SelectResult::Rejected(reason) => {
                    tracing::trace!(?cell, ?reason, "selection rejected");
                    out_events.push(Event::SelectionRejected { cell, reason });
                }
            }
        }
        Command::Descend => {
            let selected = world.selection.selected();
            match world.viewport.descend(selected) {
                Some(transition) => world.record_transition(transition, out_events),
                None => tracing::trace!("already at the deepest layer"),
            }
        }
        Command::Ascend => match world.viewport.ascend() {
            Some(transition) => world.record_transition(transition, out_events),
            None => tracing::trace!("already at the surface"),
        },
        Command::Drift { to } => {
            let radius = world.radius();
            let center = world.viewport.center();
            match world.selection.drift_to(to, center, radius, grid) {
                Ok(from) => out_events.push(Event::SelectionDrifted { from, to }),
                Err(reason) => out_events.push(Event::DriftRejected { to, reason }),
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ocean_descent_core::{CellCoord, GridDimensions, Layer, ViewportBounds};

    use super::{viewport, BuildReport, CategoryObjects, World, WorldConfig};

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Dimensions of the play grid.
    #[must_use]
    pub fn play_grid(world: &World) -> GridDimensions {
        world.config.play_grid()
    }

    /// Scale between source and play coordinates.
    #[must_use]
    pub fn scale(world: &World) -> u32 {
        world.scaler.scale()
    }

    /// Layer currently shown.
    #[must_use]
    pub fn layer(world: &World) -> Layer {
        world.viewport.layer()
    }

    /// Number of layers in the world.
    #[must_use]
    pub fn layer_count(world: &World) -> u32 {
        world.config.layer_count
    }

    /// Depth of the current layer in meters.
    #[must_use]
    pub fn depth_meters(world: &World) -> u32 {
        world.viewport.depth_meters()
    }

    /// Viewport radius of the current layer.
    #[must_use]
    pub fn radius(world: &World) -> u32 {
        world.radius()
    }

    /// Cell the viewport is anchored on, if any.
    #[must_use]
    pub fn viewport_center(world: &World) -> Option<CellCoord> {
        world.viewport.center()
    }

    /// Inclusive visible rectangle of the play grid.
    #[must_use]
    pub fn viewport_bounds(world: &World) -> ViewportBounds {
        viewport::bounds(
            world.viewport.center(),
            world.radius(),
            world.config.play_grid(),
        )
    }

    /// Reports whether the cell is currently visible.
    #[must_use]
    pub fn is_visible(world: &World, cell: CellCoord) -> bool {
        viewport::is_visible(cell, world.viewport.center(), world.radius())
    }

    /// Currently selected cell.
    #[must_use]
    pub fn selected(world: &World) -> Option<CellCoord> {
        world.selection.selected()
    }

    /// Cell selected before the current one.
    #[must_use]
    pub fn previous_selected(world: &World) -> Option<CellCoord> {
        world.selection.previous_selected()
    }

    /// Objects remaining in the current layer.
    #[must_use]
    pub fn current_objects(world: &World) -> &CategoryObjects {
        world.store.objects_for(world.viewport.layer())
    }

    /// Objects remaining in the provided layer; empty for unknown layers.
    #[must_use]
    pub fn objects_for(world: &World, layer: Layer) -> &CategoryObjects {
        world.store.objects_for(layer)
    }

    /// Number of objects remaining in the provided layer.
    #[must_use]
    pub fn remaining_objects(world: &World, layer: Layer) -> usize {
        world.store.remaining(layer)
    }

    /// Summary of the object store build.
    #[must_use]
    pub fn build_report(world: &World) -> &BuildReport {
        &world.build_report
    }
}
