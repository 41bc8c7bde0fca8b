#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Heads-up display system tracking the submersible's meters.
//!
//! The HUD never touches the world. It folds broadcast [`Event`] values into
//! hull, fuel and depth readings plus a per-category tally of collected
//! objects.

use std::collections::BTreeMap;

use ocean_descent_core::{Category, Event, Layer};
use serde::{Deserialize, Serialize};

/// Upper bound of the hull and fuel meters.
pub const METER_MAX: f32 = 100.0;

/// Starting values for the meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Hull integrity at the start of a dive.
    pub starting_hull: f32,
    /// Fuel at the start of a dive.
    pub starting_fuel: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            starting_hull: METER_MAX,
            starting_fuel: METER_MAX,
        }
    }
}

/// Snapshot of the values shown on the HUD panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceMeters {
    /// Hull integrity between 0 and 100.
    pub hull: f32,
    /// Remaining fuel between 0 and 100.
    pub fuel: f32,
    /// Depth of the active layer in meters.
    pub depth_meters: u32,
}

/// Event driven HUD state.
#[derive(Clone, Debug)]
pub struct Hud {
    meters: ResourceMeters,
    tally: BTreeMap<Category, u32>,
}

impl Hud {
    /// Creates a HUD for a dive starting on the surface layer.
    #[must_use]
    pub fn new(config: HudConfig) -> Self {
        Self {
            meters: ResourceMeters {
                hull: config.starting_hull.clamp(0.0, METER_MAX),
                fuel: config.starting_fuel.clamp(0.0, METER_MAX),
                depth_meters: Layer::SURFACE.depth_meters(),
            },
            tally: BTreeMap::new(),
        }
    }

    /// Folds a batch of world events into the meters.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::FuelConsumed { amount } => {
                    self.meters.fuel = (self.meters.fuel - amount).max(0.0);
                    if self.fuel_depleted() {
                        tracing::info!("fuel depleted");
                    }
                }
                Event::ObjectCollected { object, .. } => {
                    *self.tally.entry(object.category).or_insert(0) += 1;
                }
                Event::LayerChanged { to, .. } => {
                    self.meters.depth_meters = to.depth_meters();
                }
                _ => {}
            }
        }
    }

    /// Adds fuel, capped at [`METER_MAX`]. Negative amounts are ignored.
    pub fn refuel(&mut self, amount: f32) {
        if amount <= 0.0 || !amount.is_finite() {
            return;
        }
        self.meters.fuel = (self.meters.fuel + amount).min(METER_MAX);
    }

    /// Reports whether the fuel meter reached zero.
    #[must_use]
    pub fn fuel_depleted(&self) -> bool {
        self.meters.fuel <= 0.0
    }

    /// Current meter readings.
    #[must_use]
    pub fn meters(&self) -> ResourceMeters {
        self.meters
    }

    /// Number of collected objects per category.
    #[must_use]
    pub fn tally(&self) -> &BTreeMap<Category, u32> {
        &self.tally
    }

    /// Total number of collected objects.
    #[must_use]
    pub fn collected_total(&self) -> u32 {
        self.tally.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ocean_descent_core::{
        CellCoord, CellRect, CellRectSize, ObjectId, PlacedObject,
    };

    use super::*;

    fn collected(category: Category) -> Event {
        Event::ObjectCollected {
            layer: Layer::new(1),
            object: PlacedObject {
                id: ObjectId::new(0),
                category,
                source: CellCoord::new(0, 0),
                footprint: CellRect::from_origin_and_size(
                    CellCoord::new(0, 0),
                    CellRectSize::new(4, 4),
                ),
                attributes: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn starts_full_at_the_surface() {
        let hud = Hud::new(HudConfig::default());
        let meters = hud.meters();
        assert_eq!(meters.hull, 100.0);
        assert_eq!(meters.fuel, 100.0);
        assert_eq!(meters.depth_meters, 100);
        assert!(!hud.fuel_depleted());
    }

    #[test]
    fn fuel_never_drops_below_zero() {
        let mut hud = Hud::new(HudConfig {
            starting_fuel: 1.0,
            ..HudConfig::default()
        });
        hud.handle(&[
            Event::FuelConsumed { amount: 0.75 },
            Event::FuelConsumed { amount: 0.75 },
        ]);
        assert_eq!(hud.meters().fuel, 0.0);
        assert!(hud.fuel_depleted());
    }

    #[test]
    fn refuel_is_capped() {
        let mut hud = Hud::new(HudConfig {
            starting_fuel: 40.0,
            ..HudConfig::default()
        });
        hud.refuel(25.0);
        assert_eq!(hud.meters().fuel, 65.0);
        hud.refuel(-10.0);
        assert_eq!(hud.meters().fuel, 65.0, "negative refuel is ignored");
        hud.refuel(500.0);
        assert_eq!(hud.meters().fuel, 100.0);
    }

    #[test]
    fn layer_changes_update_depth() {
        let mut hud = Hud::new(HudConfig::default());
        hud.handle(&[Event::LayerChanged {
            from: Layer::new(1),
            to: Layer::new(4),
            radius: 42,
        }]);
        assert_eq!(hud.meters().depth_meters, 400);
    }

    #[test]
    fn collections_are_tallied_by_category() {
        let mut hud = Hud::new(HudConfig::default());
        hud.handle(&[
            collected(Category::Hazard),
            collected(Category::Life),
            collected(Category::Hazard),
        ]);
        assert_eq!(hud.tally().get(&Category::Hazard), Some(&2));
        assert_eq!(hud.tally().get(&Category::Life), Some(&1));
        assert_eq!(hud.tally().get(&Category::Coral), None);
        assert_eq!(hud.collected_total(), 3);
    }
}
