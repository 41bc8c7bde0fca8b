//! Viewport radius, bounds and visibility calculations.
//!
//! The viewport is a square around its center measured with the Chebyshev
//! distance. Near the grid edges it is truncated rather than shifted, so the
//! center always stays where the player put it.

use ocean_descent_core::{CellCoord, GridDimensions, Layer, ViewportBounds};

/// Radius for a layer, interpolated linearly from `top_radius` at the surface
/// to `min_radius` at the deepest layer.
///
/// Halfway values round to the nearest even radius. A single-layer world
/// always uses `min_radius`.
#[must_use]
pub fn radius_for_layer(layer: Layer, layer_count: u32, top_radius: u32, min_radius: u32) -> u32 {
    if layer_count <= 1 {
        return min_radius;
    }

    let steps = f64::from(layer_count - 1);
    let t = (f64::from(layer.get().saturating_sub(1)) / steps).clamp(0.0, 1.0);
    let radius = f64::from(top_radius) * (1.0 - t) + f64::from(min_radius) * t;
    radius.round_ties_even().max(0.0) as u32
}

/// Inclusive visible rectangle around `center`, clamped to the grid.
///
/// Without a center the whole grid is visible.
#[must_use]
pub fn bounds(center: Option<CellCoord>, radius: u32, grid: GridDimensions) -> ViewportBounds {
    let last_column = grid.columns().saturating_sub(1);
    let last_row = grid.rows().saturating_sub(1);
    let Some(center) = center else {
        return ViewportBounds::new(0, last_column, 0, last_row);
    };

    ViewportBounds::new(
        center.column().saturating_sub(radius),
        center.column().saturating_add(radius).min(last_column),
        center.row().saturating_sub(radius),
        center.row().saturating_add(radius).min(last_row),
    )
}

/// Reports whether the cell lies within `radius` of `center`.
#[must_use]
pub fn is_visible(cell: CellCoord, center: Option<CellCoord>, radius: u32) -> bool {
    center.map_or(true, |center| cell.chebyshev_distance(center) <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_interpolates_between_surface_and_floor() {
        assert_eq!(radius_for_layer(Layer::new(1), 6, 75, 20), 75);
        assert_eq!(radius_for_layer(Layer::new(2), 6, 75, 20), 64);
        assert_eq!(radius_for_layer(Layer::new(3), 6, 75, 20), 53);
        assert_eq!(radius_for_layer(Layer::new(6), 6, 75, 20), 20);
    }

    #[test]
    fn radius_clamps_outside_layer_range() {
        assert_eq!(radius_for_layer(Layer::new(0), 6, 75, 20), 75);
        assert_eq!(radius_for_layer(Layer::new(9), 6, 75, 20), 20);
    }

    #[test]
    fn radius_ties_round_to_even() {
        // 10 * 0.5 + 15 * 0.5 = 12.5
        assert_eq!(radius_for_layer(Layer::new(2), 3, 10, 15), 12);
        // 10 * 0.5 + 17 * 0.5 = 13.5
        assert_eq!(radius_for_layer(Layer::new(2), 3, 10, 17), 14);
    }

    #[test]
    fn single_layer_uses_min_radius() {
        assert_eq!(radius_for_layer(Layer::new(1), 1, 75, 20), 20);
        assert_eq!(radius_for_layer(Layer::new(1), 0, 75, 20), 20);
    }

    #[test]
    fn bounds_cover_grid_without_center() {
        let grid = GridDimensions::new(200, 150);
        assert_eq!(bounds(None, 5, grid), ViewportBounds::new(0, 199, 0, 149));
    }

    #[test]
    fn bounds_truncate_at_edges() {
        let grid = GridDimensions::new(200, 200);
        assert_eq!(
            bounds(Some(CellCoord::new(10, 10)), 20, grid),
            ViewportBounds::new(0, 30, 0, 30)
        );
        assert_eq!(
            bounds(Some(CellCoord::new(195, 100)), 20, grid),
            ViewportBounds::new(175, 199, 80, 120)
        );
    }

    #[test]
    fn visibility_uses_chebyshev_distance() {
        let center = Some(CellCoord::new(50, 50));
        assert!(is_visible(CellCoord::new(70, 70), center, 20));
        assert!(!is_visible(CellCoord::new(71, 50), center, 20));
        assert!(is_visible(CellCoord::new(199, 0), None, 0));
    }
}
