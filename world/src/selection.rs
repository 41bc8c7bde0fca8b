//! Selection tracking and movement cost accounting.

use ocean_descent_core::{CellCoord, GridDimensions, SelectionRejection};

use crate::viewport::is_visible;

/// Fuel spent per cell of straight-line travel between selections.
pub const FUEL_PER_CELL: f32 = 0.1;

/// Outcome of a selection request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectResult {
    /// The first selection of the session; it anchors the viewport.
    Bootstrapped {
        /// Cell that became selected and the viewport center.
        cell: CellCoord,
    },
    /// The cell became the new selection.
    Accepted {
        /// Cell that became selected.
        cell: CellCoord,
        /// Selection that was active before this one.
        previous: Option<CellCoord>,
        /// Fuel to deduct for the move, when there was a previous selection.
        fuel_cost: Option<f32>,
    },
    /// The request was refused and nothing changed.
    Rejected(SelectionRejection),
}

/// Tracks the selected cell and the one before it.
///
/// A selected cell always lies inside the viewport that was current when it
/// was chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: Option<CellCoord>,
    previous_selected: Option<CellCoord>,
}

impl SelectionTracker {
    /// Creates a tracker with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: None,
            previous_selected: None,
        }
    }

    /// Currently selected cell.
    #[must_use]
    pub const fn selected(&self) -> Option<CellCoord> {
        self.selected
    }

    /// Cell that was selected before the current one.
    #[must_use]
    pub const fn previous_selected(&self) -> Option<CellCoord> {
        self.previous_selected
    }

    /// Validates and applies a click on `cell`.
    ///
    /// Without a viewport center the click is accepted anywhere in the grid
    /// and anchors the viewport. Otherwise the cell must be visible; it is
    /// never clamped into view.
    pub fn select_cell(
        &mut self,
        cell: CellCoord,
        center: Option<CellCoord>,
        radius: u32,
        grid: GridDimensions,
    ) -> SelectResult {
        if !grid.contains(cell) {
            return SelectResult::Rejected(SelectionRejection::OutOfGrid);
        }

        if center.is_none() {
            self.previous_selected = self.selected;
            self.selected = Some(cell);
            return SelectResult::Bootstrapped { cell };
        }

        if !is_visible(cell, center, radius) {
            return SelectResult::Rejected(SelectionRejection::OutsideViewport);
        }

        let previous = self.selected;
        self.previous_selected = previous;
        self.selected = Some(cell);
        SelectResult::Accepted {
            cell,
            previous,
            fuel_cost: previous.map(|from| movement_cost(from, cell)),
        }
    }

    /// Moves the selection without charging fuel, as currents do.
    ///
    /// Returns the cell the selection left.
    pub fn drift_to(
        &mut self,
        to: CellCoord,
        center: Option<CellCoord>,
        radius: u32,
        grid: GridDimensions,
    ) -> Result<CellCoord, SelectionRejection> {
        let from = self.selected.ok_or(SelectionRejection::NoSelection)?;
        if !grid.contains(to) {
            return Err(SelectionRejection::OutOfGrid);
        }
        if !is_visible(to, center, radius) {
            return Err(SelectionRejection::OutsideViewport);
        }
        self.selected = Some(to);
        Ok(from)
    }
}

/// Fuel needed to travel in a straight line between two cells.
#[must_use]
pub fn movement_cost(from: CellCoord, to: CellCoord) -> f32 {
    FUEL_PER_CELL * from.euclidean_distance(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: GridDimensions = GridDimensions::new(200, 200);

    #[test]
    fn first_click_bootstraps_anywhere() {
        let mut tracker = SelectionTracker::new();
        let result = tracker.select_cell(CellCoord::new(190, 5), None, 20, GRID);
        assert_eq!(
            result,
            SelectResult::Bootstrapped {
                cell: CellCoord::new(190, 5)
            }
        );
        assert_eq!(tracker.selected(), Some(CellCoord::new(190, 5)));
        assert_eq!(tracker.previous_selected(), None);
    }

    #[test]
    fn clicks_outside_grid_change_nothing() {
        let mut tracker = SelectionTracker::new();
        let result = tracker.select_cell(CellCoord::new(200, 0), None, 20, GRID);
        assert_eq!(result, SelectResult::Rejected(SelectionRejection::OutOfGrid));
        assert_eq!(tracker, SelectionTracker::new());
    }

    #[test]
    fn clicks_outside_viewport_are_rejected() {
        let mut tracker = SelectionTracker::new();
        let center = Some(CellCoord::new(50, 50));
        let _ = tracker.select_cell(CellCoord::new(50, 50), None, 20, GRID);
        let before = tracker;

        let result = tracker.select_cell(CellCoord::new(71, 50), center, 20, GRID);

        assert_eq!(
            result,
            SelectResult::Rejected(SelectionRejection::OutsideViewport)
        );
        assert_eq!(tracker, before);
    }

    #[test]
    fn accepted_clicks_report_movement_cost() {
        let mut tracker = SelectionTracker::new();
        let center = Some(CellCoord::new(0, 0));
        let _ = tracker.select_cell(CellCoord::new(0, 0), None, 20, GRID);

        let result = tracker.select_cell(CellCoord::new(3, 4), center, 20, GRID);

        let SelectResult::Accepted {
            cell,
            previous,
            fuel_cost,
        } = result
        else {
            panic!("expected acceptance, got {result:?}");
        };
        assert_eq!(cell, CellCoord::new(3, 4));
        assert_eq!(previous, Some(CellCoord::new(0, 0)));
        let cost = fuel_cost.expect("previous selection exists");
        assert!((cost - 0.5).abs() < 1e-6);
        assert_eq!(tracker.previous_selected(), Some(CellCoord::new(0, 0)));
    }

    #[test]
    fn drift_requires_a_selection() {
        let mut tracker = SelectionTracker::new();
        assert_eq!(
            tracker.drift_to(CellCoord::new(1, 1), None, 20, GRID),
            Err(SelectionRejection::NoSelection)
        );
    }

    #[test]
    fn drift_off_the_grid_keeps_the_selection() {
        let mut tracker = SelectionTracker::new();
        let center = Some(CellCoord::new(199, 199));
        let _ = tracker.select_cell(CellCoord::new(199, 199), None, 20, GRID);

        assert_eq!(
            tracker.drift_to(CellCoord::new(200, 199), center, 20, GRID),
            Err(SelectionRejection::OutOfGrid)
        );
        assert_eq!(tracker.selected(), Some(CellCoord::new(199, 199)));
    }

    #[test]
    fn drift_moves_selection_without_touching_previous() {
        let mut tracker = SelectionTracker::new();
        let center = Some(CellCoord::new(10, 10));
        let _ = tracker.select_cell(CellCoord::new(10, 10), None, 20, GRID);
        let _ = tracker.select_cell(CellCoord::new(12, 10), center, 20, GRID);

        let from = tracker
            .drift_to(CellCoord::new(13, 11), center, 20, GRID)
            .expect("drift target is visible");

        assert_eq!(from, CellCoord::new(12, 10));
        assert_eq!(tracker.selected(), Some(CellCoord::new(13, 11)));
        assert_eq!(tracker.previous_selected(), Some(CellCoord::new(10, 10)));
        assert_eq!(
            tracker.drift_to(CellCoord::new(40, 40), center, 20, GRID),
            Err(SelectionRejection::OutsideViewport)
        );
    }
}
