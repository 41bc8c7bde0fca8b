#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Ocean Descent adapters.
//!
//! Rendering is pull-only. Adapters capture a [`Frame`] from the world and
//! HUD after each batch of commands and hand it to a [`RenderingBackend`];
//! nothing in this crate mutates simulation state.

use std::{error::Error, fmt, fmt::Write as _};

use anyhow::Result as AnyResult;
use glam::Vec2;
use ocean_descent_core::{
    Category, CellCoord, CellRect, GridDimensions, Layer, ObjectId, ViewportBounds,
};
use ocean_descent_system_hud::ResourceMeters;
use ocean_descent_world::{query, World};

/// Window width in pixels used by the desktop game.
pub const DEFAULT_WINDOW_WIDTH: f32 = 800.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Fill color used for objects of the category.
#[must_use]
pub const fn category_color(category: Category) -> Color {
    match category {
        Category::Life => Color::from_rgb_u8(255, 255, 255),
        Category::PointOfInterest => Color::from_rgb_u8(0, 150, 255),
        Category::Coral => Color::from_rgb_u8(155, 155, 0),
        Category::Hazard => Color::from_rgb_u8(255, 100, 0),
        Category::FoodWeb => Color::from_rgb_u8(180, 0, 255),
        Category::Resource => Color::from_rgb_u8(0, 200, 120),
    }
}

/// Character drawn for the category in text previews.
#[must_use]
pub const fn category_glyph(category: Category) -> char {
    match category {
        Category::Coral => 'C',
        Category::FoodWeb => 'F',
        Category::Hazard => 'H',
        Category::Life => 'L',
        Category::PointOfInterest => 'P',
        Category::Resource => 'R',
    }
}

/// Order in which categories are listed on the HUD legend.
const LEGEND_ORDER: [Category; 6] = [
    Category::Life,
    Category::PointOfInterest,
    Category::Coral,
    Category::Hazard,
    Category::FoodWeb,
    Category::Resource,
];

/// One swatch of the HUD legend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendEntry {
    /// Category the swatch stands for.
    pub category: Category,
    /// Text shown next to the swatch.
    pub label: &'static str,
    /// Swatch color.
    pub color: Color,
}

/// Legend entries in display order.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    LEGEND_ORDER
        .into_iter()
        .map(|category| LegendEntry {
            category,
            label: category.label(),
            color: category_color(category),
        })
        .collect()
}

/// Describes how the play grid maps onto window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Cells along each axis.
    pub grid: GridDimensions,
    /// Side length of a cell in pixels.
    pub cell_length: f32,
}

impl GridPresentation {
    /// Creates a grid descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(grid: GridDimensions, cell_length: f32) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }
        Ok(Self { grid, cell_length })
    }

    /// Fits the grid's columns into a window of the given width.
    pub fn fit_width(grid: GridDimensions, window_width: f32) -> Result<Self, RenderingError> {
        Self::new(grid, window_width / grid.columns().max(1) as f32)
    }

    /// Total width of the grid in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.grid.columns() as f32 * self.cell_length
    }

    /// Total height of the grid in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.grid.rows() as f32 * self.cell_length
    }

    /// Cell under the pixel, or `None` when the pixel lies off the grid.
    #[must_use]
    pub fn cell_at_pixel(&self, pixel: Vec2) -> Option<CellCoord> {
        if !pixel.is_finite() || pixel.x < 0.0 || pixel.y < 0.0 {
            return None;
        }
        let cell = (pixel / self.cell_length).floor();
        let cell = CellCoord::new(cell.x as u32, cell.y as u32);
        self.grid.contains(cell).then_some(cell)
    }

    /// Top-left pixel of the cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_length
    }
}

/// Object drawn within the visible viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectPresentation {
    /// Identifier assigned by the store.
    pub id: ObjectId,
    /// Category of the object.
    pub category: Category,
    /// Full play-grid footprint; adapters clip it to the viewport.
    pub footprint: CellRect,
    /// Fill color.
    pub color: Color,
}

/// Values displayed on the HUD panel.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPanel {
    /// Meter readings.
    pub meters: ResourceMeters,
    /// Legend swatches.
    pub legend: Vec<LegendEntry>,
}

/// Everything an adapter needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Active layer.
    pub layer: Layer,
    /// Number of layers in the world.
    pub layer_count: u32,
    /// Viewport radius of the active layer.
    pub radius: u32,
    /// Visible rectangle of the play grid.
    pub viewport: ViewportBounds,
    /// Objects of the active layer that overlap the viewport.
    pub objects: Vec<ObjectPresentation>,
    /// Selected cell, present only when it lies inside the viewport.
    pub selection: Option<CellCoord>,
    /// HUD panel contents.
    pub hud: HudPanel,
}

impl Frame {
    /// Captures the current world and HUD state.
    #[must_use]
    pub fn capture(world: &World, meters: ResourceMeters) -> Self {
        let viewport = query::viewport_bounds(world);
        let objects = query::current_objects(world)
            .values()
            .flatten()
            .filter(|object| object.footprint.intersects(&viewport))
            .map(|object| ObjectPresentation {
                id: object.id,
                category: object.category,
                footprint: object.footprint,
                color: category_color(object.category),
            })
            .collect();

        Self {
            layer: query::layer(world),
            layer_count: query::layer_count(world),
            radius: query::radius(world),
            viewport,
            objects,
            selection: query::selected(world).filter(|cell| viewport.contains(*cell)),
            hud: HudPanel {
                meters,
                legend: legend(),
            },
        }
    }

    /// Status line shown in the window title.
    #[must_use]
    pub fn caption(&self) -> String {
        format!(
            "Layer {}/{}  radius={}",
            self.layer.get(),
            self.layer_count,
            self.radius
        )
    }

    /// Renders the viewport as text, sampling one character per `step` cells.
    ///
    /// `@` marks the selection, letters mark objects and `.` is open water.
    #[must_use]
    pub fn text_preview(&self, step: u32) -> String {
        let step = step.max(1);
        let mut preview = String::new();
        let mut row = self.viewport.row_min();
        while row <= self.viewport.row_max() {
            let mut column = self.viewport.column_min();
            while column <= self.viewport.column_max() {
                preview.push(self.glyph_for_block(column, row, step));
                column = match column.checked_add(step) {
                    Some(next) => next,
                    None => break,
                };
            }
            preview.push('\n');
            row = match row.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        preview
    }

    /// Multi-line summary of the HUD panel.
    #[must_use]
    pub fn hud_summary(&self) -> String {
        let meters = self.hud.meters;
        let mut summary = format!(
            "Hull: {}%  Fuel: {}%  Depth: {} m",
            meters.hull as u32, meters.fuel as u32, meters.depth_meters
        );
        for entry in &self.hud.legend {
            let _ = write!(
                summary,
                "\n  {} {}",
                category_glyph(entry.category),
                entry.label
            );
        }
        summary
    }

    fn glyph_for_block(&self, column: u32, row: u32, step: u32) -> char {
        let block = ViewportBounds::new(
            column,
            column.saturating_add(step - 1).min(self.viewport.column_max()),
            row,
            row.saturating_add(step - 1).min(self.viewport.row_max()),
        );
        if self.selection.is_some_and(|cell| block.contains(cell)) {
            return '@';
        }
        self.objects
            .iter()
            .find(|object| object.footprint.intersects(&block))
            .map_or('.', |object| category_glyph(object.category))
    }
}

/// Rendering backend capable of presenting Ocean Descent frames.
pub trait RenderingBackend {
    /// Presents a captured frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be positive to map pixels onto cells.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be positive and finite (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use ocean_descent_core::{Command, LayerTables, SourceRecord};
    use ocean_descent_world::{self as world, WorldConfig};

    const METERS: ResourceMeters = ResourceMeters {
        hull: 100.0,
        fuel: 87.5,
        depth_meters: 100,
    };

    fn presentation() -> GridPresentation {
        GridPresentation::fit_width(GridDimensions::new(200, 200), DEFAULT_WINDOW_WIDTH)
            .expect("window width is positive")
    }

    #[test]
    fn grid_creation_rejects_zero_cell_length_without_panicking() {
        let error = GridPresentation::new(GridDimensions::new(10, 10), 0.0)
            .expect_err("zero cell length must be rejected");
        assert_eq!(error, RenderingError::InvalidCellLength { cell_length: 0.0 });
    }

    #[test]
    fn default_window_uses_four_pixel_cells() {
        let grid = presentation();
        assert_eq!(grid.cell_length, 4.0);
        assert_eq!(grid.width(), 800.0);
        assert_eq!(grid.cell_origin(CellCoord::new(3, 5)), Vec2::new(12.0, 20.0));
    }

    #[test]
    fn pixels_map_to_cells_by_integer_division() {
        let grid = presentation();
        assert_eq!(
            grid.cell_at_pixel(Vec2::new(0.0, 0.0)),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            grid.cell_at_pixel(Vec2::new(403.0, 7.9)),
            Some(CellCoord::new(100, 1))
        );
        assert_eq!(
            grid.cell_at_pixel(Vec2::new(799.0, 799.0)),
            Some(CellCoord::new(199, 199))
        );
        assert_eq!(grid.cell_at_pixel(Vec2::new(800.0, 10.0)), None);
        assert_eq!(grid.cell_at_pixel(Vec2::new(-1.0, 10.0)), None);
    }

    #[test]
    fn legend_follows_hud_order() {
        let labels: Vec<&str> = legend().iter().map(|entry| entry.label).collect();
        assert_eq!(
            labels,
            vec![
                "Marine Life",
                "Point of Interest",
                "Coral Reef",
                "Hazard",
                "Food Web",
                "Resources"
            ]
        );
        assert_eq!(
            category_color(Category::Hazard),
            Color::from_rgb_u8(255, 100, 0)
        );
    }

    #[test]
    fn frame_keeps_only_objects_overlapping_viewport() {
        let mut tables = LayerTables::new();
        tables.push(Layer::new(1), Category::Coral, SourceRecord::at(0, 0));
        tables.push(Layer::new(1), Category::Life, SourceRecord::at(40, 40));
        let mut world =
            World::new(WorldConfig::default(), &tables).expect("valid configuration");
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SelectCell {
                cell: CellCoord::new(20, 20),
            },
            &mut events,
        );

        let frame = Frame::capture(&world, METERS);

        assert_eq!(frame.caption(), "Layer 1/6  radius=75");
        assert_eq!(frame.viewport, ViewportBounds::new(0, 95, 0, 95));
        assert_eq!(frame.objects.len(), 1);
        assert_eq!(frame.objects[0].category, Category::Coral);
        assert_eq!(frame.selection, Some(CellCoord::new(20, 20)));
        assert_eq!(frame.hud.legend.len(), 6);
    }

    #[test]
    fn text_preview_marks_selection_and_objects() {
        let mut tables = LayerTables::new();
        tables.push(Layer::new(1), Category::Hazard, SourceRecord::at(1, 1));
        let config = WorldConfig {
            layer_count: 1,
            top_radius: 4,
            min_radius: 4,
            ..WorldConfig::default()
        };
        let mut world = World::new(config, &tables).expect("valid configuration");
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SelectCell {
                cell: CellCoord::new(8, 8),
            },
            &mut events,
        );

        let preview = Frame::capture(&world, METERS).text_preview(4);

        assert_eq!(preview, "H..\n.@.\n...\n");
    }

    #[test]
    fn hud_summary_truncates_meters() {
        let frame = Frame {
            layer: Layer::new(2),
            layer_count: 6,
            radius: 64,
            viewport: ViewportBounds::new(0, 10, 0, 10),
            objects: Vec::new(),
            selection: None,
            hud: HudPanel {
                meters: ResourceMeters {
                    depth_meters: 200,
                    ..METERS
                },
                legend: legend(),
            },
        };
        let summary = frame.hud_summary();
        assert!(summary.starts_with("Hull: 100%  Fuel: 87%  Depth: 200 m"));
        assert!(summary.contains("L Marine Life"));
    }
}
