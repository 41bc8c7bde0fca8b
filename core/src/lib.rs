#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ocean Descent engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player input, the world executes those commands via its `apply`
//! entry point, and then broadcasts [`Event`] values for collaborators such as
//! the HUD to react to. Collaborators never mutate the world directly; they
//! read immutable views and respond with new commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Depth, in meters, represented by a single layer.
pub const METERS_PER_LAYER: u32 = 100;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that the cell at the provided coordinate become the selection.
    SelectCell {
        /// Play-grid cell the player clicked.
        cell: CellCoord,
    },
    /// Requests a move one layer deeper.
    Descend,
    /// Requests a move one layer shallower.
    Ascend,
    /// Requests that ocean currents carry the current selection to a new cell.
    Drift {
        /// Cell the selection should drift to.
        to: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the viewport was anchored on a new center cell.
    ViewportCentered {
        /// Cell the viewport is now centered on.
        center: CellCoord,
    },
    /// Confirms that a cell became the active selection.
    CellSelected {
        /// Cell that is now selected.
        cell: CellCoord,
        /// Selection that was active before this one, if any.
        previous: Option<CellCoord>,
        /// Whether this selection established the very first viewport center.
        bootstrap: bool,
    },
    /// Reports that a selection request was refused without changing state.
    SelectionRejected {
        /// Cell that was requested.
        cell: CellCoord,
        /// Specific reason the request failed.
        reason: SelectionRejection,
    },
    /// Reports fuel spent travelling between two selections.
    FuelConsumed {
        /// Amount of fuel that should be deducted from the meter.
        amount: f32,
    },
    /// Confirms that an object was removed from the store by the selection.
    ObjectCollected {
        /// Layer the object was collected from.
        layer: Layer,
        /// The collected object.
        object: PlacedObject,
    },
    /// Announces that the active layer changed.
    LayerChanged {
        /// Layer that was active before the transition.
        from: Layer,
        /// Layer that is active after the transition.
        to: Layer,
        /// Viewport radius that applies to the new layer.
        radius: u32,
    },
    /// Confirms that currents moved the selection.
    SelectionDrifted {
        /// Cell selected before drifting.
        from: CellCoord,
        /// Cell selected after drifting.
        to: CellCoord,
    },
    /// Reports that a drift request was refused without changing state.
    DriftRejected {
        /// Cell the selection would have drifted to.
        to: CellCoord,
        /// Specific reason the drift failed.
        reason: SelectionRejection,
    },
}

/// Reasons a selection or drift request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionRejection {
    /// The requested cell lies outside the play grid.
    OutOfGrid,
    /// The requested cell lies outside the current viewport.
    OutsideViewport,
    /// There is no selection to act on.
    NoSelection,
}

/// One discrete depth level, numbered from 1 at the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Layer(u32);

impl Layer {
    /// The shallowest layer.
    pub const SURFACE: Layer = Layer(1);

    /// Creates a new layer wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying layer number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Depth in meters represented by the layer.
    #[must_use]
    pub const fn depth_meters(&self) -> u32 {
        self.0.saturating_mul(METERS_PER_LAYER)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev (chessboard) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// Computes the straight-line distance between two cells.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f32 {
        let dx = f64::from(self.column().abs_diff(other.column()));
        let dy = f64::from(self.row().abs_diff(other.row()));
        dx.hypot(dy) as f32
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the cell lies inside the half-open rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = u64::from(cell.column());
        let row = u64::from(cell.row());
        let left = u64::from(self.origin.column());
        let top = u64::from(self.origin.row());
        let right = left + u64::from(self.size.width());
        let bottom = top + u64::from(self.size.height());
        left <= column && column < right && top <= row && row < bottom
    }

    /// Reports whether any cell of the rectangle falls within the bounds.
    #[must_use]
    pub fn intersects(&self, bounds: &ViewportBounds) -> bool {
        let left = u64::from(self.origin.column());
        let top = u64::from(self.origin.row());
        let right = left + u64::from(self.size.width());
        let bottom = top + u64::from(self.size.height());
        right > u64::from(bounds.column_min())
            && left <= u64::from(bounds.column_max())
            && bottom > u64::from(bounds.row_min())
            && top <= u64::from(bounds.row_max())
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Column and row counts of a rectangular grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates a new grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Inclusive cell range that is currently visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewportBounds {
    column_min: u32,
    column_max: u32,
    row_min: u32,
    row_max: u32,
}

impl ViewportBounds {
    /// Creates bounds from inclusive column and row limits.
    #[must_use]
    pub const fn new(column_min: u32, column_max: u32, row_min: u32, row_max: u32) -> Self {
        Self {
            column_min,
            column_max,
            row_min,
            row_max,
        }
    }

    /// First visible column.
    #[must_use]
    pub const fn column_min(&self) -> u32 {
        self.column_min
    }

    /// Last visible column.
    #[must_use]
    pub const fn column_max(&self) -> u32 {
        self.column_max
    }

    /// First visible row.
    #[must_use]
    pub const fn row_min(&self) -> u32 {
        self.row_min
    }

    /// Last visible row.
    #[must_use]
    pub const fn row_max(&self) -> u32 {
        self.row_max
    }

    /// Reports whether the cell lies inside the bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        self.column_min <= cell.column()
            && cell.column() <= self.column_max
            && self.row_min <= cell.row()
            && cell.row() <= self.row_max
    }
}

/// Closed set of object categories found in the ocean dataset.
///
/// Declaration order is the scan order used when resolving collections.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    /// Coral reef structures.
    Coral,
    /// Food web nodes such as plankton blooms.
    FoodWeb,
    /// Hazards such as wrecks or vents.
    Hazard,
    /// Marine life sightings.
    Life,
    /// Points of interest.
    PointOfInterest,
    /// Harvestable resources.
    Resource,
}

impl Category {
    /// Every category in scan order.
    pub const ALL: [Category; 6] = [
        Category::Coral,
        Category::FoodWeb,
        Category::Hazard,
        Category::Life,
        Category::PointOfInterest,
        Category::Resource,
    ];

    /// Canonical dataset table name for the category.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Coral => "corals",
            Self::FoodWeb => "food_web",
            Self::Hazard => "hazards",
            Self::Life => "life",
            Self::PointOfInterest => "poi",
            Self::Resource => "resources",
        }
    }

    /// Resolves a dataset table name, accepting the short `food` alias.
    #[must_use]
    pub fn from_table_name(name: &str) -> Option<Self> {
        match name {
            "food" => Some(Self::FoodWeb),
            other => Self::ALL
                .into_iter()
                .find(|category| category.table_name() == other),
        }
    }

    /// Human readable label shown in legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Coral => "Coral Reef",
            Self::FoodWeb => "Food Web",
            Self::Hazard => "Hazard",
            Self::Life => "Marine Life",
            Self::PointOfInterest => "Point of Interest",
            Self::Resource => "Resources",
        }
    }
}

/// Loosely typed value read from a tabular source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Empty cell or explicit null.
    Null,
    /// Boolean flag.
    Boolean(bool),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Free-form text.
    Text(String),
}

impl FieldValue {
    /// Coerces the value into an integer the way tabular loaders do.
    ///
    /// Floats truncate toward zero, as does text holding a finite number.
    /// Nulls, booleans and non-finite floats do not coerce.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<i64>().ok().or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .map(|value| value.trunc() as i64)
                })
            }
            Self::Float(_) | Self::Null | Self::Boolean(_) => None,
        }
    }

    /// Coerces the value into a float.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) if value.is_finite() => Some(*value),
            Self::Text(text) => text.trim().parse().ok().filter(|value: &f64| value.is_finite()),
            Self::Float(_) | Self::Null | Self::Boolean(_) => None,
        }
    }
}

/// A single row supplied by the ingestion collaborator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl SourceRecord {
    /// Creates a record from named fields.
    #[must_use]
    pub fn from_fields(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    /// Creates a record holding only integer `col` and `row` fields.
    #[must_use]
    pub fn at(column: i64, row: i64) -> Self {
        Self::default()
            .with_field("col", FieldValue::Integer(column))
            .with_field("row", FieldValue::Integer(row))
    }

    /// Returns the record with the provided field set.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: FieldValue) -> Self {
        let _ = self.fields.insert(name.to_owned(), value);
        self
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Removes a field, returning its value.
    pub fn take_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// All fields in name order.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }
}

/// Coordinate-bearing fields of a source record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoordinateField {
    /// The `col` field.
    Column,
    /// The `row` field.
    Row,
    /// The optional `width` field.
    Width,
    /// The optional `height` field.
    Height,
}

impl CoordinateField {
    /// Field name used in source records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Column => "col",
            Self::Row => "row",
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// Reasons a source record is skipped while building the object store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordRejection {
    /// A required coordinate field is absent or null.
    Missing(CoordinateField),
    /// A coordinate field holds a value that does not coerce to an integer.
    NonNumeric(CoordinateField),
    /// A coordinate field holds a negative value.
    Negative(CoordinateField),
    /// The scaled origin falls outside the play grid.
    OutsidePlayGrid,
    /// The record was assigned to a layer the world does not have.
    UnknownLayer,
}

/// Unique identifier assigned to a placed object by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates a new object identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// An object placed on the play grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedObject {
    /// Identifier assigned in store insertion order.
    pub id: ObjectId,
    /// Category the object belongs to.
    pub category: Category,
    /// Coordinate in the authored source grid.
    pub source: CellCoord,
    /// Cells covered on the play grid.
    pub footprint: CellRect,
    /// Pass-through metadata from the source record.
    pub attributes: BTreeMap<String, FieldValue>,
}

impl PlacedObject {
    /// Reports whether the object's footprint covers the cell.
    #[must_use]
    pub fn covers(&self, cell: CellCoord) -> bool {
        self.footprint.contains(cell)
    }
}

/// Source records grouped by layer and category.
///
/// Produced by the ingestion collaborator once layer assignment has run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerTables {
    layers: BTreeMap<Layer, BTreeMap<Category, Vec<SourceRecord>>>,
}

impl LayerTables {
    /// Creates an empty table set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the table for the layer and category.
    pub fn push(&mut self, layer: Layer, category: Category, record: SourceRecord) {
        self.layers
            .entry(layer)
            .or_default()
            .entry(category)
            .or_default()
            .push(record);
    }

    /// Records assigned to the layer and category, in insertion order.
    #[must_use]
    pub fn records(&self, layer: Layer, category: Category) -> &[SourceRecord] {
        self.layers
            .get(&layer)
            .and_then(|categories| categories.get(&category))
            .map_or(&[], Vec::as_slice)
    }

    /// Layers that hold at least one record.
    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.layers.keys().copied()
    }

    /// Total number of records across all layers.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.layers
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// Water velocity sampled at one source-grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurrentVector {
    /// Velocity along the column axis in meters per second.
    pub u_mps: f32,
    /// Velocity along the row axis in meters per second.
    pub v_mps: f32,
}

/// Ocean currents keyed by source-grid cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurrentField {
    samples: BTreeMap<CellCoord, CurrentVector>,
}

impl CurrentField {
    /// Creates an empty current field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current at a source cell, keeping the first sample seen.
    pub fn insert(&mut self, source: CellCoord, vector: CurrentVector) {
        let _ = self.samples.entry(source).or_insert(vector);
    }

    /// Current at the source cell, if sampled.
    #[must_use]
    pub fn at(&self, source: CellCoord) -> Option<CurrentVector> {
        self.samples.get(&source).copied()
    }

    /// Number of sampled cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Reports whether no cell was sampled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
