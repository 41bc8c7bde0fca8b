//! Maps authored source coordinates onto the play grid.

use ocean_descent_core::{
    CellCoord, CellRect, CellRectSize, CoordinateField, FieldValue, GridDimensions,
    RecordRejection, SourceRecord,
};

/// Integer scale between the authored source grid and the play grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateScaler {
    scale: u32,
    play_grid: GridDimensions,
}

/// Where a source record lands on the play grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaledPlacement {
    /// Coordinate in the authored source grid.
    pub source: CellCoord,
    /// Cells covered on the play grid.
    pub footprint: CellRect,
}

impl CoordinateScaler {
    /// Derives the scale from the column counts of both grids.
    ///
    /// The scale is `play_columns / source_columns`, floored and never below 1.
    #[must_use]
    pub fn new(play_grid: GridDimensions, source_grid: GridDimensions) -> Self {
        let scale = play_grid
            .columns()
            .checked_div(source_grid.columns())
            .unwrap_or(1)
            .max(1);
        Self { scale, play_grid }
    }

    /// Scale factor applied to every coordinate.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Play grid the scaler targets.
    #[must_use]
    pub const fn play_grid(&self) -> GridDimensions {
        self.play_grid
    }

    /// Scales a source position and size into a play-grid footprint.
    ///
    /// Width and height are floored to one cell after scaling.
    pub fn to_play_coords(
        &self,
        column: i64,
        row: i64,
        width: i64,
        height: i64,
    ) -> Result<ScaledPlacement, RecordRejection> {
        let source_column = non_negative(column, CoordinateField::Column)?;
        let source_row = non_negative(row, CoordinateField::Row)?;
        let play_column = source_column
            .checked_mul(self.scale)
            .ok_or(RecordRejection::OutsidePlayGrid)?;
        let play_row = source_row
            .checked_mul(self.scale)
            .ok_or(RecordRejection::OutsidePlayGrid)?;
        let origin = CellCoord::new(play_column, play_row);
        if !self.play_grid.contains(origin) {
            return Err(RecordRejection::OutsidePlayGrid);
        }

        let size = CellRectSize::new(self.scale_extent(width), self.scale_extent(height));
        Ok(ScaledPlacement {
            source: CellCoord::new(source_column, source_row),
            footprint: CellRect::from_origin_and_size(origin, size),
        })
    }

    /// Reads coordinates from a record and scales them.
    ///
    /// `col` and `row` are required; `width` and `height` default to 1.
    pub fn place(&self, record: &SourceRecord) -> Result<ScaledPlacement, RecordRejection> {
        let column = required(record, CoordinateField::Column)?;
        let row = required(record, CoordinateField::Row)?;
        let width = optional(record, CoordinateField::Width)?;
        let height = optional(record, CoordinateField::Height)?;
        self.to_play_coords(column, row, width, height)
    }

    fn scale_extent(&self, extent: i64) -> u32 {
        let scaled = extent.saturating_mul(i64::from(self.scale));
        u32::try_from(scaled.max(1)).unwrap_or(u32::MAX)
    }
}

fn non_negative(value: i64, field: CoordinateField) -> Result<u32, RecordRejection> {
    if value < 0 {
        return Err(RecordRejection::Negative(field));
    }
    u32::try_from(value).map_err(|_| RecordRejection::OutsidePlayGrid)
}

fn required(record: &SourceRecord, field: CoordinateField) -> Result<i64, RecordRejection> {
    match record.field(field.name()) {
        None | Some(FieldValue::Null) => Err(RecordRejection::Missing(field)),
        Some(value) => value
            .as_integer()
            .ok_or(RecordRejection::NonNumeric(field)),
    }
}

fn optional(record: &SourceRecord, field: CoordinateField) -> Result<i64, RecordRejection> {
    match record.field(field.name()) {
        None | Some(FieldValue::Null) => Ok(1),
        Some(value) => value
            .as_integer()
            .ok_or(RecordRejection::NonNumeric(field)),
    }
}
