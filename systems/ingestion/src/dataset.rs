//! Tabular dataset decoding and coordinate normalization.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use ocean_descent_core::{
    Category, CellCoord, CurrentField, CurrentVector, FieldValue, SourceRecord,
};
use thiserror::Error;

/// Coordinate column pairs accepted by the loader, as `(row, column)` names.
const COORDINATE_ALIASES: [(&str, &str); 3] = [("row", "col"), ("r", "c"), ("y", "x")];

/// Table holding ocean current samples.
pub const CURRENTS_TABLE: &str = "currents";

/// Tables read from a directory of `<table>.csv` files.
pub const CSV_TABLES: [&str; 8] = [
    "cells",
    CURRENTS_TABLE,
    "hazards",
    "corals",
    "food_web",
    "life",
    "poi",
    "resources",
];

/// Named tables of rows decoded from a dataset file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    tables: BTreeMap<String, Vec<SourceRecord>>,
}

impl Dataset {
    /// Builds a dataset from already decoded tables.
    ///
    /// Coordinate aliases are normalized to `row`/`col` on the way in.
    #[must_use]
    pub fn from_tables(tables: BTreeMap<String, Vec<SourceRecord>>) -> Self {
        let tables = tables
            .into_iter()
            .map(|(name, rows)| (name, normalize_coordinates(rows)))
            .collect();
        Self { tables }
    }

    /// Decodes a JSON object mapping table names to arrays of rows.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let tables: BTreeMap<String, Vec<SourceRecord>> = serde_json::from_str(json)?;
        Ok(Self::from_tables(tables))
    }

    /// Loads a dataset from a directory of CSV tables or a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        if path.is_dir() {
            return Self::from_csv_dir(path);
        }
        let contents = fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Reads every known `<table>.csv` file in `dir`.
    ///
    /// Missing files are skipped. Cells arrive as text and empty cells as
    /// nulls; coercion happens when records are placed.
    pub fn from_csv_dir(dir: &Path) -> Result<Self, DatasetError> {
        let mut tables = BTreeMap::new();
        for table in CSV_TABLES {
            let path = dir.join(format!("{table}.csv"));
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "table file not found; skipping");
                continue;
            }
            let rows = read_csv_table(&path).map_err(|source| DatasetError::Csv {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(table, rows = rows.len(), "loaded csv table");
            let _ = tables.insert(table.to_owned(), rows);
        }
        Ok(Self::from_tables(tables))
    }

    /// Rows of a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&[SourceRecord]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// Names of every table in the dataset.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Rows of every object table, in category scan order.
    ///
    /// When both `food` and `food_web` are present their rows are chained.
    pub fn category_rows(&self) -> impl Iterator<Item = (Category, &SourceRecord)> + '_ {
        Category::ALL.into_iter().flat_map(move |category| {
            self.tables
                .iter()
                .filter(move |(name, _)| Category::from_table_name(name) == Some(category))
                .flat_map(move |(_, rows)| rows.iter().map(move |row| (category, row)))
        })
    }

    /// Tables that hold neither objects nor currents.
    pub fn unrecognized_tables(&self) -> impl Iterator<Item = &str> {
        self.table_names()
            .filter(|name| *name != CURRENTS_TABLE && Category::from_table_name(name).is_none())
    }

    /// Current samples keyed by source cell.
    ///
    /// Rows need integer `col`/`row` and numeric `u_mps`/`v_mps`; other rows
    /// are skipped. The first sample for a cell wins.
    #[must_use]
    pub fn current_field(&self) -> CurrentField {
        let mut field = CurrentField::new();
        for row in self.table(CURRENTS_TABLE).unwrap_or(&[]) {
            match current_sample(row) {
                Some((cell, vector)) => field.insert(cell, vector),
                None => tracing::debug!(?row, "skipping malformed current sample"),
            }
        }
        field
    }
}

/// Renames a table's coordinate columns to `row` and `col`.
///
/// The pair is chosen once per table: the first alias pair whose names both
/// appear somewhere in the table. A row is renamed only when it carries
/// neither canonical name.
#[must_use]
pub fn normalize_coordinates(rows: Vec<SourceRecord>) -> Vec<SourceRecord> {
    let Some((row_name, column_name)) = coordinate_columns(&rows) else {
        return rows;
    };
    if row_name == "row" {
        return rows;
    }
    rows.into_iter()
        .map(|mut record| {
            if record.field("row").is_some() || record.field("col").is_some() {
                return record;
            }
            let row = record.take_field(row_name).unwrap_or(FieldValue::Null);
            let column = record.take_field(column_name).unwrap_or(FieldValue::Null);
            record.with_field("row", row).with_field("col", column)
        })
        .collect()
}

fn coordinate_columns(rows: &[SourceRecord]) -> Option<(&'static str, &'static str)> {
    let has_column = |name: &str| rows.iter().any(|row| row.field(name).is_some());
    COORDINATE_ALIASES
        .into_iter()
        .find(|(row_name, column_name)| has_column(row_name) && has_column(column_name))
}

fn read_csv_table(path: &Path) -> Result<Vec<SourceRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .zip(record.iter())
            .fold(SourceRecord::default(), |row, (name, cell)| {
                row.with_field(name.trim(), csv_cell(cell))
            });
        rows.push(row);
    }
    Ok(rows)
}

fn csv_cell(cell: &str) -> FieldValue {
    if cell.trim().is_empty() {
        FieldValue::Null
    } else {
        FieldValue::Text(cell.to_owned())
    }
}

fn current_sample(row: &SourceRecord) -> Option<(CellCoord, CurrentVector)> {
    let column = u32::try_from(row.field("col")?.as_integer()?).ok()?;
    let source_row = u32::try_from(row.field("row")?.as_integer()?).ok()?;
    let u_mps = row.field("u_mps")?.as_float()? as f32;
    let v_mps = row.field("v_mps")?.as_float()? as f32;
    Some((
        CellCoord::new(column, source_row),
        CurrentVector { u_mps, v_mps },
    ))
}

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read dataset at {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A CSV table could not be read or parsed.
    #[error("failed to read csv table at {path}")]
    Csv {
        /// Path of the table file.
        path: PathBuf,
        /// Underlying reader failure.
        #[source]
        source: csv::Error,
    },
    /// The dataset is not a JSON object of row arrays.
    #[error("failed to decode dataset")]
    Decode(#[from] serde_json::Error),
    /// A layer range has its bounds reversed or starts at zero.
    #[error("invalid layer range {first}..={last}")]
    InvalidRange {
        /// First layer of the range.
        first: u32,
        /// Last layer of the range.
        last: u32,
    },
}
