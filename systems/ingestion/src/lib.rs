#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Data ingestion system that turns tabular datasets into per-layer record
//! tables for the Ocean Descent world.
//!
//! Decoding, coordinate aliasing and layer assignment all happen here so the
//! world only ever sees typed [`LayerTables`].

pub mod assignment;
pub mod dataset;

use ocean_descent_core::LayerTables;

pub use assignment::{
    LayerAssignment, LayerRange, RandomRangeAssignment, RecordFieldAssignment,
};
pub use dataset::{Dataset, DatasetError};

/// Assigns every object row of the dataset to a layer.
///
/// Rows keep their table order within each layer and category.
pub fn partition<P>(dataset: &Dataset, policy: &mut P) -> LayerTables
where
    P: LayerAssignment + ?Sized,
{
    for name in dataset.unrecognized_tables() {
        tracing::debug!(table = name, "ignoring table without object category");
    }

    let mut tables = LayerTables::new();
    for (category, record) in dataset.category_rows() {
        let layer = policy.assign(category, record);
        tables.push(layer, category, record.clone());
    }
    tracing::info!(records = tables.record_count(), "partitioned dataset into layers");
    tables
}
