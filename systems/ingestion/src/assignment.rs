//! Policies deciding which layer each source record lives on.

use std::collections::BTreeMap;

use ocean_descent_core::{Category, Layer, SourceRecord};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dataset::DatasetError;

/// Field consulted by [`RecordFieldAssignment`].
pub const LAYER_FIELD: &str = "layer";

/// Chooses a layer for a record of the given category.
pub trait LayerAssignment {
    /// Returns the layer the record should be placed on.
    fn assign(&mut self, category: Category, record: &SourceRecord) -> Layer;
}

/// Inclusive, non-empty range of layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerRange {
    first: u32,
    last: u32,
}

impl LayerRange {
    /// Creates a range, rejecting reversed bounds and layer zero.
    pub fn new(first: u32, last: u32) -> Result<Self, DatasetError> {
        if first == 0 || first > last {
            return Err(DatasetError::InvalidRange { first, last });
        }
        Ok(Self { first, last })
    }

    /// Range covering every layer of a world.
    #[must_use]
    pub fn full(layer_count: u32) -> Self {
        Self {
            first: 1,
            last: layer_count.max(1),
        }
    }

    /// First layer of the range.
    #[must_use]
    pub const fn first(&self) -> u32 {
        self.first
    }

    /// Last layer of the range.
    #[must_use]
    pub const fn last(&self) -> u32 {
        self.last
    }

    /// Reports whether the layer falls inside the range.
    #[must_use]
    pub const fn contains(&self, layer: Layer) -> bool {
        self.first <= layer.get() && layer.get() <= self.last
    }
}

/// Draws each record's layer uniformly from a per-category range.
///
/// Seeded so the same dataset and seed always produce the same layout.
#[derive(Clone, Debug)]
pub struct RandomRangeAssignment {
    rng: ChaCha8Rng,
    default_range: LayerRange,
    ranges: BTreeMap<Category, LayerRange>,
}

impl RandomRangeAssignment {
    /// Spreads every category across all layers.
    #[must_use]
    pub fn new(seed: u64, layer_count: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            default_range: LayerRange::full(layer_count),
            ranges: BTreeMap::new(),
        }
    }

    /// Restricts a category to the provided range.
    #[must_use]
    pub fn with_range(mut self, category: Category, range: LayerRange) -> Self {
        let _ = self.ranges.insert(category, range);
        self
    }

    /// Range used for the category.
    #[must_use]
    pub fn range_for(&self, category: Category) -> LayerRange {
        self.ranges
            .get(&category)
            .copied()
            .unwrap_or(self.default_range)
    }
}

impl LayerAssignment for RandomRangeAssignment {
    fn assign(&mut self, category: Category, _record: &SourceRecord) -> Layer {
        let range = self.range_for(category);
        Layer::new(self.rng.gen_range(range.first..=range.last))
    }
}

/// Uses the record's own `layer` field, deferring to another policy when the
/// field is absent or outside the world.
#[derive(Clone, Debug)]
pub struct RecordFieldAssignment<F> {
    fallback: F,
    valid: LayerRange,
}

impl<F: LayerAssignment> RecordFieldAssignment<F> {
    /// Wraps a fallback policy for a world with `layer_count` layers.
    #[must_use]
    pub fn new(fallback: F, layer_count: u32) -> Self {
        Self {
            fallback,
            valid: LayerRange::full(layer_count),
        }
    }
}

impl<F: LayerAssignment> LayerAssignment for RecordFieldAssignment<F> {
    fn assign(&mut self, category: Category, record: &SourceRecord) -> Layer {
        record
            .field(LAYER_FIELD)
            .and_then(|value| value.as_integer())
            .and_then(|value| u32::try_from(value).ok())
            .map(Layer::new)
            .filter(|layer| self.valid.contains(*layer))
            .unwrap_or_else(|| self.fallback.assign(category, record))
    }
}
