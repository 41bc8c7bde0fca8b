//! Per-layer object storage with point lookup and collection.

use std::collections::BTreeMap;

use ocean_descent_core::{
    Category, CellCoord, Layer, LayerTables, ObjectId, PlacedObject, RecordRejection,
};

use crate::scaler::CoordinateScaler;

/// Objects of a single layer grouped by category in scan order.
pub type CategoryObjects = BTreeMap<Category, Vec<PlacedObject>>;

static EMPTY_LAYER: CategoryObjects = BTreeMap::new();

/// Summary of a store build: how many records were placed or skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    placed: usize,
    skipped: BTreeMap<RecordRejection, usize>,
}

impl BuildReport {
    /// Number of records that became placed objects.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Number of records skipped for the reason.
    #[must_use]
    pub fn skipped(&self, reason: RecordRejection) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    /// Number of records skipped for any reason.
    #[must_use]
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Skip counts in reason order.
    pub fn skip_reasons(&self) -> impl Iterator<Item = (RecordRejection, usize)> + '_ {
        self.skipped.iter().map(|(reason, count)| (*reason, *count))
    }

    fn record_skip(&mut self, reason: RecordRejection, count: usize) {
        *self.skipped.entry(reason).or_insert(0) += count;
    }
}

/// Mutable index of placed objects for every layer.
#[derive(Clone, Debug)]
pub struct LayerObjectStore {
    layers: Vec<CategoryObjects>,
}

impl LayerObjectStore {
    /// Places every valid record of every layer and category.
    ///
    /// Records that cannot be placed are skipped and counted in the report.
    /// Records assigned to layers outside `1..=layer_count` are skipped too.
    #[must_use]
    pub fn build(
        tables: &LayerTables,
        layer_count: u32,
        scaler: &CoordinateScaler,
    ) -> (Self, BuildReport) {
        let mut report = BuildReport::default();
        let mut next_id: u32 = 0;
        let mut layers = Vec::with_capacity(usize::try_from(layer_count).unwrap_or(0));

        for number in 1..=layer_count {
            let layer = Layer::new(number);
            let mut categories = CategoryObjects::new();
            for category in Category::ALL {
                let mut placed = Vec::new();
                for record in tables.records(layer, category) {
                    match scaler.place(record) {
                        Ok(placement) => {
                            placed.push(PlacedObject {
                                id: ObjectId::new(next_id),
                                category,
                                source: placement.source,
                                footprint: placement.footprint,
                                attributes: record.fields().clone(),
                            });
                            next_id = next_id.wrapping_add(1);
                        }
                        Err(reason) => {
                            tracing::debug!(
                                layer = number,
                                ?category,
                                ?reason,
                                "skipping source record"
                            );
                            report.record_skip(reason, 1);
                        }
                    }
                }
                report.placed += placed.len();
                let _ = categories.insert(category, placed);
            }
            layers.push(categories);
        }

        for layer in tables.layers() {
            if layer.get() == 0 || layer.get() > layer_count {
                let orphaned: usize = Category::ALL
                    .into_iter()
                    .map(|category| tables.records(layer, category).len())
                    .sum();
                report.record_skip(RecordRejection::UnknownLayer, orphaned);
            }
        }

        (Self { layers }, report)
    }

    /// Number of layers held by the store.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Read-only view of a layer's objects; empty for unknown layers.
    #[must_use]
    pub fn objects_for(&self, layer: Layer) -> &CategoryObjects {
        self.slot(layer)
            .and_then(|index| self.layers.get(index))
            .unwrap_or(&EMPTY_LAYER)
    }

    /// Removes and returns the first object whose footprint covers the cell.
    ///
    /// Categories are scanned in declaration order and objects in insertion
    /// order, so overlapping footprints resolve deterministically.
    pub fn collect_at(&mut self, layer: Layer, cell: CellCoord) -> Option<PlacedObject> {
        let index = self.slot(layer)?;
        let categories = self.layers.get_mut(index)?;
        for objects in categories.values_mut() {
            if let Some(position) = objects.iter().position(|object| object.covers(cell)) {
                return Some(objects.remove(position));
            }
        }
        None
    }

    /// Number of objects still present in the layer.
    #[must_use]
    pub fn remaining(&self, layer: Layer) -> usize {
        self.objects_for(layer).values().map(Vec::len).sum()
    }

    fn slot(&self, layer: Layer) -> Option<usize> {
        let index = usize::try_from(layer.get().checked_sub(1)?).ok()?;
        (index < self.layers.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocean_descent_core::{CoordinateField, FieldValue, GridDimensions, SourceRecord};

    fn scaler() -> CoordinateScaler {
        CoordinateScaler::new(GridDimensions::new(200, 200), GridDimensions::new(50, 50))
    }

    #[test]
    fn build_places_records_per_layer_and_category() {
        let mut tables = LayerTables::new();
        tables.push(Layer::new(1), Category::Coral, SourceRecord::at(5, 5));
        tables.push(Layer::new(2), Category::Life, SourceRecord::at(1, 2));
        tables.push(Layer::new(2), Category::Life, SourceRecord::at(3, 4));

        let (store, report) = LayerObjectStore::build(&tables, 6, &scaler());

        assert_eq!(store.layer_count(), 6);
        assert_eq!(report.placed(), 3);
        assert_eq!(report.skipped_total(), 0);
        let layer_two = store.objects_for(Layer::new(2));
        assert_eq!(layer_two.len(), Category::ALL.len());
        let life = &layer_two[&Category::Life];
        assert_eq!(life.len(), 2);
        assert_eq!(life[0].footprint.origin(), CellCoord::new(4, 8));
        assert_eq!(life[1].footprint.origin(), CellCoord::new(12, 16));
        assert!(life[0].id < life[1].id);
    }

    #[test]
    fn build_counts_skipped_records_by_reason() {
        let mut tables = LayerTables::new();
        tables.push(
            Layer::new(1),
            Category::Hazard,
            SourceRecord::default().with_field("row", FieldValue::Integer(1)),
        );
        tables.push(
            Layer::new(1),
            Category::Hazard,
            SourceRecord::at(1, 1).with_field("row", FieldValue::Text("deep".to_owned())),
        );
        tables.push(Layer::new(9), Category::Hazard, SourceRecord::at(1, 1));

        let (store, report) = LayerObjectStore::build(&tables, 6, &scaler());

        assert_eq!(store.remaining(Layer::new(1)), 0);
        assert_eq!(report.placed(), 0);
        assert_eq!(report.skipped(RecordRejection::Missing(CoordinateField::Column)), 1);
        assert_eq!(report.skipped(RecordRejection::NonNumeric(CoordinateField::Row)), 1);
        assert_eq!(report.skipped(RecordRejection::UnknownLayer), 1);
        assert_eq!(report.skipped_total(), 3);
    }

    #[test]
    fn float_text_coordinates_are_placed() {
        let mut tables = LayerTables::new();
        tables.push(
            Layer::new(1),
            Category::Coral,
            SourceRecord::default()
                .with_field("col", FieldValue::Text("5.0".to_owned()))
                .with_field("row", FieldValue::Text("5.0".to_owned()))
                .with_field("width", FieldValue::Text("2.0".to_owned())),
        );

        let (store, report) = LayerObjectStore::build(&tables, 6, &scaler());

        assert_eq!(report.placed(), 1);
        assert_eq!(report.skipped_total(), 0);
        let coral = &store.objects_for(Layer::new(1))[&Category::Coral][0];
        assert_eq!(coral.footprint.origin(), CellCoord::new(20, 20));
        assert_eq!(coral.footprint.size().width(), 8);
    }

    #[test]
    fn unknown_layers_yield_empty_views() {
        let (store, _) = LayerObjectStore::build(&LayerTables::new(), 3, &scaler());
        assert!(store.objects_for(Layer::new(0)).is_empty());
        assert!(store.objects_for(Layer::new(4)).is_empty());
        assert_eq!(store.objects_for(Layer::new(3)).len(), Category::ALL.len());
    }

    #[test]
    fn attributes_pass_through_unchanged() {
        let mut tables = LayerTables::new();
        let record = SourceRecord::at(2, 2).with_field("name", FieldValue::Text("kelp".to_owned()));
        tables.push(Layer::new(1), Category::Resource, record.clone());

        let (store, _) = LayerObjectStore::build(&tables, 1, &scaler());

        let object = &store.objects_for(Layer::SURFACE)[&Category::Resource][0];
        assert_eq!(&object.attributes, record.fields());
    }

    #[test]
    fn overlapping_objects_resolve_in_scan_order() {
        let mut tables = LayerTables::new();
        tables.push(Layer::new(1), Category::Life, SourceRecord::at(5, 5));
        tables.push(Layer::new(1), Category::Coral, SourceRecord::at(5, 5));
        tables.push(Layer::new(1), Category::Coral, SourceRecord::at(5, 5));
        let (mut store, _) = LayerObjectStore::build(&tables, 1, &scaler());
        let cell = CellCoord::new(21, 21);

        let first = store.collect_at(Layer::SURFACE, cell).expect("coral present");
        let second = store.collect_at(Layer::SURFACE, cell).expect("coral present");
        let third = store.collect_at(Layer::SURFACE, cell).expect("life present");

        assert_eq!(first.category, Category::Coral);
        assert_eq!(second.category, Category::Coral);
        assert!(first.id < second.id);
        assert_eq!(third.category, Category::Life);
        assert_eq!(store.collect_at(Layer::SURFACE, cell), None);
    }

    #[test]
    fn collection_is_scoped_to_the_layer() {
        let mut tables = LayerTables::new();
        tables.push(Layer::new(2), Category::PointOfInterest, SourceRecord::at(5, 5));
        let (mut store, _) = LayerObjectStore::build(&tables, 3, &scaler());
        let cell = CellCoord::new(20, 20);

        assert_eq!(store.collect_at(Layer::new(1), cell), None);
        assert_eq!(store.collect_at(Layer::new(7), cell), None);
        assert!(store.collect_at(Layer::new(2), cell).is_some());
        assert_eq!(store.remaining(Layer::new(2)), 0);
    }
}
