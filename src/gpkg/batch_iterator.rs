use crate::Result;
use crate::gpkg::GpkgFeature;
use tracing::trace;

use super::layer::row_to_feature;

/// Iterator that yields batches of features from a layer.
///
/// Each call to `next()` returns a `Result<Vec<GpkgFeature>>` containing up to
/// `batch_size` features, so the whole layer is never held in memory at once.
/// The sequence cannot be restarted; open the layer again to re-read it.
pub struct GpkgFeatureBatchIterator<'a> {
    pub(super) stmt: rusqlite::Statement<'a>,
    pub(super) property_count: usize,
    pub(super) geometry_column: String,
    pub(super) primary_key_column: String,
    pub(super) batch_size: u32,
    pub(super) offset: i64,
    pub(super) end_or_invalid_state: bool,
}

impl<'a> Iterator for GpkgFeatureBatchIterator<'a> {
    type Item = Result<Vec<GpkgFeature>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end_or_invalid_state {
            return None;
        }

        let property_count = self.property_count;
        let geometry_column = self.geometry_column.as_str();
        let primary_key_column = self.primary_key_column.as_str();
        let collected_result = self
            .stmt
            .query_map([self.offset], |row| {
                row_to_feature(row, property_count, geometry_column, primary_key_column)
            })
            .and_then(|mapped_rows| mapped_rows.collect::<rusqlite::Result<Vec<GpkgFeature>>>());

        let features = match collected_result {
            Ok(features) => features,
            Err(e) => {
                // A failed query leaves the offset unreliable; stop here.
                self.end_or_invalid_state = true;
                return Some(Err(e.into()));
            }
        };

        // If the result is less than the batch size, it means it reached the end.
        let result_size = features.len();
        if result_size < self.batch_size as usize {
            self.end_or_invalid_state = true;
            if features.is_empty() {
                return None;
            }
        }

        trace!(offset = self.offset, rows = result_size, "fetched feature batch");
        self.offset += result_size as i64;

        Some(Ok(features))
    }
}

/// Iterator over single features that pulls rows from the layer in batches.
pub struct GpkgFeatureIterator<'a> {
    pub(super) batches: GpkgFeatureBatchIterator<'a>,
    pub(super) current: std::vec::IntoIter<GpkgFeature>,
}

impl<'a> Iterator for GpkgFeatureIterator<'a> {
    type Item = Result<GpkgFeature>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(feature) = self.current.next() {
                return Some(Ok(feature));
            }
            match self.batches.next()? {
                Ok(batch) => self.current = batch.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
