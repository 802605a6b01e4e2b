use crate::error::Result;
use crate::ogc_sql::sql_select_features;
use crate::types::ColumnSpec;
use rusqlite::types::{Value, ValueRef};

use super::{Gpkg, GpkgFeature, GpkgFeatureBatchIterator, GpkgFeatureIterator};

#[derive(Debug)]
/// A GeoPackage layer with geometry metadata and column specs.
pub struct GpkgLayer<'a> {
    pub(super) conn: &'a Gpkg,
    pub layer_name: String,
    pub geometry_column: String,
    pub primary_key_column: String,
    pub geometry_type: wkb::reader::GeometryType,
    pub geometry_dimension: wkb::reader::Dimension,
    pub srs_id: i32,
    pub property_columns: Vec<ColumnSpec>,
}

// When issueing the SELECT query, always place these columns first so that
// we don't need to find the positions every time.
const GEOMETRY_INDEX: usize = 0;
const PRIMARY_INDEX: usize = 1;
const PROPERTY_OFFSET: usize = 2;

impl<'a> GpkgLayer<'a> {
    /// Iterate over features in primary key order, `batch_size` rows per query.
    pub fn features_batch(&self, batch_size: u32) -> Result<GpkgFeatureBatchIterator<'a>> {
        let batch_size = batch_size.max(1);
        let sql = sql_select_features(
            &self.layer_name,
            &self.geometry_column,
            &self.primary_key_column,
            self.property_columns.iter().map(|spec| spec.name.as_str()),
            batch_size,
        );
        let stmt = self.conn.connection().prepare(&sql)?;

        Ok(GpkgFeatureBatchIterator {
            stmt,
            property_count: self.property_columns.len(),
            geometry_column: self.geometry_column.clone(),
            primary_key_column: self.primary_key_column.clone(),
            batch_size,
            offset: 0,
            end_or_invalid_state: false,
        })
    }

    /// Iterate over single features, fetched lazily in batches.
    pub fn features(&self, batch_size: u32) -> Result<GpkgFeatureIterator<'a>> {
        Ok(GpkgFeatureIterator {
            batches: self.features_batch(batch_size)?,
            current: Vec::new().into_iter(),
        })
    }
}

pub(super) fn row_to_feature(
    row: &rusqlite::Row<'_>,
    property_count: usize,
    geometry_column: &str,
    primary_key_column: &str,
) -> rusqlite::Result<GpkgFeature> {
    let geometry = match row.get_ref(GEOMETRY_INDEX)? {
        ValueRef::Blob(bytes) => Some(bytes.to_vec()),
        ValueRef::Null => None,
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                GEOMETRY_INDEX,
                geometry_column.to_string(),
                other.data_type(),
            ));
        }
    };

    let id = match row.get_ref(PRIMARY_INDEX)? {
        ValueRef::Integer(id) => id,
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                PRIMARY_INDEX,
                primary_key_column.to_string(),
                other.data_type(),
            ));
        }
    };

    let mut properties = Vec::with_capacity(property_count);
    for idx in PROPERTY_OFFSET..PROPERTY_OFFSET + property_count {
        properties.push(property_value(row.get_ref(idx)?));
    }

    Ok(GpkgFeature {
        id,
        geometry,
        properties,
    })
}

// SQLite does not validate TEXT encoding; invalid UTF-8 is decoded lossily.
fn property_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
