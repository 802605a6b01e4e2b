use crate::conversions::{column_type_from_str, dimension_from_zm, geometry_type_from_str};
use crate::error::{ConvertError, Result};
use crate::ogc_sql::{
    SQL_LIST_LAYERS, SQL_SELECT_GEOMETRY_COLUMN_META, SQL_SELECT_SPATIAL_REF_SYS,
    sql_table_columns,
};
use crate::reproject::Crs;
use crate::types::{ColumnSpec, ColumnSpecs, ColumnType};
use rusqlite::{OpenFlags, OptionalExtension};
use std::path::Path;

use super::layer::GpkgLayer;

// Used when the feature table has no declared primary key.
const ROWID: &str = "rowid";

#[derive(Debug)]
/// Read-only GeoPackage connection.
pub struct Gpkg {
    conn: rusqlite::Connection,
}

impl Gpkg {
    /// Open a GeoPackage in read-only mode.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = rusqlite::Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    /// List the names of the feature layers in table order.
    pub fn list_layers(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(SQL_LIST_LAYERS)?;
        let layers = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(layers)
    }

    /// Load a layer definition and metadata by name.
    pub fn open_layer<'a>(&'a self, layer_name: &str) -> Result<GpkgLayer<'a>> {
        let (geometry_column, geometry_type, geometry_dimension, srs_id) =
            self.get_geometry_column_and_srs_id(layer_name)?;
        let column_specs = self.get_column_specs(layer_name)?;
        let primary_key_column = column_specs
            .primary_key
            .unwrap_or_else(|| ROWID.to_string());
        let property_columns = column_specs
            .other_columns
            .into_iter()
            .filter(|spec| spec.name != geometry_column && spec.name != primary_key_column)
            .collect();

        Ok(GpkgLayer {
            conn: self,
            layer_name: layer_name.to_string(),
            geometry_column,
            primary_key_column,
            geometry_type,
            geometry_dimension,
            srs_id,
            property_columns,
        })
    }

    /// Look up a spatial reference system by `srs_id`.
    ///
    /// Returns `None` when `gpkg_spatial_ref_sys` has no such row.
    pub fn spatial_ref_sys(&self, srs_id: i32) -> Result<Option<Crs>> {
        let crs = self
            .conn
            .query_row(SQL_SELECT_SPATIAL_REF_SYS, [srs_id], |row| {
                Ok(Crs {
                    srs_id: row.get(0)?,
                    organization: row.get(1)?,
                    organization_coordsys_id: row.get(2)?,
                    definition: row.get(3)?,
                })
            })
            .optional()?;
        Ok(crs)
    }

    pub(crate) fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }

    /// Resolve the table columns and map SQLite types.
    pub(crate) fn get_column_specs(&self, layer_name: &str) -> Result<ColumnSpecs> {
        let query = sql_table_columns(layer_name);
        let mut stmt = self.conn.prepare(&query)?;

        let rows = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let column_type_str: String = row.get(1)?;
                let primary_key: i32 = row.get(2)?;
                Ok((name, column_type_str, primary_key != 0))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut primary_key: Option<String> = None;
        let mut other_columns = Vec::with_capacity(rows.len());
        for (name, column_type_str, is_primary_key) in rows {
            // A column declared without a type has BLOB affinity.
            let column_type = if column_type_str.trim().is_empty() {
                ColumnType::Blob
            } else {
                column_type_from_str(&column_type_str)
            };

            if is_primary_key {
                if primary_key.is_some() {
                    return Err(ConvertError::CompositePrimaryKeyUnsupported {
                        layer_name: layer_name.to_string(),
                    });
                }
                primary_key = Some(name.clone());
            }
            other_columns.push(ColumnSpec { name, column_type });
        }

        Ok(ColumnSpecs {
            primary_key,
            other_columns,
        })
    }

    /// Resolve the geometry column metadata and SRS information for a layer.
    pub(crate) fn get_geometry_column_and_srs_id(
        &self,
        layer_name: &str,
    ) -> Result<(
        String,
        wkb::reader::GeometryType,
        wkb::reader::Dimension,
        i32,
    )> {
        let mut stmt = self.conn.prepare(SQL_SELECT_GEOMETRY_COLUMN_META)?;

        let (geometry_column, geometry_type_str, z, m, srs_id) =
            stmt.query_row([layer_name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i8>(2)?,
                    row.get::<_, i8>(3)?,
                    row.get::<_, i32>(4)?,
                ))
            })?;

        let geometry_type = geometry_type_from_str(&geometry_type_str)?;
        let geometry_dimension = dimension_from_zm(z, m)?;

        Ok((geometry_column, geometry_type, geometry_dimension, srs_id))
    }
}
