//! GeoPackage fixtures written on the fly for tests.

use crate::Result;
use crate::ogc_sql::{
    SQL_INSERT_GPKG_CONTENTS, SQL_INSERT_GPKG_GEOMETRY_COLUMNS, SQL_INSERT_SPATIAL_REF_SYS,
    initialize_gpkg, quote_identifier,
};
use geo_traits::GeometryTrait;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wkb::reader::Wkb;

use super::wkb_to_gpkg_geometry;

pub(crate) const WEB_MERCATOR_SRS_ID: i32 = 3857;

const WEB_MERCATOR_WKT: &str = r#"PROJCS["WGS 84 / Pseudo-Mercator",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Mercator_1SP"],PARAMETER["central_meridian",0],PARAMETER["scale_factor",1],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",EAST],AXIS["Northing",NORTH],EXTENSION["PROJ4","+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +wktext +no_defs"],AUTHORITY["EPSG","3857"]]"#;

/// A GeoPackage file in its own temporary directory.
pub(crate) struct FixtureGpkg {
    _dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

impl FixtureGpkg {
    /// Create an empty GeoPackage with EPSG:4326, EPSG:3857 and the two
    /// undefined SRS rows registered.
    pub(crate) fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fixture.gpkg");
        let conn = Connection::open(&path)?;
        initialize_gpkg(&conn)?;
        conn.execute(
            SQL_INSERT_SPATIAL_REF_SYS,
            rusqlite::params![
                "WGS 84 / Pseudo-Mercator",
                WEB_MERCATOR_SRS_ID,
                "EPSG",
                3857,
                WEB_MERCATOR_WKT,
                "Web Mercator / Pseudo-Mercator (EPSG:3857)"
            ],
        )?;

        Ok(Self {
            _dir: dir,
            path,
            conn,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Raw bytes of the GeoPackage as written so far.
    pub(crate) fn bytes(&self) -> Result<Vec<u8>> {
        // Moves WAL content into the main file; a no-op in rollback mode.
        self.conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(std::fs::read(&self.path)?)
    }

    /// Switch the file to WAL journal mode, as QGIS-edited GeoPackages are.
    pub(crate) fn enable_wal(&self) -> Result<()> {
        let mode: String = self
            .conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        assert_eq!(mode, "wal");
        Ok(())
    }

    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub(crate) fn register_srs(
        &self,
        srs_id: i32,
        organization: &str,
        organization_coordsys_id: i32,
        definition: &str,
    ) -> Result<()> {
        self.conn.execute(
            SQL_INSERT_SPATIAL_REF_SYS,
            rusqlite::params![
                format!("{organization}:{organization_coordsys_id}"),
                srs_id,
                organization,
                organization_coordsys_id,
                definition,
                ""
            ],
        )?;
        Ok(())
    }

    /// Create a 2D feature table `layer_name` with an autoincrement `fid` and
    /// a `geom` column, followed by `columns` as `(name, declared type)`.
    pub(crate) fn add_layer(
        &self,
        layer_name: &str,
        geometry_type_name: &str,
        srs_id: i32,
        columns: &[(&str, &str)],
    ) -> Result<()> {
        self.add_layer_with_dimension(layer_name, geometry_type_name, srs_id, 0, 0, columns)
    }

    pub(crate) fn add_layer_with_dimension(
        &self,
        layer_name: &str,
        geometry_type_name: &str,
        srs_id: i32,
        z: i8,
        m: i8,
        columns: &[(&str, &str)],
    ) -> Result<()> {
        let mut column_defs = vec![
            "fid INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            format!("geom {geometry_type_name}"),
        ];
        column_defs.extend(
            columns
                .iter()
                .map(|(name, ty)| format!("{} {ty}", quote_identifier(name))),
        );
        self.conn.execute_batch(&format!(
            "CREATE TABLE {} ({})",
            quote_identifier(layer_name),
            column_defs.join(", ")
        ))?;
        self.register_layer(layer_name, geometry_type_name, srs_id, z, m)
    }

    /// Create a point table with no declared primary key.
    pub(crate) fn add_layer_without_primary_key(&self, layer_name: &str, srs_id: i32) -> Result<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE {} (geom POINT, label TEXT)",
            quote_identifier(layer_name)
        ))?;
        self.register_layer(layer_name, "POINT", srs_id, 0, 0)
    }

    /// Create a non-spatial table listed in gpkg_contents as `attributes`.
    pub(crate) fn add_attribute_table(&self, table_name: &str) -> Result<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE {} (id INTEGER PRIMARY KEY, value TEXT)",
            quote_identifier(table_name)
        ))?;
        self.conn.execute(
            SQL_INSERT_GPKG_CONTENTS,
            rusqlite::params![table_name, "attributes", Option::<i32>::None],
        )?;
        Ok(())
    }

    fn register_layer(
        &self,
        layer_name: &str,
        geometry_type_name: &str,
        srs_id: i32,
        z: i8,
        m: i8,
    ) -> Result<()> {
        self.conn.execute(
            SQL_INSERT_GPKG_CONTENTS,
            rusqlite::params![layer_name, "features", srs_id],
        )?;
        self.conn.execute(
            SQL_INSERT_GPKG_GEOMETRY_COLUMNS,
            rusqlite::params![layer_name, "geom", geometry_type_name, srs_id, z, m],
        )?;
        Ok(())
    }

    /// Insert a feature. `values` follow the property columns in declaration order.
    pub(crate) fn insert<G>(
        &self,
        layer_name: &str,
        geometry: Option<G>,
        srs_id: i32,
        values: &[Value],
    ) -> Result<()>
    where
        G: GeometryTrait<T = f64>,
    {
        let blob = match geometry {
            Some(geometry) => {
                let mut buf = Vec::new();
                wkb::writer::write_geometry(&mut buf, &geometry, &Default::default())?;
                Some(wkb_to_gpkg_geometry(Wkb::try_new(&buf)?, srs_id)?)
            }
            None => None,
        };
        self.insert_blob(layer_name, blob, values)
    }

    /// Insert a feature whose geometry column holds `blob` verbatim.
    pub(crate) fn insert_blob(
        &self,
        layer_name: &str,
        blob: Option<Vec<u8>>,
        values: &[Value],
    ) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) WHERE pk = 0 AND name != 'geom' ORDER BY cid")?;
        let property_columns = stmt
            .query_map([layer_name], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut columns = vec![quote_identifier("geom")];
        columns.extend(property_columns.iter().map(|name| quote_identifier(name)));
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<String>>()
            .join(",");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            quote_identifier(layer_name),
            columns.join(",")
        );

        let geometry = match blob {
            Some(bytes) => Value::Blob(bytes),
            None => Value::Null,
        };
        let params = std::iter::once(geometry).chain(values.iter().cloned());
        self.conn.execute(&sql, params_from_iter(params))?;
        Ok(())
    }
}
