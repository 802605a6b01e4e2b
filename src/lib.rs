//! Convert GeoPackage files to GeoJSON.
//!
//! ## Overview
//!
//! - `gpkg_to_geojson(reader)` converts the first feature layer of a
//!   GeoPackage into a GeoJSON `FeatureCollection`, returned as UTF-8 bytes.
//! - `Converter` does the same with custom `ConvertOptions` and decides on
//!   every call how to convert:
//!   - When an embedded reprojection engine is available (PROJ, with the
//!     `reproject` feature), the file is read in process and geometries are
//!     reprojected to WGS 84 (EPSG:4326).
//!   - Otherwise the file is handed to `ogr2ogr` (or another program set in
//!     `ConvertOptions::converter`), and its output is returned as is.
//!
//! Either way the input is first copied to a temporary `.gpkg` file, which is
//! removed when the call returns.
//!
//! ## Short usage
//!
//! ```no_run
//! let file = std::fs::File::open("data/example.gpkg")?;
//! let geojson = gpkg_geojson::gpkg_to_geojson(file)?;
//! std::fs::write("example.geojson", geojson)?;
//! # Ok::<(), gpkg_geojson::ConvertError>(())
//! ```
//!
//! ## Options
//!
//! By default a feature whose geometry cannot be reprojected keeps its
//! original coordinates. Turn `best_effort_reprojection` off to fail instead:
//!
//! ```no_run
//! use gpkg_geojson::{Convert, ConvertOptions, Converter, ConverterCommand};
//!
//! let converter = Converter::new(ConvertOptions {
//!     best_effort_reprojection: false,
//!     converter: ConverterCommand::new("/opt/gdal/bin/ogr2ogr"),
//!     ..Default::default()
//! });
//! let mut file = std::fs::File::open("data/example.gpkg")?;
//! let geojson = converter.convert(&mut file)?;
//! # Ok::<(), gpkg_geojson::ConvertError>(())
//! ```
//!
//! ## Reading GeoPackages directly
//!
//! The reader used by the in-process path is public too:
//!
//! ```no_run
//! use gpkg_geojson::{Gpkg, geometry_to_geojson};
//!
//! let gpkg = Gpkg::open_read_only("data/example.gpkg")?;
//! for layer_name in gpkg.list_layers()? {
//!     let layer = gpkg.open_layer(&layer_name)?;
//!     for feature in layer.features(256)? {
//!         let feature = feature?;
//!         if let Some(wkb) = feature.geometry()? {
//!             println!("{layer_name} {}: {:?}", feature.id(), geometry_to_geojson(&wkb)?);
//!         }
//!     }
//! }
//! # Ok::<(), gpkg_geojson::ConvertError>(())
//! ```
mod conversions;
mod convert;
mod encode;
mod error;
mod gpkg;
mod ogc_sql;
mod reproject;
mod types;

pub use convert::{
    Backend, Convert, ConvertOptions, Converter, ConverterCommand, EngineProbe,
    LibraryConverter, ProcessConverter, SystemProbe, gpkg_to_geojson,
};
pub use encode::{geometry_to_geojson, properties_to_json, property_to_json};
pub use error::{ConvertError, Result};
pub use gpkg::{Gpkg, GpkgFeature, GpkgFeatureBatchIterator, GpkgFeatureIterator, GpkgLayer};
#[cfg(feature = "reproject")]
pub use reproject::ProjEngine;
pub use reproject::{Crs, CrsEngine, Reprojector, reproject_geometry};
pub use types::{ColumnSpec, ColumnType};

// Re-export types used in public fields to keep the public API stable.
pub use wkb::reader::{Dimension, GeometryType};
