//! Read-only GeoPackage access backed by rusqlite.
//!
//! This covers just enough of the format to pull features out of a vector
//! layer: layer discovery, column metadata, the spatial reference system and
//! the GeoPackage binary geometry header.

mod batch_iterator;
mod feature;
mod gpkg;
mod layer;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch_iterator::{GpkgFeatureBatchIterator, GpkgFeatureIterator};
pub use feature::GpkgFeature;
pub use gpkg::Gpkg;
pub use layer::GpkgLayer;

#[cfg(test)]
pub(crate) use feature::wkb_to_gpkg_geometry;
