//! Coordinate reference systems and geometry reprojection.
//!
//! The embedded conversion path talks to a reprojection engine through
//! [`CrsEngine`]. With the `reproject` feature the engine is PROJ
//! ([`ProjEngine`]); tests plug in their own.

mod crs;
#[cfg(feature = "reproject")]
mod proj_engine;

pub use crs::Crs;
#[cfg(feature = "reproject")]
pub use proj_engine::ProjEngine;

use crate::error::Result;
use geojson::{Geometry, PointType, Value};

/// Transforms single coordinates between two fixed reference systems.
pub trait Reprojector {
    fn reproject(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}

/// Builds [`Reprojector`]s for pairs of reference systems.
pub trait CrsEngine {
    fn reprojector(&self, source: &Crs, target: &Crs) -> Result<Box<dyn Reprojector>>;
}

/// Reproject every position of `geometry`.
///
/// The result is all-or-nothing: an error on any position returns the error
/// and leaves `geometry` untouched. Z values are carried over unchanged.
pub fn reproject_geometry(geometry: &Geometry, reprojector: &dyn Reprojector) -> Result<Geometry> {
    let mut reprojected = geometry.clone();
    // A bbox in the source CRS would be wrong after the transform.
    reprojected.bbox = None;
    reproject_value(&mut reprojected.value, reprojector)?;
    Ok(reprojected)
}

fn reproject_value(value: &mut Value, reprojector: &dyn Reprojector) -> Result<()> {
    match value {
        Value::Point(position) => reproject_position(position, reprojector),
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            reproject_positions(positions, reprojector)
        }
        Value::Polygon(rings) | Value::MultiLineString(rings) => {
            for ring in rings {
                reproject_positions(ring, reprojector)?;
            }
            Ok(())
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                for ring in rings {
                    reproject_positions(ring, reprojector)?;
                }
            }
            Ok(())
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                geometry.bbox = None;
                reproject_value(&mut geometry.value, reprojector)?;
            }
            Ok(())
        }
    }
}

fn reproject_positions(positions: &mut [PointType], reprojector: &dyn Reprojector) -> Result<()> {
    for position in positions {
        reproject_position(position, reprojector)?;
    }
    Ok(())
}

fn reproject_position(position: &mut PointType, reprojector: &dyn Reprojector) -> Result<()> {
    // Empty points have no position to move.
    if position.len() < 2 {
        return Ok(());
    }
    let (x, y) = reprojector.reproject(position[0], position[1])?;
    position[0] = x;
    position[1] = y;
    Ok(())
}
