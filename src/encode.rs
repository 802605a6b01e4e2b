//! Encoding of GeoPackage geometries and column values as GeoJSON.

use crate::error::{ConvertError, Result};
use crate::types::{ColumnSpec, ColumnType};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_traits::{
    CoordTrait, Dimensions, GeometryCollectionTrait, GeometryTrait, LineStringTrait,
    MultiLineStringTrait, MultiPointTrait, MultiPolygonTrait, PointTrait, PolygonTrait,
};
use geojson::{Geometry, JsonObject, JsonValue, PointType, Value};
use rusqlite::types::Value as SqlValue;

/// Convert any geometry (typically a `wkb::reader::Wkb`) to a GeoJSON geometry.
///
/// Empty points, standalone or inside a MultiPoint, become empty positions
/// (`[]`) so the member count is preserved.
pub fn geometry_to_geojson<G: GeometryTrait<T = f64>>(geom: &G) -> Result<Geometry> {
    geometry_value(geom).map(Geometry::new)
}

fn geometry_value<G: GeometryTrait<T = f64>>(geom: &G) -> Result<Value> {
    use geo_traits::GeometryType as GeoType;

    let value = match geom.as_type() {
        GeoType::Point(point) => Value::Point(point_position(point)),
        GeoType::LineString(line) => Value::LineString(line_positions(line)),
        GeoType::Polygon(poly) => Value::Polygon(polygon_rings(poly)),
        GeoType::MultiPoint(multi) => Value::MultiPoint(
            multi.points().map(|point| point_position(&point)).collect(),
        ),
        GeoType::MultiLineString(multi) => Value::MultiLineString(
            multi
                .line_strings()
                .map(|line| line_positions(&line))
                .collect(),
        ),
        GeoType::MultiPolygon(multi) => Value::MultiPolygon(
            multi
                .polygons()
                .map(|poly| polygon_rings(&poly))
                .collect(),
        ),
        GeoType::GeometryCollection(collection) => Value::GeometryCollection(
            collection
                .geometries()
                .map(|sub_geom| geometry_to_geojson(&sub_geom))
                .collect::<Result<Vec<Geometry>>>()?,
        ),
        GeoType::Rect(_) => return Err(ConvertError::UnsupportedGeometryType("RECT".to_string())),
        GeoType::Triangle(_) => {
            return Err(ConvertError::UnsupportedGeometryType(
                "TRIANGLE".to_string(),
            ));
        }
        GeoType::Line(_) => return Err(ConvertError::UnsupportedGeometryType("LINE".to_string())),
    };
    Ok(value)
}

// An empty point encodes as a position-less Point.
fn point_position<P: PointTrait<T = f64>>(point: &P) -> PointType {
    point
        .coord()
        .map(|coord| position(&coord))
        .filter(|pos| !(pos[0].is_nan() && pos[1].is_nan()))
        .unwrap_or_default()
}

fn line_positions<L: LineStringTrait<T = f64>>(line: &L) -> Vec<PointType> {
    line.coords().map(|coord| position(&coord)).collect()
}

fn polygon_rings<P: PolygonTrait<T = f64>>(poly: &P) -> Vec<Vec<PointType>> {
    let mut rings = Vec::with_capacity(poly.num_interiors() + 1);
    if let Some(ring) = poly.exterior() {
        rings.push(line_positions(&ring));
    }
    rings.extend(poly.interiors().map(|ring| line_positions(&ring)));
    rings
}

// GeoJSON positions are [x, y] or [x, y, z]; M values have no place there.
fn position<C: CoordTrait<T = f64>>(coord: &C) -> PointType {
    let (x, y) = coord.x_y();
    match coord.dim() {
        Dimensions::Xyz | Dimensions::Xyzm => match coord.nth(2) {
            Some(z) => vec![x, y, z],
            None => vec![x, y],
        },
        _ => vec![x, y],
    }
}

/// Convert one SQLite value to JSON, using the declared column type to tell
/// booleans apart from integers.
pub fn property_to_json(column_type: ColumnType, value: &SqlValue) -> JsonValue {
    match value {
        SqlValue::Null => JsonValue::Null,
        SqlValue::Integer(i) if column_type == ColumnType::Boolean => JsonValue::Bool(*i != 0),
        SqlValue::Integer(i) => JsonValue::from(*i),
        // JSON has no NaN or infinity.
        SqlValue::Real(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        SqlValue::Text(s) => JsonValue::String(s.clone()),
        SqlValue::Blob(bytes) => JsonValue::String(BASE64.encode(bytes)),
    }
}

/// Build the GeoJSON `properties` object from column specs and values.
pub fn properties_to_json(columns: &[ColumnSpec], values: &[SqlValue]) -> JsonObject {
    columns
        .iter()
        .zip(values)
        .map(|(spec, value)| (spec.name.clone(), property_to_json(spec.column_type, value)))
        .collect()
}
