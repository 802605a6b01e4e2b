use crate::error::ConvertError;
use crate::types::ColumnType;

#[inline]
pub(crate) fn geometry_type_from_str(
    geometry_type_str: &str,
) -> Result<wkb::reader::GeometryType, ConvertError> {
    let s = geometry_type_str;
    if s.eq_ignore_ascii_case("GEOMETRY") || s.eq_ignore_ascii_case("GEOMETRYCOLLECTION") {
        Ok(wkb::reader::GeometryType::GeometryCollection)
    } else if s.eq_ignore_ascii_case("POINT") {
        Ok(wkb::reader::GeometryType::Point)
    } else if s.eq_ignore_ascii_case("LINESTRING") {
        Ok(wkb::reader::GeometryType::LineString)
    } else if s.eq_ignore_ascii_case("POLYGON") {
        Ok(wkb::reader::GeometryType::Polygon)
    } else if s.eq_ignore_ascii_case("MULTIPOINT") {
        Ok(wkb::reader::GeometryType::MultiPoint)
    } else if s.eq_ignore_ascii_case("MULTILINESTRING") {
        Ok(wkb::reader::GeometryType::MultiLineString)
    } else if s.eq_ignore_ascii_case("MULTIPOLYGON") {
        Ok(wkb::reader::GeometryType::MultiPolygon)
    } else {
        Err(ConvertError::UnsupportedGeometryType(
            geometry_type_str.to_string(),
        ))
    }
}

#[inline]
pub(crate) fn dimension_from_zm(z: i8, m: i8) -> Result<wkb::reader::Dimension, ConvertError> {
    match (z, m) {
        // GeoPackage defines z and m as
        //
        //   0: z/m values prohibited
        //   1: z/m values mandatory
        //   2: z/m values optional
        //
        // Each WKB blob carries its own dimension anyway, so "optional" is
        // reported as the widest layout the column allows.
        (0, 0) => Ok(wkb::reader::Dimension::Xy),
        (1 | 2, 0) => Ok(wkb::reader::Dimension::Xyz),
        (0, 1 | 2) => Ok(wkb::reader::Dimension::Xym),
        (1 | 2, 1 | 2) => Ok(wkb::reader::Dimension::Xyzm),
        _ => Err(ConvertError::InvalidDimension { z, m }),
    }
}

/// Strip a length modifier such as `TEXT(32)` down to `TEXT`.
fn base_type_name(column_type_str: &str) -> &str {
    match column_type_str.find('(') {
        Some(idx) => column_type_str[..idx].trim(),
        None => column_type_str.trim(),
    }
}

// cf. https://www.geopackage.org/spec140/index.html#_sqlite_container
//
// Anything else maps to `Other`; SQLite stores values by their own storage
// class regardless of the declared type.
#[inline]
pub(crate) fn column_type_from_str(column_type_str: &str) -> ColumnType {
    let s = base_type_name(column_type_str);
    if s.eq_ignore_ascii_case("TINYINT")
        || s.eq_ignore_ascii_case("SMALLINT")
        || s.eq_ignore_ascii_case("MEDIUMINT")
        || s.eq_ignore_ascii_case("INT")
        || s.eq_ignore_ascii_case("INTEGER")
    {
        ColumnType::Integer
    } else if s.eq_ignore_ascii_case("DOUBLE")
        || s.eq_ignore_ascii_case("FLOAT")
        || s.eq_ignore_ascii_case("REAL")
    {
        ColumnType::Double
    } else if s.eq_ignore_ascii_case("TEXT") {
        ColumnType::Varchar
    } else if s.eq_ignore_ascii_case("BOOLEAN") {
        ColumnType::Boolean
    } else if s.eq_ignore_ascii_case("DATE") {
        ColumnType::Date
    } else if s.eq_ignore_ascii_case("DATETIME") {
        ColumnType::DateTime
    } else if s.eq_ignore_ascii_case("BLOB") {
        ColumnType::Blob
    } else if geometry_type_from_str(s).is_ok() {
        ColumnType::Geometry
    } else {
        ColumnType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::{column_type_from_str, dimension_from_zm, geometry_type_from_str};
    use crate::error::ConvertError;
    use crate::types::ColumnType;

    #[test]
    fn column_types_ignore_case_and_length_modifiers() {
        assert_eq!(column_type_from_str("integer"), ColumnType::Integer);
        assert_eq!(column_type_from_str("TEXT(32)"), ColumnType::Varchar);
        assert_eq!(column_type_from_str("BLOB(16)"), ColumnType::Blob);
        assert_eq!(column_type_from_str("DateTime"), ColumnType::DateTime);
        assert_eq!(column_type_from_str("MULTIPOLYGON"), ColumnType::Geometry);
    }

    #[test]
    fn unknown_column_types_fall_back_to_other() {
        assert_eq!(column_type_from_str("NUMERIC"), ColumnType::Other);
        assert_eq!(column_type_from_str("VARCHAR(20)"), ColumnType::Other);
        assert_eq!(column_type_from_str("DECIMAL(10, 2)"), ColumnType::Other);
    }

    #[test]
    fn geometry_collection_aliases_geometry() -> crate::Result<()> {
        assert_eq!(
            geometry_type_from_str("geometry")?,
            wkb::reader::GeometryType::GeometryCollection
        );
        assert!(matches!(
            geometry_type_from_str("CIRCULARSTRING"),
            Err(ConvertError::UnsupportedGeometryType(_))
        ));
        Ok(())
    }

    #[test]
    fn optional_dimensions_are_accepted() -> crate::Result<()> {
        assert_eq!(dimension_from_zm(0, 0)?, wkb::reader::Dimension::Xy);
        assert_eq!(dimension_from_zm(2, 0)?, wkb::reader::Dimension::Xyz);
        assert_eq!(dimension_from_zm(2, 2)?, wkb::reader::Dimension::Xyzm);
        assert!(matches!(
            dimension_from_zm(3, 0),
            Err(ConvertError::InvalidDimension { z: 3, m: 0 })
        ));
        Ok(())
    }
}
