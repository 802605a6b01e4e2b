use crate::error::{ConvertError, Result};
use rusqlite::types::Value;
use wkb::reader::Wkb;

/// A single feature with geometry bytes and owned properties.
///
/// Properties are stored in the order of `GpkgLayer::property_columns`.
#[derive(Debug, Clone)]
pub struct GpkgFeature {
    pub(super) id: i64,
    pub(super) geometry: Option<Vec<u8>>,
    pub(super) properties: Vec<Value>,
}

impl GpkgFeature {
    /// Return the primary key value.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Decode the geometry column into WKB. `None` means the column is NULL.
    pub fn geometry(&self) -> Result<Option<Wkb<'_>>> {
        match &self.geometry {
            Some(bytes) => gpkg_geometry_to_wkb(bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Property values in column order.
    pub fn properties(&self) -> &[Value] {
        &self.properties
    }

    /// Read a property by column index.
    pub fn property(&self, idx: usize) -> Option<&Value> {
        self.properties.get(idx)
    }
}

const HEADER_SIZE: usize = 8;

/// Strip GeoPackage header and envelope bytes to access raw WKB.
// cf. https://www.geopackage.org/spec140/index.html#gpb_format
pub(crate) fn gpkg_geometry_to_wkb(b: &[u8]) -> Result<Wkb<'_>> {
    if b.len() < HEADER_SIZE {
        return Err(ConvertError::InvalidGpkgGeometryLength {
            len: b.len(),
            minimum: HEADER_SIZE,
        });
    }
    if &b[0..2] != b"GP" {
        return Err(ConvertError::InvalidGpkgGeometryMagic([b[0], b[1]]));
    }

    let flags = b[3];
    // ExtendedGeoPackageBinary is not handled.
    if flags & 0b00100000 != 0 {
        return Err(ConvertError::InvalidGpkgGeometryFlags(flags));
    }
    let envelope_size: usize = match flags & 0b00001110 {
        0b00000000 => 0,  // no envelope
        0b00000010 => 32, // envelope is [minx, maxx, miny, maxy], 32 bytes
        0b00000100 => 48, // envelope is [minx, maxx, miny, maxy, minz, maxz], 48 bytes
        0b00000110 => 48, // envelope is [minx, maxx, miny, maxy, minm, maxm], 48 bytes
        0b00001000 => 64, // envelope is [minx, maxx, miny, maxy, minz, maxz, minm, maxm], 64 bytes
        _ => {
            return Err(ConvertError::InvalidGpkgGeometryFlags(flags));
        }
    };
    let offset = HEADER_SIZE + envelope_size;
    if b.len() < offset {
        return Err(ConvertError::InvalidGpkgGeometryEnvelope {
            len: b.len(),
            required: offset,
        });
    }

    Ok(Wkb::try_new(&b[offset..])?)
}

// cf. https://www.geopackage.org/spec140/index.html#gpb_format
#[cfg(test)]
pub(crate) fn wkb_to_gpkg_geometry(wkb: Wkb<'_>, srs_id: i32) -> Result<Vec<u8>> {
    let mut geom = Vec::with_capacity(wkb.buf().len() + HEADER_SIZE);
    geom.extend_from_slice(&[
        0x47u8, // magic
        0x50u8, // magic
        0x00u8, // version
        0x01u8, // flags (little endian SRS ID, no envelope)
    ]);
    geom.extend_from_slice(&srs_id.to_le_bytes());
    geom.extend_from_slice(wkb.buf());

    Ok(geom)
}

#[cfg(test)]
mod tests {
    use super::{GpkgFeature, gpkg_geometry_to_wkb, wkb_to_gpkg_geometry};
    use crate::Result;
    use crate::error::ConvertError;
    use geo_types::Point;
    use wkb::reader::Wkb;

    fn point_wkb(x: f64, y: f64) -> Result<Vec<u8>> {
        let mut wkb = Vec::new();
        wkb::writer::write_geometry(&mut wkb, &Point::new(x, y), &Default::default())?;
        Ok(wkb)
    }

    #[test]
    fn strips_header_without_envelope() -> Result<()> {
        let wkb = point_wkb(3.0, -1.0)?;
        let gpkg_blob = wkb_to_gpkg_geometry(Wkb::try_new(&wkb)?, 4326)?;

        let recovered = gpkg_geometry_to_wkb(&gpkg_blob)?;
        assert_eq!(recovered.buf(), wkb.as_slice());
        Ok(())
    }

    #[test]
    fn strips_xy_envelope() -> Result<()> {
        let wkb = point_wkb(3.0, -1.0)?;
        let mut blob = vec![0x47, 0x50, 0x00, 0x03];
        blob.extend_from_slice(&4326_i32.to_le_bytes());
        for v in [3.0_f64, 3.0, -1.0, -1.0] {
            blob.extend_from_slice(&v.to_le_bytes());
        }
        blob.extend_from_slice(&wkb);

        let recovered = gpkg_geometry_to_wkb(&blob)?;
        assert_eq!(recovered.buf(), wkb.as_slice());
        Ok(())
    }

    #[test]
    fn rejects_invalid_flags() {
        let mut blob = vec![0x47, 0x50, 0x00, 0x0A, 0, 0, 0, 0];
        blob.extend_from_slice(&[0; 16]);
        let result = gpkg_geometry_to_wkb(&blob);
        assert!(matches!(
            result,
            Err(ConvertError::InvalidGpkgGeometryFlags(0x0A))
        ));
    }

    #[test]
    fn rejects_short_and_foreign_blobs() {
        assert!(matches!(
            gpkg_geometry_to_wkb(&[0x47, 0x50, 0x00]),
            Err(ConvertError::InvalidGpkgGeometryLength { len: 3, minimum: 8 })
        ));
        assert!(matches!(
            gpkg_geometry_to_wkb(&[0x01, 0x01, 0x00, 0x00, 0, 0, 0, 0]),
            Err(ConvertError::InvalidGpkgGeometryMagic([0x01, 0x01]))
        ));
        assert!(matches!(
            gpkg_geometry_to_wkb(&[0x47, 0x50, 0x00, 0x03, 0, 0, 0, 0, 1, 2]),
            Err(ConvertError::InvalidGpkgGeometryEnvelope {
                len: 10,
                required: 40
            })
        ));
    }

    #[test]
    fn null_geometry_decodes_to_none() -> Result<()> {
        let feature = GpkgFeature {
            id: 1,
            geometry: None,
            properties: vec![rusqlite::types::Value::Integer(1)],
        };
        assert!(feature.geometry()?.is_none());
        assert_eq!(
            feature.property(0),
            Some(&rusqlite::types::Value::Integer(1))
        );
        assert!(feature.property(2).is_none());
        Ok(())
    }
}
