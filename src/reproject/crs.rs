/// A coordinate reference system as recorded in `gpkg_spatial_ref_sys`.
///
/// cf. https://www.geopackage.org/spec140/index.html#gpkg_spatial_ref_sys_cols
#[derive(Clone, Debug, PartialEq)]
pub struct Crs {
    pub srs_id: i32,
    pub organization: String,
    pub organization_coordsys_id: i32,
    pub definition: String,
}

const WGS84_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]]"#;

impl Crs {
    /// WGS 84 longitude/latitude (EPSG:4326), the GeoJSON output CRS.
    pub fn wgs84() -> Self {
        Self {
            srs_id: 4326,
            organization: "EPSG".to_string(),
            organization_coordsys_id: 4326,
            definition: WGS84_WKT.to_string(),
        }
    }

    /// Normalized `authority:code` identifier, e.g. `epsg:4326`.
    pub fn identifier(&self) -> String {
        format!(
            "{}:{}",
            self.organization.trim().to_ascii_lowercase(),
            self.organization_coordsys_id
        )
    }

    /// Whether this is one of the GeoPackage "undefined" reference systems
    /// (`srs_id` -1 for Cartesian, 0 for geographic) or has no authority.
    pub fn is_undefined(&self) -> bool {
        matches!(self.srs_id, -1 | 0)
            || self.organization.trim().is_empty()
            || self.organization.trim().eq_ignore_ascii_case("NONE")
    }

    /// Compare two reference systems by their normalized identifier.
    pub fn same_as(&self, other: &Crs) -> bool {
        self.identifier() == other.identifier()
    }

    /// Definition string understood by PROJ: `EPSG:<code>` for EPSG systems,
    /// otherwise the WKT definition when one is recorded.
    pub fn proj_definition(&self) -> String {
        let organization = self.organization.trim();
        let definition = self.definition.trim();
        if organization.eq_ignore_ascii_case("EPSG")
            || definition.is_empty()
            || definition.eq_ignore_ascii_case("undefined")
        {
            format!(
                "{}:{}",
                organization.to_ascii_uppercase(),
                self.organization_coordsys_id
            )
        } else {
            definition.to_string()
        }
    }
}
