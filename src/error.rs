use std::error::Error;
use std::fmt;

/// Crate error type for GeoPackage to GeoJSON conversion.
#[derive(Debug)]
pub enum ConvertError {
    /// Wraps I/O errors from reading the source or handling temporary files.
    Io(std::io::Error),
    /// Wraps errors returned by `rusqlite`.
    Sql(rusqlite::Error),
    /// Wraps errors returned by the `wkb` crate.
    Wkb(wkb::error::WkbError),
    /// Wraps errors returned while serializing the GeoJSON document.
    Json(serde_json::Error),
    /// The GeoPackage has no vector feature layer.
    NoFeatureLayer,
    /// A geometry type could not be represented in GeoJSON.
    UnsupportedGeometryType(String),
    /// Invalid or mixed `z` / `m` dimension flags in GeoPackage metadata.
    InvalidDimension { z: i8, m: i8 },
    /// GeoPackage geometry blob does not start with the `GP` magic bytes.
    InvalidGpkgGeometryMagic([u8; 2]),
    /// Invalid GeoPackage geometry flags byte.
    InvalidGpkgGeometryFlags(u8),
    /// GeoPackage geometry blob is too short for the fixed header.
    InvalidGpkgGeometryLength { len: usize, minimum: usize },
    /// GeoPackage geometry blob is too short for the declared envelope payload.
    InvalidGpkgGeometryEnvelope { len: usize, required: usize },
    /// Layer schema has multiple primary key columns, which is unsupported.
    CompositePrimaryKeyUnsupported { layer_name: String },
    /// A geometry could not be transformed into the target CRS.
    Reprojection(String),
    /// The external converter could not be started.
    ConverterSpawn {
        program: String,
        source: std::io::Error,
    },
    /// The external converter exited with a failure status.
    ConverterFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Sql(err) => write!(f, "{err}"),
            Self::Wkb(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::NoFeatureLayer => write!(f, "no feature layer found in GeoPackage"),
            Self::UnsupportedGeometryType(ty) => write!(f, "unsupported geometry type: {ty}"),
            Self::InvalidDimension { z, m } => {
                write!(f, "invalid or mixed geometry dimension (z={z}, m={m})")
            }
            Self::InvalidGpkgGeometryMagic(magic) => {
                write!(f, "invalid gpkg geometry magic: {magic:02x?}")
            }
            Self::InvalidGpkgGeometryFlags(flags) => {
                write!(f, "invalid gpkg geometry flags: {flags:#04x}")
            }
            Self::InvalidGpkgGeometryLength { len, minimum } => {
                write!(
                    f,
                    "invalid gpkg geometry length: got {len} bytes, expected at least {minimum}"
                )
            }
            Self::InvalidGpkgGeometryEnvelope { len, required } => {
                write!(
                    f,
                    "invalid gpkg geometry envelope length: got {len} bytes, required {required}"
                )
            }
            Self::CompositePrimaryKeyUnsupported { layer_name } => write!(
                f,
                "composite primary keys are not supported for layer: {layer_name}"
            ),
            Self::Reprojection(message) => write!(f, "reprojection failed: {message}"),
            Self::ConverterSpawn { program, source } => {
                write!(f, "failed to run {program}: {source}")
            }
            Self::ConverterFailed {
                program,
                status,
                stderr,
            } => match status {
                Some(code) => write!(f, "{program} failed (exit status {code}): {stderr}"),
                None => write!(f, "{program} failed (terminated by signal): {stderr}"),
            },
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sql(err) => Some(err),
            Self::Wkb(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::ConverterSpawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for ConvertError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sql(err)
    }
}

impl From<wkb::error::WkbError> for ConvertError {
    fn from(err: wkb::error::WkbError) -> Self {
        Self::Wkb(err)
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
