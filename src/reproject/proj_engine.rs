//! PROJ-backed reprojection, available with the `reproject` feature.

use super::{Crs, CrsEngine, Reprojector};
use crate::error::{ConvertError, Result};
use proj::Proj;
use tracing::debug;

/// Reprojection engine backed by the PROJ library.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjEngine;

impl ProjEngine {
    /// Return the engine when PROJ can build a transformation at runtime.
    ///
    /// A PROJ build without its resource database fails here, which makes
    /// the engine count as unavailable.
    pub fn probe() -> Option<Self> {
        match Proj::new_known_crs("EPSG:4326", "EPSG:3857", None) {
            Ok(_) => Some(Self),
            Err(err) => {
                debug!(error = %err, "PROJ is not usable");
                None
            }
        }
    }
}

impl CrsEngine for ProjEngine {
    fn reprojector(&self, source: &Crs, target: &Crs) -> Result<Box<dyn Reprojector>> {
        let from = source.proj_definition();
        let to = target.proj_definition();
        // new_known_crs normalizes axis order to longitude/latitude (x/y),
        // which is what GeoPackage and GeoJSON both store.
        let proj = Proj::new_known_crs(&from, &to, None).map_err(|err| {
            ConvertError::Reprojection(format!(
                "failed to create projection from {} to {}: {err}",
                source.identifier(),
                target.identifier()
            ))
        })?;
        Ok(Box::new(ProjReprojector { proj }))
    }
}

struct ProjReprojector {
    proj: Proj,
}

impl Reprojector for ProjReprojector {
    fn reproject(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (x, y) = self
            .proj
            .convert((x, y))
            .map_err(|err| ConvertError::Reprojection(err.to_string()))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(ConvertError::Reprojection(
                "coordinate transformation produced a non-finite value".to_string(),
            ));
        }
        Ok((x, y))
    }
}
