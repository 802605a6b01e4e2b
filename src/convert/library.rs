use crate::encode::{geometry_to_geojson, properties_to_json};
use crate::error::{ConvertError, Result};
use crate::gpkg::Gpkg;
use crate::reproject::{Crs, CrsEngine, Reprojector, reproject_geometry};
use geojson::{Feature, FeatureCollection, Geometry};
use std::io::Read;
use tracing::{debug, warn};

use super::scratch::persist_source;
use super::{Convert, ConvertOptions};

/// Converts in process: reads the first feature layer with rusqlite and
/// reprojects geometries to WGS 84 with an embedded [`CrsEngine`].
pub struct LibraryConverter {
    engine: Box<dyn CrsEngine>,
    options: ConvertOptions,
}

enum Reprojection {
    /// Source is already WGS 84, or has no usable CRS.
    Skip,
    Ready(Box<dyn Reprojector>),
    /// No transformation could be built; geometries are kept as they are.
    Unavailable,
}

impl LibraryConverter {
    pub fn new(engine: Box<dyn CrsEngine>, options: ConvertOptions) -> Self {
        Self { engine, options }
    }

    fn read_collection(&self, gpkg: &Gpkg) -> Result<FeatureCollection> {
        let layer_name = gpkg
            .list_layers()?
            .into_iter()
            .next()
            .ok_or(ConvertError::NoFeatureLayer)?;
        let layer = gpkg.open_layer(&layer_name)?;
        let source_crs = gpkg.spatial_ref_sys(layer.srs_id)?;
        debug!(
            layer = %layer_name,
            srs_id = layer.srs_id,
            crs = ?source_crs.as_ref().map(Crs::identifier),
            "reading feature layer"
        );

        let reprojection = self.plan_reprojection(source_crs.as_ref())?;

        let mut features = Vec::new();
        for feature in layer.features(self.options.batch_size)? {
            let feature = feature?;
            let geometry = match feature.geometry()? {
                Some(wkb) => Some(self.to_target_crs(
                    geometry_to_geojson(&wkb)?,
                    &reprojection,
                    feature.id(),
                )?),
                None => None,
            };
            features.push(Feature {
                bbox: None,
                geometry,
                id: None,
                properties: Some(properties_to_json(
                    &layer.property_columns,
                    feature.properties(),
                )),
                foreign_members: None,
            });
        }
        debug!(layer = %layer_name, features = features.len(), "converted feature layer");

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    fn plan_reprojection(&self, source: Option<&Crs>) -> Result<Reprojection> {
        let target = Crs::wgs84();
        let source = match source {
            Some(crs) if !crs.is_undefined() && !crs.same_as(&target) => crs,
            _ => return Ok(Reprojection::Skip),
        };

        match self.engine.reprojector(source, &target) {
            Ok(reprojector) => Ok(Reprojection::Ready(reprojector)),
            Err(err) if self.options.best_effort_reprojection => {
                warn!(
                    crs = %source.identifier(),
                    error = %err,
                    "cannot reproject layer, keeping original geometries"
                );
                Ok(Reprojection::Unavailable)
            }
            Err(err) => Err(err),
        }
    }

    fn to_target_crs(
        &self,
        geometry: Geometry,
        reprojection: &Reprojection,
        feature_id: i64,
    ) -> Result<Geometry> {
        let Reprojection::Ready(reprojector) = reprojection else {
            return Ok(geometry);
        };
        match reproject_geometry(&geometry, reprojector.as_ref()) {
            Ok(reprojected) => Ok(reprojected),
            Err(err) if self.options.best_effort_reprojection => {
                warn!(
                    feature_id,
                    error = %err,
                    "cannot reproject feature, keeping original geometry"
                );
                Ok(geometry)
            }
            Err(err) => Err(err),
        }
    }
}

impl Convert for LibraryConverter {
    fn convert(&self, source: &mut dyn Read) -> Result<Vec<u8>> {
        let scratch = persist_source(source, self.options.temp_dir.as_deref())?;
        // Declared after `scratch`, so the connection is closed before the
        // directory is removed.
        let gpkg = Gpkg::open_read_only(scratch.path())?;
        let collection = self.read_collection(&gpkg)?;
        Ok(serde_json::to_vec(&collection)?)
    }
}
