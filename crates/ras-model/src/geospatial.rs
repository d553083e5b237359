//! Vector features of every geometry file, in a destination reference system.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use projection::{CoordinateTransform, SpatialReference};
use ras_common::{file_name, RasError, RasResult, UnitSystem};
use ras_parser::{build_features, Features};

use crate::workers::{first_error, run_per_file};
use crate::RasModel;

pub const DEFAULT_DESTINATION_EPSG: u32 = 4326;

/// Parameters of a geospatial extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// EPSG code features are delivered in
    pub destination_epsg: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            destination_epsg: DEFAULT_DESTINATION_EPSG,
        }
    }
}

/// Features per geometry file name, plus the EPSG code they are in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    pub features: BTreeMap<String, Features>,
    pub georeference: u32,
}

/// Check that the model's declared unit system matches the linear unit of
/// its projection. Geographic references have no linear unit and are
/// rejected.
pub fn check_unit_consistency(units: UnitSystem, srs: &SpatialReference) -> RasResult<()> {
    let mismatch = |crs_units: &str| RasError::UnitMismatch {
        model_units: units.to_string(),
        crs_units: crs_units.to_string(),
    };
    if srs.is_geographic() {
        return Err(mismatch("degree"));
    }
    match srs.linear_unit() {
        Some(unit) if units.accepts_linear_unit(unit.meters_per_unit) => Ok(()),
        Some(unit) => Err(mismatch(&unit.name)),
        None => Err(mismatch("unknown")),
    }
}

impl RasModel {
    /// Build the features of every geometry file.
    #[instrument(skip(self), fields(path = %self.definition_file()))]
    pub async fn geospatial_data(&self, config: &ExtractionConfig) -> RasResult<GeoData> {
        let projection = self.metadata.projection.as_ref().ok_or_else(|| {
            RasError::InvalidProjection(format!(
                "no valid coordinate reference system found for {}",
                self.definition_file()
            ))
        })?;

        let source = SpatialReference::from_wkt(&projection.wkt)?;
        check_unit_consistency(self.metadata.project.units, &source)?;
        let transform = Arc::new(CoordinateTransform::new(
            source,
            projection::from_epsg(config.destination_epsg)?,
        )?);

        let keys: Vec<String> = self
            .metadata
            .geom_files
            .iter()
            .map(|g| g.path.clone())
            .collect();
        let results = run_per_file(&self.store, &keys, move |key, fetched| {
            build_features(key, &fetched?, &transform)
        })
        .await;

        let (built, error) = first_error("geometry", &keys, results);
        if let Some(e) = error {
            return Err(e);
        }

        let features: BTreeMap<String, Features> = keys
            .iter()
            .map(|key| file_name(key).to_string())
            .zip(built)
            .collect();

        info!(
            files = features.len(),
            layers = features.values().map(Features::len).sum::<usize>(),
            epsg = config.destination_epsg,
            "Extracted geospatial data"
        );

        Ok(GeoData {
            features,
            georeference: config.destination_epsg,
        })
    }
}
