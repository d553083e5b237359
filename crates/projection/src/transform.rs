//! Coordinate transformation between two spatial references.
//!
//! Points always pass through geographic coordinates on the way. No datum
//! shift is applied; NAD83 and WGS 84 are treated as coincident, which is
//! within the tolerance of HEC-RAS survey data.

use ras_common::{RasError, RasResult};
use tracing::debug;

use crate::epsg;
use crate::srs::{AxisOrder, Projector, SpatialReference};

/// Transformation from a source CRS to a destination CRS.
///
/// Input coordinates are in traditional GIS order (easting/northing, or
/// longitude/latitude for geographic sources). Output follows the
/// destination's authority axis order, see [`CoordinateTransform::output_axis_order`].
#[derive(Debug, Clone)]
pub struct CoordinateTransform {
    source: SpatialReference,
    destination: SpatialReference,
    source_projector: Option<Projector>,
    destination_projector: Option<Projector>,
}

impl CoordinateTransform {
    /// Build a transform; both references must validate.
    pub fn new(source: SpatialReference, destination: SpatialReference) -> RasResult<Self> {
        source.validate()?;
        destination.validate()?;

        let source_projector = projector_for(&source)?;
        let destination_projector = projector_for(&destination)?;

        if source.datum != destination.datum {
            debug!(
                source = %source.datum,
                destination = %destination.datum,
                "Datums differ; no datum shift applied"
            );
        }

        Ok(Self {
            source,
            destination,
            source_projector,
            destination_projector,
        })
    }

    /// Build a transform from WKT (OGC or ESRI dialect) to an EPSG code.
    pub fn from_wkt_to_epsg(source_wkt: &str, destination_epsg: u32) -> RasResult<Self> {
        let source = SpatialReference::from_wkt(source_wkt)?;
        let destination = epsg::from_epsg(destination_epsg)?;
        Self::new(source, destination)
    }

    pub fn source(&self) -> &SpatialReference {
        &self.source
    }

    pub fn destination(&self) -> &SpatialReference {
        &self.destination
    }

    /// Axis order of the coordinates returned by [`transform`](Self::transform).
    pub fn output_axis_order(&self) -> AxisOrder {
        self.destination.axis_order()
    }

    /// Transform one point.
    pub fn transform(&self, x: f64, y: f64) -> RasResult<(f64, f64)> {
        let (lon, lat) = match &self.source_projector {
            Some(p) => {
                let mpu = linear_factor(&self.source);
                p.inverse(x * mpu, y * mpu)
            }
            None => (
                (x + self.source.prime_meridian).to_radians(),
                y.to_radians(),
            ),
        };

        let (out_x, out_y) = match &self.destination_projector {
            Some(p) => {
                let mpu = linear_factor(&self.destination);
                let (mx, my) = p.forward(lon, lat);
                (mx / mpu, my / mpu)
            }
            None => (
                lon.to_degrees() - self.destination.prime_meridian,
                lat.to_degrees(),
            ),
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(RasError::ProjectionError(format!(
                "({}, {}) cannot be transformed into {}",
                x, y, self.destination.name
            )));
        }

        Ok(match self.output_axis_order() {
            AxisOrder::XY => (out_x, out_y),
            AxisOrder::LatLon => (out_y, out_x),
        })
    }

    /// Transform a sequence of points, failing on the first bad one.
    pub fn transform_points(&self, points: &[(f64, f64)]) -> RasResult<Vec<(f64, f64)>> {
        points.iter().map(|&(x, y)| self.transform(x, y)).collect()
    }
}

fn projector_for(srs: &SpatialReference) -> RasResult<Option<Projector>> {
    if srs.is_geographic() {
        Ok(None)
    } else {
        srs.projector().map(Some)
    }
}

fn linear_factor(srs: &SpatialReference) -> f64 {
    srs.linear_unit().map(|u| u.meters_per_unit).unwrap_or(1.0)
}
