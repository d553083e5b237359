//! Built-in EPSG definitions for destination reference systems.
//!
//! Only the codes features are commonly delivered in are registered:
//! geographic WGS 84 / NAD83 / NAD27, Web Mercator, CONUS Albers and the
//! UTM zone families.

use ras_common::{RasError, RasResult};

use crate::ellipsoid::Ellipsoid;
use crate::srs::{CrsKind, LinearUnit, ProjectionMethod, ProjectionParams, SpatialReference};

fn geographic(code: u32, name: &str, datum: &str, ellipsoid: Ellipsoid) -> SpatialReference {
    SpatialReference {
        name: name.to_string(),
        datum: datum.to_string(),
        ellipsoid,
        prime_meridian: 0.0,
        kind: CrsKind::Geographic,
        epsg: Some(code),
    }
}

fn projected(
    code: u32,
    name: String,
    base: SpatialReference,
    method: ProjectionMethod,
    params: ProjectionParams,
) -> SpatialReference {
    SpatialReference {
        name,
        kind: CrsKind::Projected {
            method,
            params,
            unit: LinearUnit::metre(),
        },
        epsg: Some(code),
        ..base
    }
}

fn utm_params(zone: u32, north: bool) -> ProjectionParams {
    ProjectionParams {
        latitude_of_origin: 0.0,
        central_meridian: -183.0 + 6.0 * zone as f64,
        standard_parallel_1: None,
        standard_parallel_2: None,
        scale_factor: 0.9996,
        false_easting: 500_000.0,
        false_northing: if north { 0.0 } else { 10_000_000.0 },
    }
}

fn wgs84() -> SpatialReference {
    geographic(4326, "WGS 84", "WGS_1984", Ellipsoid::WGS84)
}

fn nad83() -> SpatialReference {
    geographic(4269, "NAD83", "North_American_Datum_1983", Ellipsoid::GRS80)
}

/// Resolve an EPSG code to a spatial reference.
pub fn from_epsg(code: u32) -> RasResult<SpatialReference> {
    let srs = match code {
        4326 => wgs84(),
        4269 => nad83(),
        4267 => geographic(4267, "NAD27", "North_American_Datum_1927", Ellipsoid::CLARKE_1866),
        3857 => projected(
            3857,
            "WGS 84 / Pseudo-Mercator".to_string(),
            wgs84(),
            ProjectionMethod::PseudoMercator,
            ProjectionParams {
                scale_factor: 1.0,
                ..Default::default()
            },
        ),
        5070 => projected(
            5070,
            "NAD83 / Conus Albers".to_string(),
            nad83(),
            ProjectionMethod::AlbersEqualArea,
            ProjectionParams {
                latitude_of_origin: 23.0,
                central_meridian: -96.0,
                standard_parallel_1: Some(29.5),
                standard_parallel_2: Some(45.5),
                scale_factor: 1.0,
                false_easting: 0.0,
                false_northing: 0.0,
            },
        ),
        32601..=32660 => {
            let zone = code - 32600;
            projected(
                code,
                format!("WGS 84 / UTM zone {}N", zone),
                wgs84(),
                ProjectionMethod::TransverseMercator,
                utm_params(zone, true),
            )
        }
        32701..=32760 => {
            let zone = code - 32700;
            projected(
                code,
                format!("WGS 84 / UTM zone {}S", zone),
                wgs84(),
                ProjectionMethod::TransverseMercator,
                utm_params(zone, false),
            )
        }
        26901..=26923 => {
            let zone = code - 26900;
            projected(
                code,
                format!("NAD83 / UTM zone {}N", zone),
                nad83(),
                ProjectionMethod::TransverseMercator,
                utm_params(zone, true),
            )
        }
        _ => {
            return Err(RasError::InvalidProjection(format!(
                "EPSG:{} is not a supported destination reference",
                code
            )))
        }
    };
    Ok(srs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::AxisOrder;

    #[test]
    fn test_geographic_codes_are_lat_lon() {
        for code in [4326, 4269, 4267] {
            let srs = from_epsg(code).unwrap();
            assert!(srs.is_geographic());
            assert_eq!(srs.axis_order(), AxisOrder::LatLon);
            srs.validate().unwrap();
        }
    }

    #[test]
    fn test_projected_codes_are_xy() {
        for code in [3857, 5070, 32617, 32718, 26916] {
            let srs = from_epsg(code).unwrap();
            assert_eq!(srs.axis_order(), AxisOrder::XY, "EPSG:{}", code);
            srs.validate().unwrap();
        }
    }

    #[test]
    fn test_utm_zone_parameters() {
        let srs = from_epsg(32617).unwrap();
        match srs.kind {
            CrsKind::Projected { params, .. } => assert_eq!(params.central_meridian, -81.0),
            CrsKind::Geographic => panic!("expected projected"),
        }
    }

    #[test]
    fn test_unknown_code() {
        assert!(matches!(from_epsg(9999), Err(RasError::InvalidProjection(_))));
        assert!(from_epsg(32661).is_err());
    }
}
