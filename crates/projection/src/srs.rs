//! Spatial reference systems interpreted from WKT or EPSG codes.

use ras_common::{RasError, RasResult};

use crate::albers::AlbersEqualArea;
use crate::ellipsoid::Ellipsoid;
use crate::lambert::LambertConformal;
use crate::mercator::Mercator;
use crate::transverse_mercator::TransverseMercator;
use crate::wkt::{self, WktNode};

/// Axis ordering convention of a CRS.
///
/// EPSG defines geographic CRSs like 4326 as latitude-first, while projected
/// CRSs and OGC:CRS84 are easting/longitude-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// X/Y order (easting, northing) or (lon, lat)
    XY,
    /// Lat/Lon order (latitude first)
    LatLon,
}

/// Linear unit of a projected CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearUnit {
    pub name: String,
    pub meters_per_unit: f64,
}

impl LinearUnit {
    pub fn metre() -> Self {
        Self {
            name: "metre".to_string(),
            meters_per_unit: 1.0,
        }
    }

    pub fn is_foot(&self) -> bool {
        (self.meters_per_unit - 0.3048).abs() < 1e-5
            || (self.meters_per_unit - 1200.0 / 3937.0).abs() < 1e-5
    }
}

/// Supported projection methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMethod {
    LambertConformalConic2SP,
    LambertConformalConic1SP,
    TransverseMercator,
    AlbersEqualArea,
    Mercator1SP,
    Mercator2SP,
    PseudoMercator,
}

impl ProjectionMethod {
    /// Recognize an OGC (or already morphed ESRI) projection name.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "lambertconformalconic2sp" | "lambertconformalconic" => {
                Some(Self::LambertConformalConic2SP)
            }
            "lambertconformalconic1sp" => Some(Self::LambertConformalConic1SP),
            "transversemercator" | "gausskruger" => Some(Self::TransverseMercator),
            "albersconicequalarea" | "albers" => Some(Self::AlbersEqualArea),
            "mercator1sp" | "mercator" => Some(Self::Mercator1SP),
            "mercator2sp" => Some(Self::Mercator2SP),
            "popularvisualisationpseudomercator" | "mercatorauxiliarysphere" => {
                Some(Self::PseudoMercator)
            }
            _ => None,
        }
    }
}

/// Projection parameters in degrees and CRS linear units, as written in WKT.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectionParams {
    pub latitude_of_origin: f64,
    pub central_meridian: f64,
    pub standard_parallel_1: Option<f64>,
    pub standard_parallel_2: Option<f64>,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// Geographic or projected flavor of a [`SpatialReference`].
#[derive(Debug, Clone, PartialEq)]
pub enum CrsKind {
    Geographic,
    Projected {
        method: ProjectionMethod,
        params: ProjectionParams,
        unit: LinearUnit,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialReference {
    pub name: String,
    pub datum: String,
    pub ellipsoid: Ellipsoid,
    /// Prime meridian longitude east of Greenwich (degrees)
    pub prime_meridian: f64,
    pub kind: CrsKind,
    /// EPSG code when the definition carries one
    pub epsg: Option<u32>,
}

/// A constructed projection working in meters and radians.
#[derive(Debug, Clone)]
pub(crate) enum Projector {
    Lambert(LambertConformal),
    TransverseMercator(TransverseMercator),
    Albers(AlbersEqualArea),
    Mercator(Mercator),
}

impl Projector {
    pub(crate) fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projector::Lambert(p) => p.forward(lon, lat),
            Projector::TransverseMercator(p) => p.forward(lon, lat),
            Projector::Albers(p) => p.forward(lon, lat),
            Projector::Mercator(p) => p.forward(lon, lat),
        }
    }

    pub(crate) fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projector::Lambert(p) => p.inverse(x, y),
            Projector::TransverseMercator(p) => p.inverse(x, y),
            Projector::Albers(p) => p.inverse(x, y),
            Projector::Mercator(p) => p.inverse(x, y),
        }
    }
}

impl SpatialReference {
    /// Interpret WKT1 text. ESRI-dialect names are morphed to OGC first.
    pub fn from_wkt(text: &str) -> RasResult<Self> {
        let root = wkt::morph_from_esri(wkt::parse(text)?);
        match root.keyword.to_ascii_uppercase().as_str() {
            "PROJCS" => Self::from_projcs(&root),
            "GEOGCS" => Self::from_geogcs(&root),
            other => Err(RasError::InvalidProjection(format!(
                "unsupported WKT root {}",
                other
            ))),
        }
    }

    fn from_geogcs(geogcs: &WktNode) -> RasResult<Self> {
        let datum = geogcs
            .child("DATUM")
            .ok_or_else(|| invalid("GEOGCS without DATUM"))?;
        let spheroid = datum
            .child("SPHEROID")
            .ok_or_else(|| invalid("DATUM without SPHEROID"))?;
        let a = spheroid
            .number(1)
            .ok_or_else(|| invalid("SPHEROID semi-major axis"))?;
        let rf = spheroid
            .number(2)
            .ok_or_else(|| invalid("SPHEROID inverse flattening"))?;

        let prime_meridian = geogcs
            .child("PRIMEM")
            .and_then(|p| p.number(1))
            .unwrap_or(0.0);

        Ok(Self {
            name: geogcs.name().unwrap_or_default().to_string(),
            datum: datum.name().unwrap_or_default().to_string(),
            ellipsoid: Ellipsoid::from_inverse_flattening(a, rf),
            prime_meridian,
            kind: CrsKind::Geographic,
            epsg: authority_code(geogcs),
        })
    }

    fn from_projcs(projcs: &WktNode) -> RasResult<Self> {
        let geogcs = projcs
            .child("GEOGCS")
            .ok_or_else(|| invalid("PROJCS without GEOGCS"))?;
        let base = Self::from_geogcs(geogcs)?;

        let projection_name = projcs
            .child("PROJECTION")
            .and_then(|p| p.name())
            .ok_or_else(|| invalid("PROJCS without PROJECTION"))?;
        let method = ProjectionMethod::from_name(projection_name)
            .ok_or_else(|| invalid(&format!("unsupported projection {}", projection_name)))?;

        let unit_node = projcs
            .child("UNIT")
            .ok_or_else(|| invalid("PROJCS without linear UNIT"))?;
        let unit = LinearUnit {
            name: unit_node.name().unwrap_or_default().to_string(),
            meters_per_unit: unit_node
                .number(1)
                .ok_or_else(|| invalid("linear UNIT without conversion factor"))?,
        };

        // Angular parameters are in the GEOGCS angular unit
        let radians_per_unit = geogcs
            .child("UNIT")
            .and_then(|u| u.number(1))
            .unwrap_or(std::f64::consts::PI / 180.0);
        let to_degrees = radians_per_unit.to_degrees();

        let param = |aliases: &[&str]| -> Option<f64> {
            projcs.children("PARAMETER").find_map(|p| {
                let name = p.name()?;
                aliases
                    .iter()
                    .any(|alias| name.eq_ignore_ascii_case(alias))
                    .then(|| p.number(1))
                    .flatten()
            })
        };

        let standard_parallel_1 =
            param(&["standard_parallel_1", "latitude_of_1st_standard_parallel"]).map(|v| v * to_degrees);
        let standard_parallel_2 =
            param(&["standard_parallel_2", "latitude_of_2nd_standard_parallel"]).map(|v| v * to_degrees);
        let latitude_of_origin = param(&[
            "latitude_of_origin",
            "latitude_of_center",
            "latitude_of_false_origin",
        ])
        .map(|v| v * to_degrees)
        .or(standard_parallel_1)
        .unwrap_or(0.0);
        let central_meridian = param(&[
            "central_meridian",
            "longitude_of_center",
            "longitude_of_origin",
            "longitude_of_false_origin",
        ])
        .map(|v| v * to_degrees)
        .ok_or_else(|| invalid("missing central meridian"))?;

        let params = ProjectionParams {
            latitude_of_origin,
            central_meridian,
            standard_parallel_1,
            standard_parallel_2,
            scale_factor: param(&["scale_factor"]).unwrap_or(1.0),
            false_easting: param(&["false_easting"]).unwrap_or(0.0),
            false_northing: param(&["false_northing"]).unwrap_or(0.0),
        };

        Ok(Self {
            name: projcs.name().unwrap_or_default().to_string(),
            kind: CrsKind::Projected {
                method,
                params,
                unit,
            },
            epsg: authority_code(projcs),
            ..base
        })
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self.kind, CrsKind::Geographic)
    }

    /// Linear unit for projected CRSs; `None` for geographic ones.
    pub fn linear_unit(&self) -> Option<&LinearUnit> {
        match &self.kind {
            CrsKind::Projected { unit, .. } => Some(unit),
            CrsKind::Geographic => None,
        }
    }

    /// Authority axis order: EPSG geographic CRSs are latitude-first.
    pub fn axis_order(&self) -> AxisOrder {
        if self.is_geographic() && self.epsg.is_some() {
            AxisOrder::LatLon
        } else {
            AxisOrder::XY
        }
    }

    /// Check that the definition describes a usable CRS.
    pub fn validate(&self) -> RasResult<()> {
        if !self.ellipsoid.is_valid() {
            return Err(invalid(&format!("invalid ellipsoid for {}", self.name)));
        }
        if !self.prime_meridian.is_finite() {
            return Err(invalid("invalid prime meridian"));
        }
        if let CrsKind::Projected { method, params, unit } = &self.kind {
            if !(unit.meters_per_unit.is_finite() && unit.meters_per_unit > 0.0) {
                return Err(invalid(&format!("invalid linear unit {}", unit.name)));
            }
            if params.latitude_of_origin.abs() > 90.0 || !params.central_meridian.is_finite() {
                return Err(invalid("projection origin out of range"));
            }
            let needs_two = matches!(
                method,
                ProjectionMethod::LambertConformalConic2SP | ProjectionMethod::AlbersEqualArea
            );
            if needs_two
                && (params.standard_parallel_1.is_none() || params.standard_parallel_2.is_none())
            {
                return Err(invalid(&format!("{:?} requires two standard parallels", method)));
            }
            if *method == ProjectionMethod::Mercator2SP && params.standard_parallel_1.is_none() {
                return Err(invalid("Mercator_2SP requires standard_parallel_1"));
            }
            if !(params.scale_factor.is_finite() && params.scale_factor > 0.0) {
                return Err(invalid("invalid scale factor"));
            }
            let cone = match self.projector()? {
                Projector::Lambert(p) => p.cone_constant(),
                Projector::Albers(p) => p.cone_constant(),
                _ => 1.0,
            };
            if !cone.is_finite() || cone == 0.0 {
                return Err(invalid("degenerate cone constant"));
            }
        }
        Ok(())
    }

    /// Build the projection; offsets are converted to meters.
    pub(crate) fn projector(&self) -> RasResult<Projector> {
        let CrsKind::Projected { method, params, unit } = &self.kind else {
            return Err(RasError::ProjectionError(format!(
                "{} is geographic",
                self.name
            )));
        };
        let mpu = unit.meters_per_unit;
        let fe = params.false_easting * mpu;
        let fn_ = params.false_northing * mpu;
        let lon0 = params.central_meridian + self.prime_meridian;
        let ell = self.ellipsoid;

        let projector = match method {
            ProjectionMethod::LambertConformalConic2SP => {
                Projector::Lambert(LambertConformal::two_standard_parallels(
                    params.latitude_of_origin,
                    lon0,
                    params.standard_parallel_1.unwrap_or(params.latitude_of_origin),
                    params.standard_parallel_2.unwrap_or(params.latitude_of_origin),
                    params.scale_factor,
                    fe,
                    fn_,
                    ell,
                ))
            }
            ProjectionMethod::LambertConformalConic1SP => Projector::Lambert(
                LambertConformal::one_standard_parallel(
                    params.latitude_of_origin,
                    lon0,
                    params.scale_factor,
                    fe,
                    fn_,
                    ell,
                ),
            ),
            ProjectionMethod::TransverseMercator => {
                Projector::TransverseMercator(TransverseMercator::new(
                    params.latitude_of_origin,
                    lon0,
                    params.scale_factor,
                    fe,
                    fn_,
                    ell,
                ))
            }
            ProjectionMethod::AlbersEqualArea => Projector::Albers(AlbersEqualArea::new(
                params.latitude_of_origin,
                lon0,
                params.standard_parallel_1.unwrap_or(params.latitude_of_origin),
                params.standard_parallel_2.unwrap_or(params.latitude_of_origin),
                fe,
                fn_,
                ell,
            )),
            ProjectionMethod::Mercator1SP => Projector::Mercator(
                Mercator::one_standard_parallel(lon0, params.scale_factor, fe, fn_, ell),
            ),
            ProjectionMethod::Mercator2SP => Projector::Mercator(Mercator::two_standard_parallels(
                lon0,
                params.standard_parallel_1.unwrap_or(0.0),
                fe,
                fn_,
                ell,
            )),
            // Spherical formulas on the datum's semi-major axis
            ProjectionMethod::PseudoMercator => Projector::Mercator(Mercator::one_standard_parallel(
                lon0,
                1.0,
                fe,
                fn_,
                Ellipsoid {
                    a: ell.a,
                    f: 0.0,
                },
            )),
        };
        Ok(projector)
    }
}

fn invalid(message: &str) -> RasError {
    RasError::InvalidProjection(message.to_string())
}

fn authority_code(node: &WktNode) -> Option<u32> {
    let authority = node.child("AUTHORITY")?;
    if !authority.name()?.eq_ignore_ascii_case("EPSG") {
        return None;
    }
    match authority.values.get(1)? {
        wkt::WktValue::Text(s) => s.trim().parse().ok(),
        wkt::WktValue::Number(n) => Some(*n as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESRI_INDIANA_EAST: &str = r#"PROJCS["NAD_1983_StatePlane_Indiana_East_FIPS_1301_Feet",GEOGCS["GCS_North_American_1983",DATUM["D_North_American_1983",SPHEROID["GRS_1980",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",328083.3333333333],PARAMETER["False_Northing",820208.3333333333],PARAMETER["Central_Meridian",-85.66666666666667],PARAMETER["Scale_Factor",0.9999666666666667],PARAMETER["Latitude_Of_Origin",37.5],UNIT["Foot_US",0.3048006096012192]]"#;

    #[test]
    fn test_from_esri_wkt() {
        let srs = SpatialReference::from_wkt(ESRI_INDIANA_EAST).unwrap();
        assert_eq!(srs.datum, "North_American_Datum_1983");
        assert!(!srs.is_geographic());
        assert!(srs.linear_unit().unwrap().is_foot());
        assert_eq!(srs.axis_order(), AxisOrder::XY);
        srs.validate().unwrap();

        match &srs.kind {
            CrsKind::Projected { method, params, .. } => {
                assert_eq!(*method, ProjectionMethod::TransverseMercator);
                assert!((params.central_meridian + 85.666_666_666_666_67).abs() < 1e-12);
                assert!((params.latitude_of_origin - 37.5).abs() < 1e-12);
            }
            CrsKind::Geographic => panic!("expected projected CRS"),
        }
    }

    #[test]
    fn test_geographic_with_authority_is_lat_lon() {
        let srs = SpatialReference::from_wkt(
            r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#,
        )
        .unwrap();
        assert!(srs.is_geographic());
        assert_eq!(srs.epsg, Some(4326));
        assert_eq!(srs.axis_order(), AxisOrder::LatLon);
        assert!(srs.linear_unit().is_none());
    }

    #[test]
    fn test_unsupported_projection_is_invalid() {
        let wkt = ESRI_INDIANA_EAST.replace("Transverse_Mercator", "Hotine_Oblique_Mercator");
        assert!(matches!(
            SpatialReference::from_wkt(&wkt),
            Err(RasError::InvalidProjection(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_parallel() {
        let wkt = r#"PROJCS["x",GEOGCS["g",DATUM["d",SPHEROID["GRS 1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Albers_Conic_Equal_Area"],PARAMETER["standard_parallel_1",29.5],PARAMETER["longitude_of_center",-96],UNIT["metre",1]]"#;
        let srs = SpatialReference::from_wkt(wkt).unwrap();
        assert!(srs.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_ellipsoid() {
        let wkt = ESRI_INDIANA_EAST.replace("6378137.0,298.257222101", "-1.0,298.257222101");
        let srs = SpatialReference::from_wkt(&wkt).unwrap();
        assert!(srs.validate().is_err());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(
            ProjectionMethod::from_name("Lambert_Conformal_Conic_2SP"),
            Some(ProjectionMethod::LambertConformalConic2SP)
        );
        assert_eq!(
            ProjectionMethod::from_name("Popular Visualisation Pseudo Mercator"),
            Some(ProjectionMethod::PseudoMercator)
        );
        assert_eq!(ProjectionMethod::from_name("Polyconic"), None);
    }
}
