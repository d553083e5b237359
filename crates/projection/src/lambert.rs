//! Lambert Conformal Conic projection (ellipsoidal).
//!
//! This is the projection behind most US State Plane zones that run
//! east-west, which is where the bulk of HEC-RAS models are georeferenced.
//! It maps a cone secant (two standard parallels) or tangent (one standard
//! parallel plus a scale factor) to the ellipsoid onto a flat plane.
//!
//! The projection parameters include:
//! - Latitude of origin (lat0): where the false northing is applied
//! - Central meridian (lon0)
//! - Standard parallel(s): latin1 and latin2 (equal for a tangent cone)
//! - False easting/northing in meters
//!
//! Formulas follow Snyder (1987), section 15.

use std::f64::consts::PI;

use crate::ellipsoid::Ellipsoid;

/// Lambert Conformal Conic projection parameters.
///
/// Angles are stored in radians and offsets in meters. `forward` and
/// `inverse` work in radians on the geographic side.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// Scale factor applied at the standard parallel(s)
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a secant-cone projection from two standard parallels.
    ///
    /// # Arguments
    /// * `lat0_deg` - Latitude of origin (degrees)
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `latin1_deg` - First standard parallel (degrees)
    /// * `latin2_deg` - Second standard parallel (degrees)
    /// * `k0` - Scale factor (1.0 for all State Plane zones)
    /// * `false_easting` / `false_northing` - Offsets in meters
    #[allow(clippy::too_many_arguments)]
    pub fn two_standard_parallels(
        lat0_deg: f64,
        lon0_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let to_rad = PI / 180.0;

        let lat0 = lat0_deg * to_rad;
        let lon0 = lon0_deg * to_rad;
        let latin1 = latin1_deg * to_rad;
        let latin2 = latin2_deg * to_rad;

        let m1 = ellipsoid.m(latin1);
        let t1 = ellipsoid.t(latin1);

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let m2 = ellipsoid.m(latin2);
            let t2 = ellipsoid.t(latin2);
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };

        // Compute F constant
        let f = m1 / (n * t1.powf(n));

        // Compute rho at the latitude of origin
        let rho0 = ellipsoid.a * f * k0 * ellipsoid.t(lat0).powf(n);

        Self {
            lon0,
            lat0,
            latin1,
            latin2,
            k0,
            false_easting,
            false_northing,
            ellipsoid,
            n,
            f,
            rho0,
        }
    }

    /// Create a tangent-cone projection whose single standard parallel is
    /// the latitude of origin, scaled by `k0`.
    pub fn one_standard_parallel(
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        Self::two_standard_parallels(
            lat0_deg,
            lon0_deg,
            lat0_deg,
            lat0_deg,
            k0,
            false_easting,
            false_northing,
            ellipsoid,
        )
    }

    /// Cone constant; zero or non-finite means the parameters are unusable.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Convert geographic coordinates (radians) to projected meters.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        // Compute rho for this latitude
        let rho = self.ellipsoid.a * self.f * self.k0 * self.ellipsoid.t(lat).powf(self.n);

        // Compute theta (angle from central meridian)
        let theta = self.n * dlon;

        let x = self.false_easting + rho * theta.sin();
        let y = self.false_northing + self.rho0 - rho * theta.cos();

        (x, y)
    }

    /// Convert projected meters to geographic coordinates (radians).
    ///
    /// Returns (lon, lat).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);
        let sign = self.n.signum();

        // Compute rho and theta from x, y
        let rho = sign * (dx * dx + dy * dy).sqrt();
        let theta = (sign * dx).atan2(sign * dy);

        let lon = self.lon0 + theta / self.n;
        let lat = if rho == 0.0 {
            sign * PI / 2.0
        } else {
            let t = (rho / (self.ellipsoid.a * self.f * self.k0)).powf(1.0 / self.n);
            self.ellipsoid.phi_from_t(t)
        };

        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const US_FOOT: f64 = 1200.0 / 3937.0;

    /// NAD27 / Texas South Central, the worked example used throughout the
    /// geodesy literature.
    fn texas_south_central() -> LambertConformal {
        LambertConformal::two_standard_parallels(
            27.0 + 50.0 / 60.0,
            -99.0,
            28.0 + 23.0 / 60.0,
            30.0 + 17.0 / 60.0,
            1.0,
            2_000_000.0 * US_FOOT,
            0.0,
            Ellipsoid::CLARKE_1866,
        )
    }

    #[test]
    fn test_texas_forward() {
        let proj = texas_south_central();
        let (x, y) = proj.forward((-96.0_f64).to_radians(), 28.5_f64.to_radians());

        let easting_ft = x / US_FOOT;
        let northing_ft = y / US_FOOT;
        assert!((easting_ft - 2_963_503.91).abs() < 0.05, "easting {}", easting_ft);
        assert!((northing_ft - 254_759.80).abs() < 0.05, "northing {}", northing_ft);
    }

    #[test]
    fn test_origin_maps_to_false_origin() {
        let proj = texas_south_central();
        let (x, y) = proj.forward((-99.0_f64).to_radians(), (27.0 + 50.0 / 60.0_f64).to_radians());
        assert!((x - 2_000_000.0 * US_FOOT).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        let proj = LambertConformal::two_standard_parallels(
            37.0 + 2.0 / 3.0,
            -77.0,
            38.3,
            39.45,
            1.0,
            400_000.0,
            0.0,
            Ellipsoid::GRS80,
        );

        let lon = (-76.6_f64).to_radians();
        let lat = 39.3_f64.to_radians();
        let (x, y) = proj.forward(lon, lat);
        let (lon2, lat2) = proj.inverse(x, y);

        assert!((lon - lon2).abs() < 1e-10, "lon roundtrip failed: {} vs {}", lon, lon2);
        assert!((lat - lat2).abs() < 1e-10, "lat roundtrip failed: {} vs {}", lat, lat2);
    }

    #[test]
    fn test_tangent_cone() {
        let proj = LambertConformal::one_standard_parallel(
            18.0,
            -77.0,
            1.0,
            250_000.0,
            150_000.0,
            Ellipsoid::CLARKE_1866,
        );
        assert!((proj.cone_constant() - 18.0_f64.to_radians().sin()).abs() < 1e-12);

        let (x, y) = proj.forward((-76.0_f64).to_radians(), 17.5_f64.to_radians());
        let (lon, lat) = proj.inverse(x, y);
        assert!((lon.to_degrees() + 76.0).abs() < 1e-9);
        assert!((lat.to_degrees() - 17.5).abs() < 1e-9);
    }
}
