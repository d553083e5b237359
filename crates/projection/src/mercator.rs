//! Mercator projection, including the spherical Web Mercator variant.

use std::f64::consts::PI;

use crate::ellipsoid::Ellipsoid;

#[derive(Debug, Clone)]
pub struct Mercator {
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the equator (derived from the standard parallel for 2SP)
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
}

impl Mercator {
    /// Variant A: scale factor on the equator.
    pub fn one_standard_parallel(
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            ellipsoid,
        }
    }

    /// Variant B: true scale along `lat_ts_deg`.
    pub fn two_standard_parallels(
        lon0_deg: f64,
        lat_ts_deg: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let k0 = ellipsoid.m(lat_ts_deg.to_radians());
        Self::one_standard_parallel(lon0_deg, k0, false_easting, false_northing, ellipsoid)
    }

    /// EPSG:3857.
    pub fn web_mercator() -> Self {
        Self::one_standard_parallel(0.0, 1.0, 0.0, 0.0, Ellipsoid::WEB_MERCATOR_SPHERE)
    }

    /// Convert geographic coordinates (radians) to projected meters.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let ak = self.ellipsoid.a * self.k0;
        let x = self.false_easting + ak * dlon;
        let y = self.false_northing - ak * self.ellipsoid.t(lat).ln();
        (x, y)
    }

    /// Convert projected meters to geographic coordinates (radians).
    ///
    /// Returns (lon, lat).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let ak = self.ellipsoid.a * self.k0;
        let t = ((self.false_northing - y) / ak).exp();
        let lon = self.lon0 + (x - self.false_easting) / ak;
        (lon, self.ellipsoid.phi_from_t(t))
    }
}
