//! Transverse Mercator projection (ellipsoidal series, Snyder section 8).
//!
//! Used by UTM and the north-south State Plane zones. The series is accurate
//! to well under a centimeter within the few degrees of the central meridian
//! these grids cover.

use crate::ellipsoid::Ellipsoid;

#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
    /// Meridional distance to the latitude of origin
    m0: f64,
}

impl TransverseMercator {
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        Self {
            lon0: lon0_deg.to_radians(),
            lat0,
            k0,
            false_easting,
            false_northing,
            ellipsoid,
            m0: meridional_distance(&ellipsoid, lat0),
        }
    }

    /// UTM zone (1-60) on the given ellipsoid.
    pub fn utm(zone: u32, north: bool, ellipsoid: Ellipsoid) -> Self {
        let lon0 = -183.0 + 6.0 * zone as f64;
        let false_northing = if north { 0.0 } else { 10_000_000.0 };
        Self::new(0.0, lon0, 0.9996, 500_000.0, false_northing, ellipsoid)
    }

    /// Convert geographic coordinates (radians) to projected meters.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let ep2 = e2 / (1.0 - e2);

        let sin_phi = lat.sin();
        let cos_phi = lat.cos();
        let tan_phi = lat.tan();

        let n = a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let big_a = (lon - self.lon0) * cos_phi;
        let m = meridional_distance(&self.ellipsoid, lat);

        let a2 = big_a * big_a;
        let a3 = a2 * big_a;
        let a4 = a3 * big_a;
        let a5 = a4 * big_a;
        let a6 = a5 * big_a;

        let x = self.false_easting
            + self.k0
                * n
                * (big_a
                    + (1.0 - t + c) * a3 / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);

        let y = self.false_northing
            + self.k0
                * (m - self.m0
                    + n * tan_phi
                        * (a2 / 2.0
                            + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                            + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

        (x, y)
    }

    /// Convert projected meters to geographic coordinates (radians).
    ///
    /// Returns (lon, lat).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);

        let m = self.m0 + (y - self.false_northing) / self.k0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

        let sqrt_1me2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1me2) / (1.0 + sqrt_1me2);

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin1 = phi1.sin();
        let cos1 = phi1.cos();
        let tan1 = phi1.tan();

        let c1 = ep2 * cos1 * cos1;
        let t1 = tan1 * tan1;
        let n1 = a / (1.0 - e2 * sin1 * sin1).sqrt();
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sin1 * sin1).powf(1.5);
        let d = (x - self.false_easting) / (n1 * self.k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = phi1
            - (n1 * tan1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5
                    / 120.0)
                / cos1;

        (lon, lat)
    }
}

/// Distance along the meridian from the equator to `phi`.
fn meridional_distance(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    let e2 = ellipsoid.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    ellipsoid.a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}
