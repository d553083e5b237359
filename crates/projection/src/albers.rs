//! Albers Equal-Area Conic projection (ellipsoidal, Snyder section 14).
//!
//! Mostly seen as CONUS Albers (EPSG:5070) on statewide and national models.

use std::f64::consts::PI;

use crate::ellipsoid::Ellipsoid;

#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    pub latin1: f64,
    pub latin2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
    n: f64,
    c: f64,
    rho0: f64,
}

impl AlbersEqualArea {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();

        let m1 = ellipsoid.m(latin1);
        let q1 = ellipsoid.q(latin1);

        let n = if (latin1 - latin2).abs() < 1e-10 {
            latin1.sin()
        } else {
            let m2 = ellipsoid.m(latin2);
            let q2 = ellipsoid.q(latin2);
            (m1 * m1 - m2 * m2) / (q2 - q1)
        };

        let c = m1 * m1 + n * q1;
        let rho0 = ellipsoid.a * (c - n * ellipsoid.q(lat0)).sqrt() / n;

        Self {
            lon0: lon0_deg.to_radians(),
            lat0,
            latin1,
            latin2,
            false_easting,
            false_northing,
            ellipsoid,
            n,
            c,
            rho0,
        }
    }

    pub fn cone_constant(&self) -> f64 {
        self.n
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

        let rho = self.ellipsoid.a * (self.c - self.n * self.ellipsoid.q(lat)).sqrt() / self.n;
        let theta = self.n * dlon;

        let x = self.false_easting + rho * theta.sin();
        let y = self.false_northing + self.rho0 - rho * theta.cos();
        (x, y)
    }

    /// Convert projected meters to geographic coordinates (radians).
    ///
    /// Returns (lon, lat).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let dx = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);
        let sign = self.n.signum();

        let rho = (dx * dx + dy * dy).sqrt();
        let theta = (sign * dx).atan2(sign * dy);
        let q = (self.c - rho * rho * self.n * self.n / (a * a)) / self.n;

        (self.lon0 + theta / self.n, self.latitude_from_q(q))
    }

    /// Invert the authalic helper `q` by Newton iteration (Snyder eq. 3-16).
    fn latitude_from_q(&self, q: f64) -> f64 {
        let e2 = self.ellipsoid.e2();
        let mut phi = (q / 2.0).clamp(-1.0, 1.0).asin();
        if e2 == 0.0 {
            return phi;
        }
        let e = e2.sqrt();
        for _ in 0..15 {
            let s = phi.sin();
            let one_minus = 1.0 - e2 * s * s;
            let delta = one_minus * one_minus / (2.0 * phi.cos())
                * (q / (1.0 - e2) - s / one_minus
                    + (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln());
            phi += delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }
        phi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conus_albers() -> AlbersEqualArea {
        AlbersEqualArea::new(23.0, -96.0, 29.5, 45.5, 0.0, 0.0, Ellipsoid::GRS80)
    }

    #[test]
    fn test_origin() {
        let proj = conus_albers();
        let (x, y) = proj.forward((-96.0_f64).to_radians(), 23.0_f64.to_radians());
        assert!(x.abs() < 1e-6, "x {}", x);
        assert!(y.abs() < 1e-6, "y {}", y);
    }

    #[test]
    fn test_east_of_meridian_is_positive() {
        let proj = conus_albers();
        let (x, y) = proj.forward((-86.0_f64).to_radians(), 40.0_f64.to_radians());
        assert!(x > 0.0);
        assert!(y > 0.0);
    }

    #[test]
    fn test_roundtrip() {
        let proj = conus_albers();
        let lon = (-85.4_f64).to_radians();
        let lat = 40.2_f64.to_radians();

        let (x, y) = proj.forward(lon, lat);
        let (lon2, lat2) = proj.inverse(x, y);
        assert!((lon - lon2).abs() < 1e-10);
        assert!((lat - lat2).abs() < 1e-10);
    }
}
