//! Reference ellipsoids and the auxiliary functions shared by the conic and
//! cylindrical projections (Snyder, "Map Projections: A Working Manual").

use std::f64::consts::FRAC_PI_2;

/// Reference ellipsoid defined by its semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Flattening (0 for a sphere)
    pub f: f64,
}

impl Ellipsoid {
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    pub const GRS80: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };

    pub const CLARKE_1866: Self = Self {
        a: 6_378_206.4,
        f: 1.0 / 294.978_698_2,
    };

    /// Sphere used by Web Mercator.
    pub const WEB_MERCATOR_SPHERE: Self = Self {
        a: 6_378_137.0,
        f: 0.0,
    };

    /// Build from a WKT `SPHEROID[name, a, inverse_flattening]` pair.
    /// An inverse flattening of zero denotes a sphere.
    pub fn from_inverse_flattening(a: f64, inverse_flattening: f64) -> Self {
        let f = if inverse_flattening == 0.0 {
            0.0
        } else {
            1.0 / inverse_flattening
        };
        Self { a, f }
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    pub fn is_valid(&self) -> bool {
        self.a.is_finite() && self.a > 0.0 && (0.0..1.0).contains(&self.f)
    }

    /// Snyder's m: cos(phi) / sqrt(1 - e^2 sin^2(phi)).
    pub(crate) fn m(&self, phi: f64) -> f64 {
        let s = phi.sin();
        phi.cos() / (1.0 - self.e2() * s * s).sqrt()
    }

    /// Snyder's t (isometric latitude helper used by LCC and Mercator).
    pub(crate) fn t(&self, phi: f64) -> f64 {
        let e = self.e();
        let es = e * phi.sin();
        (std::f64::consts::FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
    }

    /// Invert `t` for latitude by fixed-point iteration.
    pub(crate) fn phi_from_t(&self, t: f64) -> f64 {
        let e = self.e();
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..15 {
            let es = e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).atan();
            if (next - phi).abs() < 1e-12 {
                return next;
            }
            phi = next;
        }
        phi
    }

    /// Snyder's q (authalic latitude helper used by Albers).
    pub(crate) fn q(&self, phi: f64) -> f64 {
        let e2 = self.e2();
        let s = phi.sin();
        if e2 == 0.0 {
            return 2.0 * s;
        }
        let e = e2.sqrt();
        (1.0 - e2)
            * (s / (1.0 - e2 * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
    }
}
