//! Piecewise-linear interpolation along polylines.
//!
//! Cross-section surveys give elevations at stations (distance along the
//! section); these functions place each station on the section's 2-D cut
//! line.

/// Euclidean distance between two points.
pub fn distance(p0: [f64; 2], p1: [f64; 2]) -> f64 {
    ((p1[0] - p0[0]).powi(2) + (p1[1] - p0[1]).powi(2)).sqrt()
}

/// Point `delta` along the straight line from `p0` toward `p1`.
///
/// A zero-length segment yields `p0`.
pub fn point_at_distance(p0: [f64; 2], p1: [f64; 2], delta: f64) -> [f64; 2] {
    let length = distance(p0, p1);
    if length == 0.0 {
        return p0;
    }
    let ratio = delta / length;
    [
        (1.0 - ratio) * p0[0] + ratio * p1[0],
        (1.0 - ratio) * p0[1] + ratio * p1[1],
    ]
}

/// Point at arc length `d` along a polyline.
///
/// - `d <= 0` yields the first vertex.
/// - `d` equal to the total length yields the last vertex.
/// - `d` beyond the total length, or a polyline with fewer than two
///   vertices and `d > 0`, yields `None`.
pub fn interpolate_along(points: &[[f64; 2]], d: f64) -> Option<[f64; 2]> {
    let first = *points.first()?;
    if d <= 0.0 {
        return Some(first);
    }

    let mut cumulative = 0.0;
    for segment in points.windows(2) {
        let (p0, p1) = (segment[0], segment[1]);
        let length = distance(p0, p1);
        if cumulative + length >= d {
            return Some(point_at_distance(p0, p1, d - cumulative));
        }
        cumulative += length;
    }

    None
}

/// Attach elevations to a cut line.
///
/// Each `(station, elevation)` pair is placed at `station - first_station`
/// along `xy`. Stations that fall beyond the end of the line are dropped.
pub fn attribute_elevation(xy: &[[f64; 2]], station_elevation: &[[f64; 2]]) -> Vec<[f64; 3]> {
    let Some(start) = station_elevation.first().map(|p| p[0]) else {
        return Vec::new();
    };

    station_elevation
        .iter()
        .filter_map(|&[station, elevation]| {
            interpolate_along(xy, station - start).map(|[x, y]| [x, y, elevation])
        })
        .collect()
}
