//! Geometry shapes built from HEC-RAS survey data.

use ras_common::{RasError, RasResult};

/// A shape as built by the feature builder, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Bank station
    Point([f64; 2]),
    /// River centerline
    LineString(Vec<[f64; 2]>),
    /// Cross-section with elevations
    LineString3D(Vec<[f64; 3]>),
    LinearRing(Vec<[f64; 2]>),
    /// Storage area outline (exterior ring first)
    Polygon(Vec<Vec<[f64; 2]>>),
}

/// Serializable geometry, including the multi variants written as output.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
    LineStringZ(Vec<[f64; 3]>),
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPoint(Vec<[f64; 2]>),
    MultiLineString(Vec<Vec<[f64; 2]>>),
    MultiLineStringZ(Vec<Vec<[f64; 3]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

impl Shape {
    /// Closed ring from an open or closed vertex list.
    pub fn ring(mut points: Vec<[f64; 2]>) -> Self {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if first != last {
                points.push(first);
            }
        }
        Shape::LinearRing(points)
    }

    /// Polygon with a single exterior ring.
    pub fn polygon(points: Vec<[f64; 2]>) -> Self {
        match Shape::ring(points) {
            Shape::LinearRing(ring) => Shape::Polygon(vec![ring]),
            other => other,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Point(_) => false,
            Shape::LineString(p) | Shape::LinearRing(p) => p.is_empty(),
            Shape::LineString3D(p) => p.is_empty(),
            Shape::Polygon(rings) => rings.iter().all(|r| r.is_empty()),
        }
    }

    /// Apply a fallible function to every XY coordinate; Z is carried through.
    pub fn try_map_xy<F>(self, mut f: F) -> RasResult<Shape>
    where
        F: FnMut(f64, f64) -> RasResult<(f64, f64)>,
    {
        let mut xy = |p: [f64; 2]| f(p[0], p[1]).map(|(x, y)| [x, y]);
        Ok(match self {
            Shape::Point(p) => Shape::Point(xy(p)?),
            Shape::LineString(pts) => {
                Shape::LineString(pts.into_iter().map(&mut xy).collect::<RasResult<_>>()?)
            }
            Shape::LinearRing(pts) => {
                Shape::LinearRing(pts.into_iter().map(&mut xy).collect::<RasResult<_>>()?)
            }
            Shape::LineString3D(pts) => Shape::LineString3D(
                pts.into_iter()
                    .map(|[x, y, z]| xy([x, y]).map(|[x, y]| [x, y, z]))
                    .collect::<RasResult<_>>()?,
            ),
            Shape::Polygon(rings) => Shape::Polygon(
                rings
                    .into_iter()
                    .map(|ring| ring.into_iter().map(&mut xy).collect::<RasResult<Vec<_>>>())
                    .collect::<RasResult<_>>()?,
            ),
        })
    }

    /// Swap X and Y of every coordinate.
    pub fn swap_axes(self) -> Shape {
        fn swap(p: [f64; 2]) -> [f64; 2] {
            [p[1], p[0]]
        }
        match self {
            Shape::Point(p) => Shape::Point(swap(p)),
            Shape::LineString(pts) => Shape::LineString(pts.into_iter().map(swap).collect()),
            Shape::LinearRing(pts) => Shape::LinearRing(pts.into_iter().map(swap).collect()),
            Shape::LineString3D(pts) => {
                Shape::LineString3D(pts.into_iter().map(|[x, y, z]| [y, x, z]).collect())
            }
            Shape::Polygon(rings) => Shape::Polygon(
                rings
                    .into_iter()
                    .map(|r| r.into_iter().map(swap).collect())
                    .collect(),
            ),
        }
    }

    /// Coerce to the multi variant. A bare ring becomes a multi-linestring.
    pub fn to_multi(self) -> Geometry {
        match self {
            Shape::Point(p) => Geometry::MultiPoint(vec![p]),
            Shape::LineString(pts) | Shape::LinearRing(pts) => Geometry::MultiLineString(vec![pts]),
            Shape::LineString3D(pts) => Geometry::MultiLineStringZ(vec![pts]),
            Shape::Polygon(rings) => Geometry::MultiPolygon(vec![rings]),
        }
    }

    /// Multi variant encoded as WKB.
    pub fn to_wkb(self) -> Vec<u8> {
        crate::wkb::encode(&self.to_multi())
    }
}

impl Geometry {
    /// All XY coordinates in order, ignoring Z.
    pub fn xy_coordinates(&self) -> Vec<[f64; 2]> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(pts) | Geometry::MultiPoint(pts) => pts.clone(),
            Geometry::LineStringZ(pts) => pts.iter().map(|p| [p[0], p[1]]).collect(),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter().flatten().copied().collect()
            }
            Geometry::MultiLineStringZ(lines) => lines
                .iter()
                .flatten()
                .map(|p| [p[0], p[1]])
                .collect(),
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().copied().collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::LineStringZ(_) => "LineString Z",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiLineStringZ(_) => "MultiLineString Z",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

/// Check that a line has enough vertices to be drawn.
pub fn require_vertices<T>(points: &[T], minimum: usize, what: &str) -> RasResult<()> {
    if points.len() < minimum {
        return Err(RasError::GeometryError(format!(
            "{} has {} vertices, at least {} required",
            what,
            points.len(),
            minimum
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_is_closed() {
        match Shape::ring(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]) {
            Shape::LinearRing(pts) => {
                assert_eq!(pts.len(), 4);
                assert_eq!(pts[0], pts[3]);
            }
            other => panic!("unexpected {:?}", other),
        }

        match Shape::ring(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]) {
            Shape::LinearRing(pts) => assert_eq!(pts.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_swap_axes_keeps_z() {
        let shape = Shape::LineString3D(vec![[1.0, 2.0, 3.0]]).swap_axes();
        assert_eq!(shape, Shape::LineString3D(vec![[2.0, 1.0, 3.0]]));
    }

    #[test]
    fn test_try_map_xy_propagates_errors() {
        let shape = Shape::LineString(vec![[1.0, 1.0], [2.0, 2.0]]);
        let result = shape.try_map_xy(|x, _| {
            if x > 1.5 {
                Err(RasError::ProjectionError("out of range".into()))
            } else {
                Ok((x, x))
            }
        });
        assert!(result.is_err());

        let moved = Shape::Point([1.0, 2.0]).try_map_xy(|x, y| Ok((x + 1.0, y + 1.0))).unwrap();
        assert_eq!(moved, Shape::Point([2.0, 3.0]));
    }

    #[test]
    fn test_to_multi() {
        assert_eq!(
            Shape::Point([1.0, 2.0]).to_multi(),
            Geometry::MultiPoint(vec![[1.0, 2.0]])
        );
        let poly = Shape::polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]).to_multi();
        assert_eq!(poly.type_name(), "MultiPolygon");
        assert_eq!(poly.xy_coordinates().len(), 4);
    }

    #[test]
    fn test_require_vertices() {
        assert!(require_vertices(&[[0.0, 0.0]], 2, "river").is_err());
        assert!(require_vertices(&[[0.0, 0.0], [1.0, 1.0]], 2, "river").is_ok());
    }
}
