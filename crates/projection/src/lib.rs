//! Spatial reference parsing and coordinate transformations.
//!
//! Implements the map projections HEC-RAS models are georeferenced in from
//! scratch, without GDAL or PROJ. Source references arrive as WKT (often the
//! ESRI dialect), destinations as EPSG codes.

pub mod albers;
pub mod ellipsoid;
pub mod epsg;
pub mod lambert;
pub mod mercator;
pub mod srs;
pub mod transform;
pub mod transverse_mercator;
pub mod wkt;

pub use albers::AlbersEqualArea;
pub use ellipsoid::Ellipsoid;
pub use epsg::from_epsg;
pub use lambert::LambertConformal;
pub use mercator::Mercator;
pub use srs::{AxisOrder, CrsKind, LinearUnit, ProjectionMethod, ProjectionParams, SpatialReference};
pub use transform::CoordinateTransform;
pub use transverse_mercator::TransverseMercator;
