//! Vector geometry for extracted HEC-RAS features.
//!
//! Shapes are built from survey coordinates, reprojected by the caller and
//! serialized to WKB in their multi variant.

pub mod geometry;
pub mod interpolate;
pub mod wkb;

pub use geometry::{require_vertices, Geometry, Shape};
pub use interpolate::{attribute_elevation, distance, interpolate_along, point_at_distance};
