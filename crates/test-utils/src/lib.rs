//! Shared test utilities for the mcat-ras workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Fixed-width block writers matching HEC-RAS text layouts
//! - Generators for project, plan, geometry and flow files
//! - Reference spatial references and a complete sample model
//! - Helpers that load a model into an object store or a temp directory
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, GeometryBuilder};
//! ```

pub mod fixtures;
pub mod generators;
pub mod store;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use store::*;

/// Assert two numbers are within `tolerance` of each other.
///
/// ```
/// test_utils::assert_approx_eq!(28.50001, 28.5, 1e-4);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance) = ($actual as f64, $expected as f64, $tolerance as f64);
        if (actual - expected).abs() > tolerance {
            panic!(
                "{} = {} is not within {} of {}",
                stringify!($actual),
                actual,
                tolerance,
                expected
            );
        }
    }};
}

/// Assert an `[x, y]` coordinate is within `tolerance` of another on both axes.
///
/// ```
/// test_utils::assert_coords_approx_eq!([-96.00001, 28.5], [-96.0, 28.5], 1e-4);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected): ([f64; 2], [f64; 2]) = ($actual, $expected);
        $crate::assert_approx_eq!(actual[0], expected[0], $tolerance);
        $crate::assert_approx_eq!(actual[1], expected[1], $tolerance);
    }};
}
