//! Common types and utilities shared across all mcat-ras crates.

pub mod error;
pub mod keys;
pub mod units;

pub use error::{ErrorCategory, RasError, RasResult};
pub use keys::{file_extension, file_name, file_stem_key, normalize_key, parent_prefix};
pub use units::UnitSystem;
