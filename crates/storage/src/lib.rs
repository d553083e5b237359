//! Storage access for mcat-ras.
//!
//! Model files are read from object storage (MinIO/S3), a local directory
//! or an in-memory store through the [`ModelStore`] trait.

pub mod model_store;
pub mod object_store;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig, S3Config};
pub use model_store::{ListEntry, ModelStore};
