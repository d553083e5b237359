//! HEC-RAS model assembly.
//!
//! A model is identified by its project (`.prj`) file. Assembly discovers
//! the files next to it, parses every geometry, plan, flow and projection
//! file concurrently and aggregates the results into a [`RasModel`], which
//! then answers index, geospatial and forcing-data queries.

mod discovery;
mod forcing;
mod geospatial;
mod index;
mod model;
mod workers;

pub use discovery::{is_a_model, model_files};
pub use geospatial::{check_unit_consistency, ExtractionConfig, GeoData, DEFAULT_DESTINATION_EPSG};
pub use index::{
    FileGroup, FileProperties, GeometryFiles, InputFiles, ModelFiles, ModelSummary, OutputFiles,
    SupplementalFiles,
};
pub use model::{version_string, ProjectMetadata, RasModel, ResolvedProjection, MODEL_TYPE};
