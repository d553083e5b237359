//! Parsers for the text files that make up a HEC-RAS model.
//!
//! Parsers take the object key (for error context) and the raw file content
//! and return typed records; fetching content is left to the caller.

pub mod classify;
pub mod flow;
pub mod geom;
pub mod plan;
pub mod project;
pub mod text;

pub use classify::{classify, classify_key, FileRole};
pub use flow::{
    parse_flow_header, parse_forcing, BoundaryCondition, FlowData, FlowFileContents, ForcingData,
    Hydrograph, SteadyData, UnsteadyData,
};
pub use geom::{
    build_features, build_features_from_wkt, parse_geometry, Bridge, BridgeData, ChordPair,
    Features, GeomFileContents, HydraulicStructure, VectorLayer,
};
pub use plan::{parse_plan, PlanFileContents};
pub use project::{first_line, is_project_header, parse_project, ProjectFileContents};
