//! Model assembly: discovery, concurrent per-file parsing and aggregation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use projection::SpatialReference;
use ras_common::{file_extension, normalize_key, parent_prefix, RasError, RasResult};
use ras_parser::{
    classify_key, first_line, is_project_header, parse_flow_header, parse_geometry, parse_plan,
    parse_project, FileRole, FlowFileContents, GeomFileContents, PlanFileContents,
    ProjectFileContents,
};
use storage::ModelStore;

use crate::discovery::model_files;
use crate::workers::{first_error, run_per_file};

/// Type reported for every model this crate assembles.
pub const MODEL_TYPE: &str = "RAS";

const PROJECT_EXTENSION: &str = ".prj";

/// The projection file that resolved to a usable spatial reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProjection {
    pub path: String,
    pub wkt: String,
}

/// Parsed records of every file of a model, in file-key order per role.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectMetadata {
    pub project: ProjectFileContents,
    pub geom_files: Vec<GeomFileContents>,
    pub plan_files: Vec<PlanFileContents>,
    pub flow_files: Vec<FlowFileContents>,
    pub projection: Option<ResolvedProjection>,
}

/// A HEC-RAS model assembled from its project file.
///
/// Built once by [`RasModel::assemble`] and read-only afterwards.
pub struct RasModel {
    pub(crate) store: Arc<dyn ModelStore>,
    definition_file: String,
    directory: String,
    files: Vec<String>,
    version: String,
    is_model: bool,
    pub(crate) metadata: ProjectMetadata,
}

impl std::fmt::Debug for RasModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasModel")
            .field("definition_file", &self.definition_file)
            .field("files", &self.files)
            .field("version", &self.version)
            .field("is_model", &self.is_model)
            .finish()
    }
}

impl RasModel {
    /// Assemble the model defined by the project file at `key`.
    ///
    /// Every geometry, plan, flow and projection file is fetched and parsed
    /// on its own task. All tasks finish before any result is inspected; if
    /// any of them failed the first error is returned and no model is built.
    /// Plan files are the exception: a plan that cannot be fetched is kept
    /// as a record carrying the failure note.
    #[instrument(skip(store), fields(path = %key))]
    pub async fn assemble(store: Arc<dyn ModelStore>, key: &str) -> RasResult<Self> {
        let key = normalize_key(key);
        let key = key.as_str();
        if file_extension(key) != PROJECT_EXTENSION {
            return Err(RasError::NotAModel(key.to_string()));
        }
        let content = store.fetch(key).await?;
        if !is_project_header(&first_line(&content)) {
            return Err(RasError::NotAModel(key.to_string()));
        }
        let project = parse_project(key, &content);

        let files = model_files(store.as_ref(), key).await?;
        let keys_for = |wanted: fn(FileRole) -> bool| -> Vec<String> {
            files
                .iter()
                .filter(|k| wanted(classify_key(k)))
                .cloned()
                .collect()
        };
        let geom_keys = keys_for(|role| role == FileRole::Geometry);
        let plan_keys = keys_for(|role| role == FileRole::Plan);
        let flow_keys = keys_for(|role| role.is_flow());
        let projection_keys = keys_for(|role| role == FileRole::Projection);

        debug!(
            geometry = geom_keys.len(),
            plan = plan_keys.len(),
            flow = flow_keys.len(),
            projection = projection_keys.len(),
            "Parsing model files"
        );

        let (geoms, plans, flows, projections) = tokio::join!(
            run_per_file(&store, &geom_keys, |key, fetched| {
                parse_geometry(key, &fetched?)
            }),
            run_per_file(&store, &plan_keys, |key, fetched| {
                Ok(match fetched {
                    Ok(content) => parse_plan(key, &content),
                    Err(e) => PlanFileContents::failed(key, &e.to_string()),
                })
            }),
            run_per_file(&store, &flow_keys, |key, fetched| {
                Ok(parse_flow_header(key, &fetched?))
            }),
            run_per_file(&store, &projection_keys, |key, fetched| {
                Ok(resolve_projection(key, &fetched?))
            }),
        );

        let (geom_files, geom_err) = first_error("geometry", &geom_keys, geoms);
        let (plan_files, plan_err) = first_error("plan", &plan_keys, plans);
        let (flow_files, flow_err) = first_error("flow", &flow_keys, flows);
        let (projections, projection_err) = first_error("projection", &projection_keys, projections);
        if let Some(e) = geom_err.or(plan_err).or(flow_err).or(projection_err) {
            return Err(e);
        }

        let mut resolved: Vec<ResolvedProjection> = projections.into_iter().flatten().collect();
        if resolved.len() > 1 {
            return Err(RasError::MultipleProjections(
                resolved.into_iter().map(|p| p.path).collect(),
            ));
        }
        let projection = resolved.pop();

        let version = version_string(
            plan_files
                .iter()
                .map(|p| (p.file_ext.as_str(), p.program_version.as_str()))
                .chain(
                    geom_files
                        .iter()
                        .map(|g| (g.file_ext.as_str(), g.program_version.as_str())),
                )
                .chain(
                    flow_files
                        .iter()
                        .map(|f| (f.file_ext.as_str(), f.program_version.as_str())),
                ),
        );
        let is_model = !geom_files.is_empty();

        info!(
            geometry = geom_files.len(),
            plan = plan_files.len(),
            flow = flow_files.len(),
            georeferenced = projection.is_some(),
            is_model,
            "Model assembled"
        );

        Ok(Self {
            store,
            definition_file: key.to_string(),
            directory: parent_prefix(key).to_string(),
            files,
            version,
            is_model,
            metadata: ProjectMetadata {
                project,
                geom_files,
                plan_files,
                flow_files,
                projection,
            },
        })
    }

    pub fn definition_file(&self) -> &str {
        &self.definition_file
    }

    /// Directory prefix of the definition file, with trailing slash.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Every discovered file key, sorted.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn model_type(&self) -> &'static str {
        MODEL_TYPE
    }

    /// Program versions of the plan, geometry and flow files, e.g.
    /// `.p01: 5.07, .g01: 5.07, .f01: 5.07`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// A model needs at least one geometry file.
    pub fn is_model(&self) -> bool {
        self.is_model
    }

    /// Whether every geometry file was written by HEC-RAS 4.0 or later, the
    /// first version that stores georeferenced coordinates.
    pub fn is_geospatial(&self) -> bool {
        !self.metadata.geom_files.is_empty()
            && self.metadata.geom_files.iter().all(|g| {
                g.program_version
                    .trim()
                    .parse::<f64>()
                    .map(|v| v >= 4.0)
                    .unwrap_or(false)
            })
    }
}

/// Join `"<ext>: <version>"` entries with `", "`, skipping empty versions.
pub fn version_string<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .filter(|(_, version)| !version.is_empty())
        .map(|(ext, version)| format!("{}: {}", ext, version))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Projection files that do not hold a valid WKT definition are ignored.
fn resolve_projection(key: &str, content: &[u8]) -> Option<ResolvedProjection> {
    let text = String::from_utf8_lossy(content);
    let wkt = text.trim();
    match SpatialReference::from_wkt(wkt).and_then(|srs| srs.validate()) {
        Ok(()) => Some(ResolvedProjection {
            path: key.to_string(),
            wkt: wkt.to_string(),
        }),
        Err(e) => {
            debug!(path = %key, error = %e, "Not a usable projection file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        assert_eq!(
            version_string([(".g01", "5.0"), (".p01", "6.3")]),
            ".g01: 5.0, .p01: 6.3"
        );
        assert_eq!(version_string([(".g01", "5.0"), (".f01", "")]), ".g01: 5.0");
        assert_eq!(version_string(std::iter::empty()), "");
    }

    #[test]
    fn test_resolve_projection() {
        let wkt = test_utils::crs::UTM_16N_M;
        let resolved = resolve_projection("m/Projection.prj", format!("{}\r\n", wkt).as_bytes());
        assert_eq!(resolved.map(|p| p.wkt), Some(wkt.to_string()));

        assert!(resolve_projection("m/Other.prj", b"Proj Title=Other").is_none());
    }
}
