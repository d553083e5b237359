//! Public summary of an assembled model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ras_common::{RasError, RasResult};
use ras_parser::{classify_key, FileRole};

use crate::RasModel;

/// Summary of a model as published to catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    #[serde(rename = "type")]
    pub model_type: String,
    pub version: String,
    pub definition_file: String,
    pub files: ModelFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFiles {
    pub input_files: InputFiles,
    pub output_files: OutputFiles,
    pub supplemental_files: SupplementalFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFiles {
    /// Plan files
    pub control_files: FileGroup,
    /// Flow files of every kind
    pub forcing_files: FileGroup,
    pub geometry_files: GeometryFiles,
    pub simulation_variables: Option<Value>,
    pub local_variables: Option<Value>,
}

/// Paths of one category of files with per-file properties keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileGroup {
    pub paths: Vec<String>,
    pub data: BTreeMap<String, FileProperties>,
}

impl FileGroup {
    fn push(&mut self, path: &str, title: &str, program_version: &str) {
        self.paths.push(path.to_string());
        self.data.insert(
            path.to_string(),
            FileProperties {
                title: title.to_string(),
                program_version: program_version.to_string(),
            },
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileProperties {
    pub title: String,
    pub program_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryFiles {
    pub paths: Vec<String>,
    pub features_properties: BTreeMap<String, FileProperties>,
    /// Key of the projection file the geometry is referenced to
    pub georeference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputFiles {
    /// `.O##` output files
    pub paths: Vec<String>,
    pub model_prediction: Option<Value>,
    /// `.r##` and `.x##` run files
    pub run_files: Vec<String>,
    pub run_logs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplementalFiles {
    pub paths: Vec<String>,
    pub visualizations: Option<Value>,
    pub observational_data: Option<Value>,
}

impl RasModel {
    /// Summarize the model's files. Fails for a model without geometry.
    pub fn index(&self) -> RasResult<ModelSummary> {
        if !self.is_model() {
            return Err(RasError::NotAModel(self.definition_file().to_string()));
        }

        let metadata = self.metadata();
        let mut input = InputFiles::default();
        for plan in &metadata.plan_files {
            input
                .control_files
                .push(&plan.path, &plan.plan_title, &plan.program_version);
        }
        for flow in &metadata.flow_files {
            input
                .forcing_files
                .push(&flow.path, &flow.flow_title, &flow.program_version);
        }
        for geom in &metadata.geom_files {
            let geometry = &mut input.geometry_files;
            geometry.paths.push(geom.path.clone());
            geometry.features_properties.insert(
                geom.path.clone(),
                FileProperties {
                    title: geom.title.clone(),
                    program_version: geom.program_version.clone(),
                },
            );
        }
        input.geometry_files.georeference = metadata.projection.as_ref().map(|p| p.path.clone());

        let mut output = OutputFiles::default();
        for key in self.files() {
            match classify_key(key) {
                FileRole::Output => output.paths.push(key.clone()),
                role if role.is_run() => output.run_files.push(key.clone()),
                _ => {}
            }
        }

        Ok(ModelSummary {
            model_type: self.model_type().to_string(),
            version: self.version().to_string(),
            definition_file: self.definition_file().to_string(),
            files: ModelFiles {
                input_files: input,
                output_files: output,
                supplemental_files: SupplementalFiles::default(),
            },
        })
    }
}
