//! Flow files: steady (`.f##`), unsteady (`.u##`) and quasi-steady (`.q##`).

pub mod steady;
pub mod unsteady;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ras_common::{RasError, RasResult};

use crate::classify::{classify_key, FileRole};
use crate::text::right_of_equals;

pub use steady::{parse_steady, FlowChange, SteadyBoundary, SteadyData};
pub use unsteady::{parse_unsteady, BoundaryLocation, UnsteadyBoundary, UnsteadyData};

/// Placeholder recorded for flow files whose content is not extracted.
pub const NOT_IMPLEMENTED: &str = "Not Implemented";

/// Header of a flow file of any kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowFileContents {
    pub path: String,
    pub file_ext: String,
    pub flow_title: String,
    pub program_version: String,
}

pub fn parse_flow_header(path: &str, content: &[u8]) -> FlowFileContents {
    let mut header = FlowFileContents {
        path: path.to_string(),
        file_ext: ras_common::file_extension(path).to_string(),
        ..Default::default()
    };
    for line in String::from_utf8_lossy(content).lines() {
        if line.starts_with("Flow Title=") {
            header.flow_title = right_of_equals(line).to_string();
        } else if line.starts_with("Program Version=") {
            header.program_version = right_of_equals(line).to_string();
        }
        if !header.flow_title.is_empty() && !header.program_version.is_empty() {
            break;
        }
    }
    header
}

/// Time series attached to a boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hydrograph {
    /// Sampling interval as written, e.g. `1HOUR`
    pub interval: Option<String>,
    pub values: Vec<f64>,
}

/// A boundary condition on a reach end, river station, storage area or
/// 2D flow area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BoundaryCondition {
    #[serde(rename = "Known Water Surface")]
    KnownWaterSurface { elevation: f64 },
    #[serde(rename = "Critical Depth")]
    CriticalDepth,
    #[serde(rename = "Normal Depth")]
    NormalDepth { slope: f64 },
    /// (stage, flow) pairs
    #[serde(rename = "Rating Curve")]
    RatingCurve(Vec<[f64; 2]>),
    #[serde(rename = "Flow Hydrograph")]
    FlowHydrograph(Hydrograph),
    #[serde(rename = "Stage Hydrograph")]
    StageHydrograph(Hydrograph),
    #[serde(rename = "Lateral Inflow Hydrograph")]
    LateralInflow(Hydrograph),
    #[serde(rename = "Uniform Lateral Inflow Hydrograph")]
    UniformLateralInflow(Hydrograph),
    #[serde(rename = "Precipitation Hydrograph")]
    Precipitation(Hydrograph),
}

/// Parsed content of one flow file.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowData {
    Steady(SteadyData),
    Unsteady(UnsteadyData),
    QuasiUnsteady,
}

/// Boundary conditions of every flow file of a model, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForcingData {
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub steady: BTreeMap<String, SteadyData>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub unsteady: BTreeMap<String, UnsteadyData>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub quasi_unsteady: BTreeMap<String, String>,
}

impl ForcingData {
    pub fn insert(&mut self, file_name: String, data: FlowData) {
        match data {
            FlowData::Steady(steady) => {
                self.steady.insert(file_name, steady);
            }
            FlowData::Unsteady(unsteady) => {
                self.unsteady.insert(file_name, unsteady);
            }
            FlowData::QuasiUnsteady => {
                self.quasi_unsteady.insert(file_name, NOT_IMPLEMENTED.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.steady.len() + self.unsteady.len() + self.quasi_unsteady.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a flow file according to its extension.
pub fn parse_forcing(path: &str, content: &[u8]) -> RasResult<FlowData> {
    match classify_key(path) {
        FileRole::SteadyFlow => parse_steady(path, content).map(FlowData::Steady),
        FileRole::UnsteadyFlow => parse_unsteady(path, content).map(FlowData::Unsteady),
        FileRole::QuasiSteadyFlow => Ok(FlowData::QuasiUnsteady),
        role => Err(RasError::InternalError(format!(
            "{} is a {} file, not a flow file",
            path,
            role.as_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_header() {
        let header = parse_flow_header(
            "m/a.u01",
            b"Flow Title=1996 Event\r\nProgram Version=6.30\r\nUse Restart= 0\r\n",
        );
        assert_eq!(header.file_ext, ".u01");
        assert_eq!(header.flow_title, "1996 Event");
        assert_eq!(header.program_version, "6.30");
    }

    #[test]
    fn test_quasi_steady_is_recorded() {
        let mut forcing = ForcingData::default();
        let data = parse_forcing("m/a.q01", b"Flow Title=Q").unwrap();
        forcing.insert("a.q01".to_string(), data);
        assert_eq!(forcing.quasi_unsteady["a.q01"], NOT_IMPLEMENTED);

        let json = serde_json::to_value(&forcing).unwrap();
        assert!(json.get("steady").is_none());
        assert_eq!(json["quasi_unsteady"]["a.q01"], "Not Implemented");
    }

    #[test]
    fn test_non_flow_file_rejected() {
        assert!(parse_forcing("m/a.g01", b"").is_err());
    }

    #[test]
    fn test_boundary_condition_json() {
        let bc = BoundaryCondition::NormalDepth { slope: 0.001 };
        let json = serde_json::to_value(&bc).unwrap();
        assert_eq!(json["type"], "Normal Depth");
        assert_eq!(json["data"]["slope"], 0.001);

        let json = serde_json::to_value(BoundaryCondition::CriticalDepth).unwrap();
        assert_eq!(json["type"], "Critical Depth");
    }
}
