//! Unsteady flow files.
//!
//! Each `Boundary Location=` line names where a condition applies; the lines
//! that follow, up to the next location, describe the condition itself.

use serde::{Deserialize, Serialize};
use tracing::debug;

use ras_common::RasResult;

use super::{BoundaryCondition, Hydrograph};
use crate::text::{csv_after_equals, right_of_equals, LineCursor};

const ROW_WIDTH: usize = 80;
const VALUE_WIDTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnsteadyData {
    pub flow_title: String,
    pub program_version: String,
    pub boundary_conditions: Vec<UnsteadyBoundary>,
}

/// Where a boundary condition applies. Unused parts are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryLocation {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub river: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub reach: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub river_station: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub storage_area: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub two_d_area: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub bc_line: String,
}

impl BoundaryLocation {
    fn from_line(line: &str) -> Self {
        let fields = csv_after_equals(line);
        let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();
        Self {
            river: field(0),
            reach: field(1),
            river_station: field(2),
            storage_area: field(4),
            two_d_area: field(5),
            bc_line: field(6),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnsteadyBoundary {
    pub location: BoundaryLocation,
    pub condition: Option<BoundaryCondition>,
}

/// Hydrograph count markers and the condition each builds.
const HYDROGRAPHS: &[(&str, fn(Hydrograph) -> BoundaryCondition)] = &[
    ("Flow Hydrograph=", BoundaryCondition::FlowHydrograph),
    ("Stage Hydrograph=", BoundaryCondition::StageHydrograph),
    ("Lateral Inflow Hydrograph=", BoundaryCondition::LateralInflow),
    (
        "Uniform Lateral Inflow Hydrograph=",
        BoundaryCondition::UniformLateralInflow,
    ),
    ("Precipitation Hydrograph=", BoundaryCondition::Precipitation),
];

pub fn parse_unsteady(path: &str, content: &[u8]) -> RasResult<UnsteadyData> {
    let text = String::from_utf8_lossy(content);
    let mut cursor = LineCursor::new(path, &text);

    let mut data = UnsteadyData::default();
    let mut interval: Option<String> = None;

    while let Some(line) = cursor.next() {
        if line.starts_with("Flow Title=") {
            data.flow_title = right_of_equals(line).to_string();
            continue;
        }
        if line.starts_with("Program Version=") {
            data.program_version = right_of_equals(line).to_string();
            continue;
        }
        if line.starts_with("Boundary Location=") {
            data.boundary_conditions.push(UnsteadyBoundary {
                location: BoundaryLocation::from_line(line),
                condition: None,
            });
            interval = None;
            continue;
        }

        let Some(boundary) = data.boundary_conditions.last_mut() else {
            continue;
        };

        if line.starts_with("Interval=") {
            interval = Some(right_of_equals(line).to_string());
        } else if let Some((marker, build)) =
            HYDROGRAPHS.iter().find(|(marker, _)| line.starts_with(marker))
        {
            let count = cursor.parse_count(right_of_equals(line), marker)?;
            let values = cursor.values_block(count, ROW_WIDTH, VALUE_WIDTH, marker)?;
            boundary.condition = Some(build(Hydrograph {
                interval: interval.clone(),
                values,
            }));
        } else if line.starts_with("Friction Slope=") {
            let slope = csv_after_equals(line).first().copied().unwrap_or_default();
            boundary.condition = Some(BoundaryCondition::NormalDepth {
                slope: cursor.parse_f64(slope, "Friction Slope=")?,
            });
        } else if line.starts_with("Rating Curve=") {
            let count = cursor.parse_count(right_of_equals(line), "Rating Curve=")?;
            let pairs = cursor.pairs_block(count, ROW_WIDTH, VALUE_WIDTH, "Rating Curve=")?;
            boundary.condition = Some(BoundaryCondition::RatingCurve(pairs));
        }
    }

    debug!(
        path = %path,
        boundaries = data.boundary_conditions.len(),
        "Parsed unsteady flow file"
    );

    Ok(data)
}
