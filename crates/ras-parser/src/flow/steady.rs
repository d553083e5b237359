//! Steady flow files.
//!
//! A steady flow file lists one flow per profile at each flow change
//! location and, per reach and profile, the boundary condition at the
//! upstream and downstream ends.

use serde::{Deserialize, Serialize};
use tracing::debug;

use ras_common::RasResult;

use super::BoundaryCondition;
use crate::text::{csv_after_equals, right_of_equals, LineCursor};

const FLOW_ROW_WIDTH: usize = 80;
const FLOW_VALUE_WIDTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteadyData {
    pub flow_title: String,
    pub program_version: String,
    pub num_profiles: usize,
    pub profile_names: Vec<String>,
    pub flow_changes: Vec<FlowChange>,
    pub boundary_conditions: Vec<SteadyBoundary>,
}

/// Flows entering at a river station, one per profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowChange {
    pub river: String,
    pub reach: String,
    pub river_station: String,
    pub flows: Vec<f64>,
}

/// Reach end conditions for one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteadyBoundary {
    pub river: String,
    pub reach: String,
    pub profile: String,
    pub upstream: Option<BoundaryCondition>,
    pub downstream: Option<BoundaryCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Up,
    Down,
}

/// Declared condition codes of the current boundary record.
#[derive(Debug, Default)]
struct DeclaredTypes {
    up: u32,
    down: u32,
}

impl DeclaredTypes {
    fn get(&self, side: Side) -> u32 {
        match side {
            Side::Up => self.up,
            Side::Down => self.down,
        }
    }

    fn set(&mut self, side: Side, code: u32) {
        match side {
            Side::Up => self.up = code,
            Side::Down => self.down = code,
        }
    }
}

const KNOWN_WS: u32 = 1;
const CRITICAL_DEPTH: u32 = 2;
const NORMAL_DEPTH: u32 = 3;
const RATING_CURVE: u32 = 4;

/// Split `Up Slope=0.001` into its side and key.
fn side_key(line: &str) -> Option<(Side, &str)> {
    let (key, _) = line.split_once('=')?;
    if let Some(key) = key.strip_prefix("Up ") {
        Some((Side::Up, key.trim()))
    } else if let Some(key) = key.strip_prefix("Dn ") {
        Some((Side::Down, key.trim()))
    } else {
        None
    }
}

pub fn parse_steady(path: &str, content: &[u8]) -> RasResult<SteadyData> {
    let text = String::from_utf8_lossy(content);
    let mut cursor = LineCursor::new(path, &text);

    let mut data = SteadyData::default();
    let mut declared = DeclaredTypes::default();

    while let Some(line) = cursor.next() {
        if line.starts_with("Flow Title=") {
            data.flow_title = right_of_equals(line).to_string();
        } else if line.starts_with("Program Version=") {
            data.program_version = right_of_equals(line).to_string();
        } else if line.starts_with("Number of Profiles=") {
            data.num_profiles = cursor.parse_count(right_of_equals(line), "Number of Profiles=")?;
        } else if line.starts_with("Profile Names=") {
            data.profile_names = csv_after_equals(line).into_iter().map(String::from).collect();
        } else if line.starts_with("River Rch & RM=") {
            let fields = csv_after_equals(line);
            let flows = cursor.values_block(
                data.num_profiles,
                FLOW_ROW_WIDTH,
                FLOW_VALUE_WIDTH,
                "River Rch & RM=",
            )?;
            data.flow_changes.push(FlowChange {
                river: field(&fields, 0),
                reach: field(&fields, 1),
                river_station: field(&fields, 2),
                flows,
            });
        } else if line.starts_with("Boundary for River Rch & Prof#=") {
            let fields = csv_after_equals(line);
            data.boundary_conditions.push(SteadyBoundary {
                river: field(&fields, 0),
                reach: field(&fields, 1),
                profile: field(&fields, 2),
                ..Default::default()
            });
            declared = DeclaredTypes::default();
        } else if let Some((side, key)) = side_key(line) {
            let Some(boundary) = data.boundary_conditions.last_mut() else {
                continue;
            };
            let value = right_of_equals(line);
            let condition = match key {
                "Type" => {
                    let code = value
                        .parse::<u32>()
                        .map_err(|_| cursor.error(format!("invalid boundary type '{}'", value)))?;
                    declared.set(side, code);
                    (code == CRITICAL_DEPTH).then_some(BoundaryCondition::CriticalDepth)
                }
                "Known WS" if declared.get(side) == KNOWN_WS => {
                    Some(BoundaryCondition::KnownWaterSurface {
                        elevation: cursor.parse_f64(value, "Known WS")?,
                    })
                }
                "Slope" if declared.get(side) == NORMAL_DEPTH => Some(BoundaryCondition::NormalDepth {
                    slope: cursor.parse_f64(value, "Slope")?,
                }),
                "Rating Curve" if declared.get(side) == RATING_CURVE => {
                    let count = cursor.parse_count(value, "Rating Curve")?;
                    let pairs =
                        cursor.pairs_block(count, FLOW_ROW_WIDTH, FLOW_VALUE_WIDTH, "Rating Curve")?;
                    Some(BoundaryCondition::RatingCurve(pairs))
                }
                _ => None,
            };
            if let Some(condition) = condition {
                match side {
                    Side::Up => boundary.upstream = Some(condition),
                    Side::Down => boundary.downstream = Some(condition),
                }
            }
        }
    }

    debug!(
        path = %path,
        profiles = data.num_profiles,
        flow_changes = data.flow_changes.len(),
        boundaries = data.boundary_conditions.len(),
        "Parsed steady flow file"
    );

    Ok(data)
}

fn field(fields: &[&str], i: usize) -> String {
    fields.get(i).copied().unwrap_or_default().to_string()
}
