//! Geometry (`.g##`) files.
//!
//! A geometry file opens with a header (title, version, description) and then
//! lists one section per river reach. Each reach section holds a sequence of
//! structures introduced by `Type RM Length L Ch R = <type>, <station>, ...`.

mod bridge;
pub mod features;

use serde::{Deserialize, Serialize};

use ras_common::RasResult;

use crate::text::{csv_after_equals, right_of_equals, LineCursor};

pub use bridge::{Bridge, BridgeData, ChordPair};
pub use features::{build_features, build_features_from_wkt, Features, VectorLayer};

pub(crate) const RIVER_REACH: &str = "River Reach=";
pub(crate) const STRUCTURE_TYPE: &str = "Type RM Length L Ch R =";
pub(crate) const STORAGE_AREA: &str = "Storage Area=";

/// Metadata extracted from one geometry file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeomFileContents {
    pub path: String,
    pub file_ext: String,
    pub title: String,
    pub program_version: String,
    pub description: String,
    pub structures: Vec<HydraulicStructure>,
}

/// Structure counts for one river reach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HydraulicStructure {
    pub river: String,
    pub reach: String,
    pub num_xs: usize,
    pub num_culverts: usize,
    pub bridge_data: BridgeData,
    pub num_inlines: usize,
}

/// Structure kinds selected by the first field of a `Type RM Length` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StructureKind {
    CrossSection,
    Culvert,
    Bridge,
    Inline,
    Other,
}

impl StructureKind {
    fn from_code(code: u32) -> Self {
        match code {
            1 => StructureKind::CrossSection,
            2 => StructureKind::Culvert,
            3 => StructureKind::Bridge,
            5 => StructureKind::Inline,
            _ => StructureKind::Other,
        }
    }
}

/// Split `River Reach=<river>,<reach>` into its names.
pub(crate) fn river_and_reach(line: &str) -> (String, String) {
    let fields = csv_after_equals(line);
    let river = fields.first().copied().unwrap_or_default().to_string();
    let reach = fields.get(1).copied().unwrap_or_default().to_string();
    (river, reach)
}

pub fn parse_geometry(path: &str, content: &[u8]) -> RasResult<GeomFileContents> {
    let text = String::from_utf8_lossy(content);
    let mut cursor = LineCursor::new(path, &text);

    let mut geom = GeomFileContents {
        path: path.to_string(),
        file_ext: ras_common::file_extension(path).to_string(),
        ..Default::default()
    };
    let mut header = true;

    while let Some(line) = cursor.next() {
        if line.starts_with("Geom Title=") {
            geom.title = right_of_equals(line).to_string();
        } else if line.starts_with("Program Version=") {
            geom.program_version = right_of_equals(line).to_string();
        } else if line.starts_with("BEGIN GEOM DESCRIPTION:") {
            if header && geom.description.is_empty() {
                geom.description = cursor.read_description("END GEOM DESCRIPTION:");
            }
        } else if line.starts_with(RIVER_REACH) {
            header = false;
            geom.structures.push(parse_reach(&mut cursor, line)?);
        } else if line.starts_with(STORAGE_AREA) {
            header = false;
        }
    }

    Ok(geom)
}

/// Count the structures of one reach, stopping before the next reach.
fn parse_reach(cursor: &mut LineCursor<'_>, reach_line: &str) -> RasResult<HydraulicStructure> {
    let (river, reach) = river_and_reach(reach_line);
    let mut structure = HydraulicStructure {
        river,
        reach,
        ..Default::default()
    };

    while let Some(line) = cursor.peek() {
        if line.starts_with(RIVER_REACH) {
            break;
        }
        cursor.next();
        if !line.starts_with(STRUCTURE_TYPE) {
            continue;
        }

        let fields = csv_after_equals(line);
        let code = fields
            .first()
            .and_then(|f| f.parse::<u32>().ok())
            .ok_or_else(|| cursor.error(format!("invalid structure type in '{}'", line)))?;

        match StructureKind::from_code(code) {
            StructureKind::CrossSection => structure.num_xs += 1,
            StructureKind::Culvert => structure.num_culverts += 1,
            StructureKind::Inline => structure.num_inlines += 1,
            StructureKind::Bridge => {
                let station = fields
                    .get(1)
                    .ok_or_else(|| cursor.error("bridge record has no station"))?;
                let station = cursor.parse_f64(station, "bridge station")?;
                let bridge = bridge::parse_bridge(cursor, station)?;
                structure.bridge_data.push(bridge);
            }
            StructureKind::Other => {}
        }
    }

    Ok(structure)
}

impl GeomFileContents {
    /// Every bridge across all reaches.
    pub fn bridges(&self) -> impl Iterator<Item = &Bridge> {
        self.structures.iter().flat_map(|s| s.bridge_data.bridges.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Geom Title=Existing Conditions\nProgram Version=5.07\nBEGIN GEOM DESCRIPTION:\nSurveyed 2019\n\nLidar overbanks\nEND GEOM DESCRIPTION:\n";

    #[test]
    fn test_header_fields() {
        let geom = parse_geometry("m/a.g02", HEADER.as_bytes()).unwrap();
        assert_eq!(geom.file_ext, ".g02");
        assert_eq!(geom.title, "Existing Conditions");
        assert_eq!(geom.program_version, "5.07");
        assert_eq!(geom.description, "Surveyed 2019\nLidar overbanks");
        assert!(geom.structures.is_empty());
    }

    #[test]
    fn test_structure_counts_per_reach() {
        let text = format!(
            "{}River Reach=White,Muncie\nType RM Length L Ch R = 1 ,15696.24,0,0,0\nType RM Length L Ch R = 1 ,15000,0,0,0\nType RM Length L Ch R = 2 ,14900,0,0,0\nType RM Length L Ch R = 5 ,14800,0,0,0\nRiver Reach=Buck Creek,Lower\nType RM Length L Ch R = 1 ,900,0,0,0\nType RM Length L Ch R = 6 ,800,0,0,0\n",
            HEADER
        );
        let geom = parse_geometry("m/a.g01", text.as_bytes()).unwrap();
        assert_eq!(geom.structures.len(), 2);

        let white = &geom.structures[0];
        assert_eq!((white.river.as_str(), white.reach.as_str()), ("White", "Muncie"));
        assert_eq!(white.num_xs, 2);
        assert_eq!(white.num_culverts, 1);
        assert_eq!(white.num_inlines, 1);
        assert_eq!(white.bridge_data.num_bridges, 0);

        let buck = &geom.structures[1];
        assert_eq!(buck.river, "Buck Creek");
        assert_eq!(buck.num_xs, 1);
    }

    #[test]
    fn test_description_only_in_header() {
        let text = "Geom Title=A\nRiver Reach=R,S\nBEGIN GEOM DESCRIPTION:\nlate\nEND GEOM DESCRIPTION:\n";
        let geom = parse_geometry("a.g01", text.as_bytes()).unwrap();
        assert!(geom.description.is_empty());
    }

    #[test]
    fn test_bad_structure_type() {
        let text = "River Reach=R,S\nType RM Length L Ch R = x ,1\n";
        let err = parse_geometry("a.g01", text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("a.g01 (line 2)"));
    }
}
