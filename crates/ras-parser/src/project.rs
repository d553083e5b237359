//! Project (`.prj`) file header.

use serde::{Deserialize, Serialize};

use ras_common::UnitSystem;

use crate::text::{right_of_equals, LineCursor};

/// Marker that identifies a HEC-RAS project file on its first line.
pub const TITLE_MARKER: &str = "Proj Title=";

/// Header fields of the project file that defines a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFileContents {
    pub path: String,
    pub title: String,
    pub current_plan: String,
    /// HEC-RAS assumes English units unless the file says otherwise
    pub units: UnitSystem,
    pub description: String,
    pub plan_files: Vec<String>,
    pub geom_files: Vec<String>,
    pub flow_files: Vec<String>,
    pub unsteady_files: Vec<String>,
}

/// Whether the first line of a file marks it as a HEC-RAS project.
pub fn is_project_header(first_line: &str) -> bool {
    first_line.contains(TITLE_MARKER)
}

/// First line of a file's content, without the line terminator.
pub fn first_line(content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);
    text.lines().next().unwrap_or_default().to_string()
}

pub fn parse_project(path: &str, content: &[u8]) -> ProjectFileContents {
    let text = String::from_utf8_lossy(content);
    let mut cursor = LineCursor::new(path, &text);

    let mut project = ProjectFileContents {
        path: path.to_string(),
        title: String::new(),
        current_plan: String::new(),
        units: UnitSystem::English,
        description: String::new(),
        plan_files: Vec::new(),
        geom_files: Vec::new(),
        flow_files: Vec::new(),
        unsteady_files: Vec::new(),
    };

    while let Some(line) = cursor.next() {
        if let Some(units) = UnitSystem::from_project_line(line) {
            project.units = units;
        } else if line.starts_with(TITLE_MARKER) {
            project.title = right_of_equals(line).to_string();
        } else if line.starts_with("Current Plan=") {
            project.current_plan = right_of_equals(line).to_string();
        } else if line.starts_with("Plan File=") {
            project.plan_files.push(right_of_equals(line).to_string());
        } else if line.starts_with("Geom File=") {
            project.geom_files.push(right_of_equals(line).to_string());
        } else if line.starts_with("Flow File=") {
            project.flow_files.push(right_of_equals(line).to_string());
        } else if line.starts_with("Unsteady File=") {
            project.unsteady_files.push(right_of_equals(line).to_string());
        } else if line.starts_with("BEGIN DESCRIPTION") && project.description.is_empty() {
            project.description = cursor.read_description("END DESCRIPTION");
        }
    }

    project
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "Proj Title=Muncie\r\nCurrent Plan=p03\r\nDefault Exp/Contr=0.3,0.1\r\nSI Units\r\nGeom File=g01\r\nFlow File=f01\r\nUnsteady File=u01\r\nPlan File=p01\r\nPlan File=p03\r\nBEGIN DESCRIPTION:\r\nWhite River at Muncie\r\n\r\nsecond line\r\nEND DESCRIPTION:\r\n";

    #[test]
    fn test_parse_project() {
        let project = parse_project("models/Muncie/Muncie.prj", PROJECT.as_bytes());
        assert_eq!(project.title, "Muncie");
        assert_eq!(project.current_plan, "p03");
        assert_eq!(project.units, UnitSystem::SI);
        assert_eq!(project.plan_files, vec!["p01", "p03"]);
        assert_eq!(project.geom_files, vec!["g01"]);
        assert_eq!(project.flow_files, vec!["f01"]);
        assert_eq!(project.unsteady_files, vec!["u01"]);
        assert_eq!(project.description, "White River at Muncie\nsecond line");
    }

    #[test]
    fn test_units_default_to_english() {
        let project = parse_project("a.prj", b"Proj Title=A\n");
        assert_eq!(project.units, UnitSystem::English);
    }

    #[test]
    fn test_project_header() {
        assert!(is_project_header(&first_line(PROJECT.as_bytes())));
        assert!(!is_project_header(&first_line(b"PROJCS[\"NAD_1983\"]")));
        assert!(!is_project_header(&first_line(b"")));
    }
}
