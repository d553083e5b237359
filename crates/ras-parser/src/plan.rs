//! Plan (`.p##`) files.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Metadata extracted from one plan file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFileContents {
    pub path: String,
    /// Hex SHA-256 of the raw file content
    pub hash: String,
    pub file_ext: String,
    pub plan_title: String,
    pub short_identifier: String,
    pub program_version: String,
    pub geom_file: String,
    /// Steady and unsteady plans both record their flow file here
    pub flow_file: String,
    pub flow_regime: String,
    pub description: String,
    /// Set when the file could not be read
    pub notes: String,
}

impl PlanFileContents {
    /// Record for a plan that could not be fetched. Plan metadata is best
    /// effort, so this replaces the record instead of failing the model.
    pub fn failed(path: &str, reason: &str) -> Self {
        Self {
            path: path.to_string(),
            file_ext: ras_common::file_extension(path).to_string(),
            notes: format!("{} failed to process: {}", ras_common::file_name(path), reason),
            ..Default::default()
        }
    }
}

fn flow_regime_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new("Subcritical|Supercritical|Mixed").ok())
        .as_ref()
}

/// Parse a plan file. The digest is accumulated over the raw bytes of each
/// line during the same scan that extracts the fields.
pub fn parse_plan(path: &str, content: &[u8]) -> PlanFileContents {
    let mut plan = PlanFileContents {
        path: path.to_string(),
        file_ext: ras_common::file_extension(path).to_string(),
        ..Default::default()
    };

    let mut hasher = Sha256::new();
    let mut description: Option<Vec<String>> = None;

    for raw in content.split_inclusive(|b| *b == b'\n') {
        hasher.update(raw);
        let decoded = String::from_utf8_lossy(raw);
        let line = decoded.trim_end_matches(['\r', '\n']);

        if let Some(kept) = description.as_mut() {
            if line.contains("END DESCRIPTION") {
                plan.description = kept.join("\n");
                description = None;
            } else if !line.is_empty() {
                kept.push(line.to_string());
            }
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            match key {
                "Plan Title" => plan.plan_title = value.to_string(),
                "Short Identifier" => plan.short_identifier = value.to_string(),
                "Program Version" => plan.program_version = value.to_string(),
                "Geom File" => plan.geom_file = value.to_string(),
                "Flow File" => plan.flow_file = value.to_string(),
                _ => {}
            }
        } else if line.contains("BEGIN DESCRIPTION") {
            description = Some(Vec::new());
        } else if flow_regime_pattern().is_some_and(|re| re.is_match(line)) {
            plan.flow_regime = line.to_string();
        }
    }

    // Unterminated description runs to end of file
    if let Some(kept) = description {
        plan.description = kept.join("\n");
    }

    plan.hash = format!("{:x}", hasher.finalize());
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "Plan Title=Unsteady Run\nProgram Version=5.07\nShort Identifier=Unsteady\nGeom File=g01\nFlow File=u01\nBEGIN DESCRIPTION:\nCalibrated to 2005 event\n\nUses updated Manning's n\nEND DESCRIPTION:\nSubcritical Flow\nRun HTab= 1 \n";

    #[test]
    fn test_parse_plan_fields() {
        let plan = parse_plan("models/Muncie/Muncie.p01", PLAN.as_bytes());
        assert_eq!(plan.file_ext, ".p01");
        assert_eq!(plan.plan_title, "Unsteady Run");
        assert_eq!(plan.short_identifier, "Unsteady");
        assert_eq!(plan.program_version, "5.07");
        assert_eq!(plan.geom_file, "g01");
        assert_eq!(plan.flow_file, "u01");
        assert_eq!(plan.flow_regime, "Subcritical Flow");
        assert_eq!(
            plan.description,
            "Calibrated to 2005 event\nUses updated Manning's n"
        );
        assert!(plan.notes.is_empty());
    }

    #[test]
    fn test_hash_covers_whole_file() {
        let plan = parse_plan("a.p01", PLAN.as_bytes());
        let expected = format!("{:x}", Sha256::digest(PLAN.as_bytes()));
        assert_eq!(plan.hash, expected);

        let no_trailing_newline = PLAN.trim_end();
        let plan = parse_plan("a.p01", no_trailing_newline.as_bytes());
        assert_eq!(
            plan.hash,
            format!("{:x}", Sha256::digest(no_trailing_newline.as_bytes()))
        );
    }

    #[test]
    fn test_failed_record() {
        let plan = PlanFileContents::failed("models/a/a.p02", "Object not found");
        assert_eq!(plan.file_ext, ".p02");
        assert!(plan.notes.starts_with("a.p02 failed to process"));
        assert!(plan.hash.is_empty());
    }
}
