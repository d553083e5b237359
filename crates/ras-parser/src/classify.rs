//! File role classification by extension.
//!
//! HEC-RAS names every file of a model `<stem>.<x><nn>`, where the letter
//! selects the role and the two digits number the file (`.g01`, `.p03`).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Role of a file within a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    Geometry,
    Plan,
    SteadyFlow,
    UnsteadyFlow,
    QuasiSteadyFlow,
    SteadyRun,
    UnsteadyRun,
    Output,
    Projection,
    Unrecognized,
}

impl FileRole {
    /// Steady, unsteady or quasi-steady flow.
    pub fn is_flow(&self) -> bool {
        matches!(
            self,
            FileRole::SteadyFlow | FileRole::UnsteadyFlow | FileRole::QuasiSteadyFlow
        )
    }

    /// Steady or unsteady run file.
    pub fn is_run(&self) -> bool {
        matches!(self, FileRole::SteadyRun | FileRole::UnsteadyRun)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileRole::Geometry => "geometry",
            FileRole::Plan => "plan",
            FileRole::SteadyFlow => "steady_flow",
            FileRole::UnsteadyFlow => "unsteady_flow",
            FileRole::QuasiSteadyFlow => "quasi_steady_flow",
            FileRole::SteadyRun => "steady_run",
            FileRole::UnsteadyRun => "unsteady_run",
            FileRole::Output => "output",
            FileRole::Projection => "projection",
            FileRole::Unrecognized => "unrecognized",
        }
    }
}

const PATTERNS: &[(&str, FileRole)] = &[
    (r"^\.g\d{2}$", FileRole::Geometry),
    (r"^\.p\d{2}$", FileRole::Plan),
    (r"^\.f\d{2}$", FileRole::SteadyFlow),
    (r"^\.u\d{2}$", FileRole::UnsteadyFlow),
    (r"^\.q\d{2}$", FileRole::QuasiSteadyFlow),
    (r"^\.r\d{2}$", FileRole::SteadyRun),
    (r"^\.x\d{2}$", FileRole::UnsteadyRun),
    (r"^\.O\d{2}$", FileRole::Output),
    (r"^\.pr[oj](j|jection)?$", FileRole::Projection),
];

fn table() -> &'static [(Regex, FileRole)] {
    static TABLE: OnceLock<Vec<(Regex, FileRole)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|(pattern, role)| Regex::new(pattern).ok().map(|re| (re, *role)))
            .collect()
    })
}

/// Classify an extension such as `.g01`. Never fails.
pub fn classify(extension: &str) -> FileRole {
    table()
        .iter()
        .find(|(re, _)| re.is_match(extension))
        .map(|(_, role)| *role)
        .unwrap_or(FileRole::Unrecognized)
}

/// Classify an object key by its extension.
pub fn classify_key(key: &str) -> FileRole {
    classify(ras_common::file_extension(key))
}
