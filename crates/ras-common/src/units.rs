//! Unit systems declared by a project file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear unit system a model is built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitSystem {
    /// US customary (feet)
    English,
    /// Metric (metres)
    SI,
}

impl UnitSystem {
    /// Recognize the unit line of a project file (`English Units`, `SI Units`).
    pub fn from_project_line(line: &str) -> Option<Self> {
        match line.trim() {
            "English Units" => Some(UnitSystem::English),
            "SI Units" => Some(UnitSystem::SI),
            _ => None,
        }
    }

    /// Whether a linear unit of `meters_per_unit` belongs to this system.
    ///
    /// International and US survey feet are both accepted for English units.
    pub fn accepts_linear_unit(&self, meters_per_unit: f64) -> bool {
        match self {
            UnitSystem::English => {
                (meters_per_unit - 0.3048).abs() < 1e-5
                    || (meters_per_unit - 1200.0 / 3937.0).abs() < 1e-5
            }
            UnitSystem::SI => (meters_per_unit - 1.0).abs() < 1e-9,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::English => write!(f, "English Units"),
            UnitSystem::SI => write!(f, "SI Units"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_project_line() {
        assert_eq!(UnitSystem::from_project_line("English Units"), Some(UnitSystem::English));
        assert_eq!(UnitSystem::from_project_line("SI Units "), Some(UnitSystem::SI));
        assert_eq!(UnitSystem::from_project_line("Proj Title=x"), None);
    }

    #[test]
    fn test_accepts_linear_unit() {
        assert!(UnitSystem::English.accepts_linear_unit(0.3048006096012192));
        assert!(UnitSystem::English.accepts_linear_unit(0.3048));
        assert!(!UnitSystem::English.accepts_linear_unit(1.0));
        assert!(UnitSystem::SI.accepts_linear_unit(1.0));
        assert!(!UnitSystem::SI.accepts_linear_unit(0.3048));
    }
}
