//! Common test fixtures for mcat-ras tests.
//!
//! This module provides reference spatial references and a complete sample
//! model that the parser and assembler tests share.

use crate::generators::{
    plan_file, project_file, steady_flow_file, unsteady_flow_file, BridgeSpec, GeometryBuilder,
};

/// Spatial reference definitions as found in HEC-RAS projection files.
pub mod crs {
    /// Texas South Central state plane, NAD27, US survey feet (ESRI WKT).
    ///
    /// `(2_963_503.91, 254_759.80)` in this system is 28°30'N 96°00'W.
    pub const TEXAS_SOUTH_CENTRAL_FT: &str = r#"PROJCS["NAD_1927_StatePlane_Texas_South_Central_FIPS_4204",GEOGCS["GCS_North_American_1927",DATUM["D_North_American_1927",SPHEROID["Clarke_1866",6378206.4,294.9786982]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic"],PARAMETER["False_Easting",2000000.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",-99.0],PARAMETER["Standard_Parallel_1",28.38333333333333],PARAMETER["Standard_Parallel_2",30.28333333333334],PARAMETER["Latitude_Of_Origin",27.83333333333333],UNIT["Foot_US",0.3048006096012192]]"#;

    /// UTM zone 16N, NAD83, metres (ESRI WKT).
    pub const UTM_16N_M: &str = r#"PROJCS["NAD_1983_UTM_Zone_16N",GEOGCS["GCS_North_American_1983",DATUM["D_North_American_1983",SPHEROID["GRS_1980",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",500000.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",-87.0],PARAMETER["Scale_Factor",0.9996],PARAMETER["Latitude_Of_Origin",0.0],UNIT["Meter",1.0]]"#;

    /// Geographic WGS 84 (ESRI WKT).
    pub const WGS84_GEOGRAPHIC: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
}

/// A small English-unit model georeferenced in Texas South Central feet.
pub mod model {
    /// Directory holding the sample model.
    pub const DIR: &str = "models/Muncie";

    /// Key of the project file that defines the sample model.
    pub const PROJECT_KEY: &str = "models/Muncie/Muncie.prj";

    /// Key of the projection file.
    pub const PROJECTION_KEY: &str = "models/Muncie/Projection.prj";

    /// Key of a model file by extension, e.g. `key("g01")`.
    pub fn key(extension: &str) -> String {
        format!("{}/Muncie.{}", DIR, extension)
    }

    /// Centerline of the sample reach, state plane feet.
    pub const CENTERLINE: [[f64; 2]; 3] = [
        [2_963_000.0, 255_500.0],
        [2_963_500.0, 254_760.0],
        [2_964_000.0, 254_000.0],
    ];
}

/// Geometry file for the sample model: one reach with three cross sections,
/// a bridge, a culvert and a storage area.
pub fn sample_geometry(title: &str, version: &str) -> String {
    let xs = |offset: f64| -> [[f64; 2]; 2] {
        [
            [2_963_350.0 + offset, 254_760.0 - offset],
            [2_963_650.0 + offset, 254_760.0 - offset],
        ]
    };
    let survey = [[0.0, 950.0], [100.0, 940.0], [150.0, 935.5], [200.0, 941.0], [300.0, 951.0]];

    GeometryBuilder::new(title)
        .program_version(version)
        .description("Sample reach for tests")
        .river("White", "Muncie", &model::CENTERLINE)
        .cross_section("15696.24", &xs(-200.0), &survey, Some([100.0, 200.0]))
        .bridge(&BridgeSpec::with_deck_points("Washington St", 15500.0, 12))
        .cross_section("15400", &xs(0.0), &survey, Some([100.0, 200.0]))
        .culvert("15300")
        .cross_section("15000", &xs(200.0), &survey, Some([100.0, 200.0]))
        .storage_area(
            "Pond",
            &[
                [2_964_200.0, 254_200.0],
                [2_964_600.0, 254_200.0],
                [2_964_600.0, 254_600.0],
                [2_964_200.0, 254_600.0],
            ],
        )
        .build()
}

/// Every file of the sample model as `(key, content)`.
pub fn sample_model() -> Vec<(String, String)> {
    vec![
        (
            model::PROJECT_KEY.to_string(),
            project_file("Muncie", "English Units", &["g01", "p01", "p02", "f01", "u01"]),
        ),
        (
            model::key("p01"),
            plan_file("Steady Run", "Steady", "5.07", "g01", "f01"),
        ),
        (
            model::key("p02"),
            plan_file("Unsteady Run", "Unsteady", "5.07", "g01", "u01"),
        ),
        (model::key("g01"), sample_geometry("Existing Conditions", "5.07")),
        (
            model::key("f01"),
            steady_flow_file("Steady Flows", "5.07", "White", "Muncie", &[23000.0, 35000.0]),
        ),
        (
            model::key("u01"),
            unsteady_flow_file(
                "1996 Event",
                "5.07",
                "White",
                "Muncie",
                &[1000.0, 2200.0, 4800.0, 3000.0],
            ),
        ),
        (
            model::PROJECTION_KEY.to_string(),
            crs::TEXAS_SOUTH_CENTRAL_FT.to_string(),
        ),
        (
            format!("{}/Muncie.g01.hdf", model::DIR),
            "binary geometry".to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_model_keys() {
        let files = sample_model();
        assert!(files.iter().any(|(k, _)| k == model::PROJECT_KEY));
        assert!(files.iter().all(|(k, _)| k.starts_with(model::DIR)));
        assert_eq!(model::key("g01"), "models/Muncie/Muncie.g01");
    }

    #[test]
    fn test_sample_geometry_sections() {
        let text = sample_geometry("G", "5.07");
        assert_eq!(text.matches("Type RM Length L Ch R = 1 ").count(), 3);
        assert_eq!(text.matches("Type RM Length L Ch R = 3 ").count(), 1);
        assert!(text.contains("Storage Area=Pond"));
    }
}
