//! Parsing the generated sample model end to end.

use projection::{from_epsg, CoordinateTransform};
use ras_common::ErrorCategory;
use ras_parser::{
    build_features, build_features_from_wkt, classify_key, parse_forcing, parse_geometry,
    parse_plan, parse_project, ChordPair, FileRole, FlowData,
};
use test_utils::{
    assert_approx_eq, crs, fixed_width_pairs, model, sample_geometry, sample_model, GeometryBuilder,
};
use vector::{wkb, Geometry};

fn content(key: &str) -> String {
    sample_model()
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, c)| c)
        .unwrap()
}

#[test]
fn test_roles_of_sample_files() {
    let roles: Vec<FileRole> = sample_model().iter().map(|(k, _)| classify_key(k)).collect();
    assert_eq!(roles.iter().filter(|r| **r == FileRole::Projection).count(), 2);
    assert_eq!(roles.iter().filter(|r| **r == FileRole::Plan).count(), 2);
    assert_eq!(roles.iter().filter(|r| **r == FileRole::Unrecognized).count(), 1);
}

#[test]
fn test_project_and_plans() {
    let project = parse_project(model::PROJECT_KEY, content(model::PROJECT_KEY).as_bytes());
    assert_eq!(project.title, "Muncie");
    assert_eq!(project.plan_files, vec!["p01", "p02"]);

    let plan = parse_plan(&model::key("p02"), content(&model::key("p02")).as_bytes());
    assert_eq!(plan.plan_title, "Unsteady Run");
    assert_eq!(plan.flow_file, "u01");
    assert_eq!(plan.flow_regime, "Subcritical Flow");
    assert_eq!(plan.hash.len(), 64);
}

#[test]
fn test_sample_geometry_structures() {
    let geom = parse_geometry(&model::key("g01"), sample_geometry("G", "5.07").as_bytes()).unwrap();
    assert_eq!(geom.description, "Sample reach for tests");
    assert_eq!(geom.structures.len(), 1);

    let reach = &geom.structures[0];
    assert_eq!(reach.num_xs, 3);
    assert_eq!(reach.num_culverts, 1);
    assert_eq!(reach.bridge_data.num_bridges, 1);

    let bridge = &reach.bridge_data.bridges[0];
    assert_eq!(bridge.name, "Washington St");
    assert_eq!(bridge.station, 15500.0);
    assert_eq!(bridge.deck_width, 42.5);
    // Twelve deck points span two 80-column rows
    assert_eq!(bridge.up_high_chord, ChordPair { max: 955.5, min: 950.0 });
    assert_eq!(bridge.down_low_chord, ChordPair { max: 940.0, min: 934.5 });
    assert_eq!(bridge.num_piers, 2);
}

#[test]
fn test_sample_features_in_wgs84() {
    let text = sample_geometry("G", "5.07");
    let features =
        build_features_from_wkt("Muncie.g01", text.as_bytes(), crs::TEXAS_SOUTH_CENTRAL_FT, 4326)
            .unwrap();

    assert_eq!(features.rivers.len(), 1);
    assert_eq!(features.xs.len(), 3);
    assert_eq!(features.banks.len(), 6);
    assert_eq!(features.storage_areas.len(), 1);

    // Output is longitude/latitude
    match wkb::decode(&features.rivers[0].geometry).unwrap() {
        Geometry::MultiLineString(lines) => {
            let middle = lines[0][1];
            assert_approx_eq!(middle[0], -96.0, 1e-4);
            assert_approx_eq!(middle[1], 28.5, 1e-4);
        }
        other => panic!("unexpected {:?}", other),
    }

    match wkb::decode(&features.xs[1].geometry).unwrap() {
        Geometry::MultiLineStringZ(lines) => {
            assert_eq!(lines[0].len(), 5);
            assert_eq!(lines[0][2][2], 935.5);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_identity_round_trip() {
    let line = [[-85.3862, 40.1934], [-85.3801, 40.1977]];
    let text = GeometryBuilder::new("Identity")
        .river("White", "Muncie", &line)
        .build();
    let transform =
        CoordinateTransform::new(from_epsg(4326).unwrap(), from_epsg(4326).unwrap()).unwrap();

    let features = build_features("a.g01", text.as_bytes(), &transform).unwrap();
    let decoded = wkb::decode(&features.rivers[0].geometry).unwrap();
    let coords = decoded.xy_coordinates();
    assert_eq!(coords.len(), 2);
    for (got, want) in coords.iter().zip(line.iter()) {
        assert_approx_eq!(got[0], want[0], 1e-9);
        assert_approx_eq!(got[1], want[1], 1e-9);
    }
}

#[test]
fn test_malformed_cut_line_reports_location() {
    let text = GeometryBuilder::new("Broken")
        .river("White", "Muncie", &model::CENTERLINE)
        .line("Type RM Length L Ch R = 1 ,100     ,100,100,100")
        .line("XS GIS Cut Line=2")
        .line(&fixed_width_pairs(&[[2_963_350.0, 254_760.0]], 64, 16))
        .line("#Sta/Elev= 1 ")
        .build();

    let err = build_features_from_wkt("a.g01", text.as_bytes(), crs::TEXAS_SOUTH_CENTRAL_FT, 4326)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Format);
    assert!(err.to_string().contains("a.g01 (line"), "{}", err);
}

#[test]
fn test_invalid_source_projection() {
    let err = build_features_from_wkt("a.g01", b"", "PROJCS[\"broken\"", 4326).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[test]
fn test_flow_files() {
    match parse_forcing(&model::key("f01"), content(&model::key("f01")).as_bytes()).unwrap() {
        FlowData::Steady(steady) => {
            assert_eq!(steady.num_profiles, 2);
            assert_eq!(steady.flow_changes[0].flows, vec![23000.0, 35000.0]);
            assert_eq!(steady.boundary_conditions.len(), 2);
        }
        other => panic!("unexpected {:?}", other),
    }

    match parse_forcing(&model::key("u01"), content(&model::key("u01")).as_bytes()).unwrap() {
        FlowData::Unsteady(unsteady) => {
            assert_eq!(unsteady.flow_title, "1996 Event");
            assert_eq!(unsteady.boundary_conditions.len(), 2);
        }
        other => panic!("unexpected {:?}", other),
    }
}
