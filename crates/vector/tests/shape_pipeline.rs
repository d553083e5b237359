//! Shapes go through swap, multi coercion and WKB exactly as the feature
//! builder drives them.

use vector::wkb;
use vector::{attribute_elevation, Geometry, Shape};

#[test]
fn test_cross_section_pipeline() {
    let cut_line = [[1000.0, 2000.0], [1000.0, 2100.0]];
    let stations = [[0.0, 10.0], [50.0, 2.0], [100.0, 9.0], [150.0, 8.0]];
    let points = attribute_elevation(&cut_line, &stations);
    assert_eq!(points.len(), 3);

    let bytes = Shape::LineString3D(points).swap_axes().to_wkb();
    let decoded = wkb::decode(&bytes).unwrap();

    match decoded {
        Geometry::MultiLineStringZ(lines) => {
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0][1], [2050.0, 1000.0, 2.0]);
        }
        other => panic!("unexpected {}", other.type_name()),
    }
}

#[test]
fn test_storage_area_pipeline() {
    let outline = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
    let hex = wkb::to_hex(&Shape::polygon(outline).to_wkb());
    let decoded = wkb::decode(&wkb::from_hex(&hex).unwrap()).unwrap();

    assert_eq!(decoded.type_name(), "MultiPolygon");
    let coords = decoded.xy_coordinates();
    assert_eq!(coords.len(), 5);
    assert_eq!(coords.first(), coords.last());
}

#[test]
fn test_bank_point_pipeline() {
    let decoded = wkb::decode(&Shape::Point([3.0, 4.0]).to_wkb()).unwrap();
    assert_eq!(decoded, Geometry::MultiPoint(vec![[3.0, 4.0]]));
}
