//! Vector features of a geometry file.
//!
//! River centerlines, cross-section cut lines (with elevations), bank
//! stations and storage area outlines are read in survey coordinates,
//! reprojected into the destination reference and serialized as WKB of
//! their multi variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use projection::{AxisOrder, CoordinateTransform};
use ras_common::RasResult;
use vector::{attribute_elevation, interpolate_along, require_vertices, Shape};

use super::{river_and_reach, RIVER_REACH, STORAGE_AREA, STRUCTURE_TYPE};
use crate::text::{csv_after_equals, LineCursor};

const SECTION_STOPS: &[&str] = &[STRUCTURE_TYPE, RIVER_REACH, STORAGE_AREA];

const CROSS_SECTION_TYPE: &str = "1";

/// One feature: a name, optional attributes and a WKB payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayer {
    pub feature_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fields: Option<BTreeMap<String, String>>,
    /// WKB, hex encoded in JSON
    #[serde(with = "hex_wkb")]
    pub geometry: Vec<u8>,
}

/// Features of one geometry file, by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub rivers: Vec<VectorLayer>,
    pub xs: Vec<VectorLayer>,
    pub banks: Vec<VectorLayer>,
    pub storage_areas: Vec<VectorLayer>,
}

impl Features {
    pub fn len(&self) -> usize {
        self.rivers.len() + self.xs.len() + self.banks.len() + self.storage_areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod hex_wkb {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(wkb: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&vector::wkb::to_hex(wkb))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let hex = String::deserialize(deserializer)?;
        vector::wkb::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Reproject a shape and serialize it.
struct Writer<'a> {
    transform: &'a CoordinateTransform,
}

impl Writer<'_> {
    fn write(&self, shape: Shape) -> RasResult<Vec<u8>> {
        let projected = shape.try_map_xy(|x, y| self.transform.transform(x, y))?;
        // Written geometries are always x/y (lon/lat)
        let projected = match self.transform.output_axis_order() {
            AxisOrder::LatLon => projected.swap_axes(),
            AxisOrder::XY => projected,
        };
        Ok(projected.to_wkb())
    }
}

/// Build the features of a geometry file.
pub fn build_features(
    path: &str,
    content: &[u8],
    transform: &CoordinateTransform,
) -> RasResult<Features> {
    let text = String::from_utf8_lossy(content);
    let mut cursor = LineCursor::new(path, &text);
    let writer = Writer { transform };

    let mut features = Features::default();
    let mut river_reach_name = String::new();

    while let Some(line) = cursor.next() {
        if line.starts_with(RIVER_REACH) {
            let layer = river(&mut cursor, line, &writer)?;
            river_reach_name = layer.feature_name.clone();
            features.rivers.push(layer);
        } else if line.starts_with(STORAGE_AREA) {
            features
                .storage_areas
                .push(storage_area(&mut cursor, line, &writer)?);
        } else if line.starts_with(STRUCTURE_TYPE) {
            let fields = csv_after_equals(line);
            if fields.first() == Some(&CROSS_SECTION_TYPE) {
                let name = fields.get(1).copied().unwrap_or_default();
                if let Some((xs, banks)) =
                    cross_section(&mut cursor, name, &river_reach_name, &writer)?
                {
                    features.xs.push(xs);
                    features.banks.extend(banks);
                }
            }
        }
    }

    debug!(
        path = %path,
        rivers = features.rivers.len(),
        xs = features.xs.len(),
        banks = features.banks.len(),
        storage_areas = features.storage_areas.len(),
        "Built geometry features"
    );

    Ok(features)
}

/// Build features with a transform from source WKT to an EPSG code.
pub fn build_features_from_wkt(
    path: &str,
    content: &[u8],
    source_wkt: &str,
    destination_epsg: u32,
) -> RasResult<Features> {
    let transform = CoordinateTransform::from_wkt_to_epsg(source_wkt, destination_epsg)?;
    build_features(path, content, &transform)
}

fn river(cursor: &mut LineCursor<'_>, line: &str, writer: &Writer<'_>) -> RasResult<VectorLayer> {
    let (river, reach) = river_and_reach(line);
    let feature_name = format!("{}, {}", river, reach);

    let xy = cursor
        .seek_pairs("Reach XY=", SECTION_STOPS, 64, 16)?
        .ok_or_else(|| cursor.error(format!("river '{}' has no Reach XY", feature_name)))?;
    require_vertices(&xy, 2, &format!("river '{}'", feature_name))?;

    Ok(VectorLayer {
        feature_name,
        fields: None,
        geometry: writer.write(Shape::LineString(xy))?,
    })
}

fn storage_area(
    cursor: &mut LineCursor<'_>,
    line: &str,
    writer: &Writer<'_>,
) -> RasResult<VectorLayer> {
    let feature_name = csv_after_equals(line)
        .first()
        .copied()
        .unwrap_or_default()
        .to_string();

    let xy = cursor
        .seek_pairs("Storage Area Surface Line=", SECTION_STOPS, 32, 16)?
        .ok_or_else(|| {
            cursor.error(format!("storage area '{}' has no surface line", feature_name))
        })?;
    require_vertices(&xy, 3, &format!("storage area '{}'", feature_name))?;

    Ok(VectorLayer {
        feature_name,
        fields: None,
        geometry: writer.write(Shape::polygon(xy))?,
    })
}

/// A cross section with no usable cut line is skipped, so one bad section
/// does not cost the rest of the model its features. Malformed numbers and
/// truncated blocks are still errors.
fn cross_section(
    cursor: &mut LineCursor<'_>,
    name: &str,
    river_reach_name: &str,
    writer: &Writer<'_>,
) -> RasResult<Option<(VectorLayer, Vec<VectorLayer>)>> {
    let skip = |cursor: &LineCursor<'_>, reason: &str| {
        warn!(
            path = %cursor.path(),
            line = cursor.line_number(),
            xs = %name,
            reason,
            "Cross section skipped"
        );
    };

    let Some(cut_line) = cursor.seek_pairs("XS GIS Cut Line=", SECTION_STOPS, 64, 16)? else {
        skip(cursor, "no GIS cut line");
        return Ok(None);
    };
    if cut_line.len() < 2 {
        skip(cursor, "cut line has fewer than 2 vertices");
        return Ok(None);
    }

    let Some(station_elevation) = cursor.seek_pairs("#Sta/Elev=", SECTION_STOPS, 80, 8)? else {
        skip(cursor, "no #Sta/Elev");
        return Ok(None);
    };
    let first_station = station_elevation.first().map(|p| p[0]).unwrap_or_default();

    let xyz = attribute_elevation(&cut_line, &station_elevation);
    if xyz.len() < station_elevation.len() {
        warn!(
            path = %cursor.path(),
            xs = %name,
            dropped = station_elevation.len() - xyz.len(),
            "Stations beyond the cut line dropped"
        );
    }
    if xyz.len() < 2 {
        skip(cursor, "fewer than 2 stations on the cut line");
        return Ok(None);
    }

    let xs = VectorLayer {
        feature_name: name.to_string(),
        fields: Some(BTreeMap::from([(
            "river_reach_name".to_string(),
            river_reach_name.to_string(),
        )])),
        geometry: writer.write(Shape::LineString3D(xyz))?,
    };

    let mut banks = Vec::new();
    if let Some(line) = cursor.seek("Bank Sta=", SECTION_STOPS) {
        for raw in csv_after_equals(line) {
            let station = cursor.parse_f64(raw, "Bank Sta=")?;
            let Some(point) = interpolate_along(&cut_line, station - first_station) else {
                warn!(
                    path = %cursor.path(),
                    xs = %name,
                    station,
                    "Bank station beyond the cut line skipped"
                );
                continue;
            };
            banks.push(VectorLayer {
                feature_name: raw.to_string(),
                fields: Some(BTreeMap::from([
                    ("river_reach_name".to_string(), river_reach_name.to_string()),
                    ("xs_name".to_string(), name.to_string()),
                ])),
                geometry: writer.write(Shape::Point(point))?,
            });
        }
    }

    Ok(Some((xs, banks)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::from_epsg;
    use vector::{wkb, Geometry};

    fn identity() -> CoordinateTransform {
        CoordinateTransform::new(from_epsg(4326).unwrap(), from_epsg(4326).unwrap()).unwrap()
    }

    fn pairs(values: &[(f64, f64)], width: usize, per_row: usize) -> String {
        values
            .chunks(per_row)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|(a, b)| format!("{:>w$}{:>w$}", a, b, w = width))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn geometry_file() -> String {
        let reach = [(-85.40, 40.20), (-85.39, 40.21), (-85.38, 40.22)];
        let cut = [(-85.395, 40.20), (-85.395, 40.22)];
        let sta_elev = [(100.0, 950.0), (100.005, 945.0), (100.01, 951.0)];
        let surface = [(-85.30, 40.10), (-85.29, 40.10), (-85.29, 40.11)];
        format!(
            "Geom Title=Test\nRiver Reach=White,Muncie\nReach XY= 3\n{}\nType RM Length L Ch R = 1 ,15696.24,0,0,0\nXS GIS Cut Line=2\n{}\n#Sta/Elev= 3\n{}\nBank Sta=100.002,100.05\nStorage Area=Pond,,\nStorage Area Surface Line= 3\n{}\n",
            pairs(&reach, 16, 2),
            pairs(&cut, 16, 2),
            pairs(&sta_elev, 8, 5),
            pairs(&surface, 16, 1),
        )
    }

    #[test]
    fn test_identity_features() {
        let features =
            build_features("m/a.g01", geometry_file().as_bytes(), &identity()).unwrap();
        assert_eq!(features.rivers.len(), 1);
        assert_eq!(features.xs.len(), 1);
        assert_eq!(features.storage_areas.len(), 1);
        // Second bank station lies past the end of the cut line
        assert_eq!(features.banks.len(), 1);

        let river = &features.rivers[0];
        assert_eq!(river.feature_name, "White, Muncie");
        match wkb::decode(&river.geometry).unwrap() {
            Geometry::MultiLineString(lines) => {
                assert!((lines[0][0][0] + 85.40).abs() < 1e-9);
                assert!((lines[0][0][1] - 40.20).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }

        let xs = &features.xs[0];
        assert_eq!(xs.feature_name, "15696.24");
        assert_eq!(
            xs.fields.as_ref().unwrap()["river_reach_name"],
            "White, Muncie"
        );
        assert_eq!(wkb::decode(&xs.geometry).unwrap().type_name(), "MultiLineString Z");

        let bank = &features.banks[0];
        assert_eq!(bank.fields.as_ref().unwrap()["xs_name"], "15696.24");

        let pond = &features.storage_areas[0];
        assert_eq!(pond.feature_name, "Pond");
        match wkb::decode(&pond.geometry).unwrap() {
            Geometry::MultiPolygon(polys) => assert_eq!(polys[0][0].len(), 4),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unusable_cross_sections_are_skipped() {
        let reach = "River Reach=R,S\nReach XY= 2\n               0               0               1               1\n";
        let no_cut_line = "Type RM Length L Ch R = 1 ,10\n#Sta/Elev= 2\n       0       1       1       2\nBank Sta=0,1\n";
        let one_vertex = "Type RM Length L Ch R = 1 ,9\nXS GIS Cut Line=1\n               0               0\n#Sta/Elev= 2\n       0       1       1       2\n";
        let off_the_line = "Type RM Length L Ch R = 1 ,8\nXS GIS Cut Line=2\n               0               0               0             0.5\n#Sta/Elev= 3\n       0       1       5       2       9       3\n";
        let good = "Type RM Length L Ch R = 1 ,7\nXS GIS Cut Line=2\n               0               0               0               1\n#Sta/Elev= 2\n       0       1    0.75       2\nBank Sta=0.25,0.5\n";
        let text = format!("{}{}{}{}{}", reach, no_cut_line, one_vertex, off_the_line, good);

        let features = build_features("m/a.g01", text.as_bytes(), &identity()).unwrap();
        assert_eq!(features.rivers.len(), 1);
        assert_eq!(features.xs.len(), 1);
        assert_eq!(features.xs[0].feature_name, "7");
        assert_eq!(features.banks.len(), 2);
        assert!(features
            .banks
            .iter()
            .all(|b| b.fields.as_ref().unwrap()["xs_name"] == "7"));
    }

    #[test]
    fn test_malformed_station_elevation_is_an_error() {
        let text = "River Reach=R,S\nReach XY= 2\n               0               0               1               1\nType RM Length L Ch R = 1 ,10\nXS GIS Cut Line=2\n               0               0               0               1\n#Sta/Elev= 2\n       0     abc\n";
        let err = build_features("m/a.g01", text.as_bytes(), &identity()).unwrap_err();
        assert!(err.to_string().contains("m/a.g01 (line 8)"), "{}", err);
    }

    #[test]
    fn test_layer_json_carries_hex() {
        let layer = VectorLayer {
            feature_name: "x".into(),
            fields: None,
            geometry: vec![1, 0xab],
        };
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["geometry"], "01ab");
        assert!(json.get("fields").is_none());
        let back: VectorLayer = serde_json::from_value(json).unwrap();
        assert_eq!(back, layer);
    }
}
