//! Bridge records within a reach section.
//!
//! After the `Deck Dist` header line comes a CSV line whose fifth and sixth
//! fields give the number of upstream and downstream deck points. Each side
//! is then written as three fixed-width blocks of that many values: stations,
//! high chord elevations, low chord elevations.

use serde::{Deserialize, Serialize};

use ras_common::RasResult;

use crate::text::{number_of_lines, right_of_equals, LineCursor};

use super::{RIVER_REACH, STRUCTURE_TYPE};

const CHORD_ROW_WIDTH: usize = 80;
const CHORD_VALUE_WIDTH: usize = 8;

const DECK_WIDTH_FIELD: usize = 1;
const NUM_UP_FIELD: usize = 4;
const NUM_DOWN_FIELD: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeData {
    pub num_bridges: usize,
    pub bridges: Vec<Bridge>,
}

impl BridgeData {
    pub fn push(&mut self, bridge: Bridge) {
        self.bridges.push(bridge);
        self.num_bridges += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub name: String,
    pub station: f64,
    pub description: String,
    pub deck_width: f64,
    pub up_high_chord: ChordPair,
    pub up_low_chord: ChordPair,
    pub down_high_chord: ChordPair,
    pub down_low_chord: ChordPair,
    pub num_piers: usize,
}

/// Extremes of one chord elevation profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChordPair {
    pub max: f64,
    pub min: f64,
}

impl ChordPair {
    /// `None` for an empty profile.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self { max, min })
    }
}

/// Parse a bridge following its `Type RM Length` line. Ends after `BR Coef`,
/// or before the next structure or reach when that marker is missing.
pub(super) fn parse_bridge(cursor: &mut LineCursor<'_>, station: f64) -> RasResult<Bridge> {
    let mut bridge = Bridge {
        station,
        ..Default::default()
    };

    while let Some(line) = cursor.peek() {
        if line.starts_with(RIVER_REACH) || line.starts_with(STRUCTURE_TYPE) {
            break;
        }
        cursor.next();

        if line.starts_with("BEGIN DESCRIPTION") {
            bridge.description.push_str(&cursor.read_description("END DESCRIPTION:"));
        } else if line.starts_with("Node Name=") {
            bridge.name = right_of_equals(line).to_string();
        } else if line.starts_with("Deck Dist") {
            read_deck(cursor, &mut bridge)?;
        } else if line.starts_with("Pier Skew") {
            bridge.num_piers += 1;
        } else if line.starts_with("BR Coef") {
            break;
        }
    }

    Ok(bridge)
}

fn read_deck(cursor: &mut LineCursor<'_>, bridge: &mut Bridge) -> RasResult<()> {
    let line = cursor.expect_line("deck parameters")?;
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let field = |i: usize| {
        fields
            .get(i)
            .copied()
            .ok_or_else(|| cursor.error(format!("deck parameters have no field {}", i)))
    };

    bridge.deck_width = cursor.parse_f64(field(DECK_WIDTH_FIELD)?, "deck width")?;
    let num_up = cursor.parse_count(field(NUM_UP_FIELD)?, "upstream deck points")?;
    let num_down = cursor.parse_count(field(NUM_DOWN_FIELD)?, "downstream deck points")?;

    (bridge.up_high_chord, bridge.up_low_chord) = read_chords(cursor, num_up, "upstream")?;
    (bridge.down_high_chord, bridge.down_low_chord) = read_chords(cursor, num_down, "downstream")?;
    Ok(())
}

/// Skip the station block, then read the high and low chord blocks.
fn read_chords(
    cursor: &mut LineCursor<'_>,
    count: usize,
    side: &str,
) -> RasResult<(ChordPair, ChordPair)> {
    let rows = number_of_lines(count, CHORD_ROW_WIDTH, CHORD_VALUE_WIDTH);
    cursor.skip(rows, &format!("{} deck stations", side))?;

    let mut chord = |kind: &str| -> RasResult<ChordPair> {
        let what = format!("{} {} chord", side, kind);
        let values = cursor.values_block(count, CHORD_ROW_WIDTH, CHORD_VALUE_WIDTH, &what)?;
        ChordPair::from_values(&values)
            .ok_or_else(|| cursor.error(format!("{} has no elevations", what)))
    };

    let high = chord("high")?;
    let low = chord("low")?;
    Ok((high, low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::parse_geometry;
    use ras_common::ErrorCategory;

    fn row(values: &[f64]) -> String {
        values.iter().map(|v| format!("{:>8}", v)).collect()
    }

    fn block(values: &[f64]) -> String {
        values.chunks(10).map(row).collect::<Vec<_>>().join("\n")
    }

    fn bridge_file(num_up: usize, num_down: usize) -> String {
        let up_sta: Vec<f64> = (0..num_up).map(|i| i as f64 * 10.0).collect();
        let up_high: Vec<f64> = (0..num_up).map(|i| 950.0 + i as f64).collect();
        let up_low: Vec<f64> = (0..num_up).map(|i| 940.0 - i as f64).collect();
        let dn_sta: Vec<f64> = (0..num_down).map(|i| i as f64 * 5.0).collect();
        let dn_high: Vec<f64> = (0..num_down).map(|i| 951.5 + i as f64).collect();
        let dn_low = vec![939.5; num_down];

        format!(
            "River Reach=White,Muncie\n\
             Type RM Length L Ch R = 3 ,11536 ,20,20,20\n\
             BEGIN DESCRIPTION:\n\
             Washington St\n\
             END DESCRIPTION:\n\
             Node Name=Washington\n\
             Deck Dist Width WeirC Skew NumUp NumDn MinLoCord MaxHiCord MaxSubmerge Is_Ogee\n\
             10,42.5,2.6,0,{},{},,,.95,0\n\
             {}\n{}\n{}\n{}\n{}\n{}\n\
             Pier Skew, UpSta & Num, DnSta & Num=0,1150,2,1150,2\n\
             Pier Skew, UpSta & Num, DnSta & Num=0,1250,2,1250,2\n\
             BR Coef=0,0.95,0,0,1.25,0,0\n\
             Type RM Length L Ch R = 1 ,11400 ,20,20,20\n",
            num_up,
            num_down,
            block(&up_sta),
            block(&up_high),
            block(&up_low),
            block(&dn_sta),
            block(&dn_high),
            block(&dn_low),
        )
    }

    #[test]
    fn test_chord_pair_from_values() {
        assert_eq!(
            ChordPair::from_values(&[3.0, 9.0, -1.0]),
            Some(ChordPair { max: 9.0, min: -1.0 })
        );
        assert_eq!(ChordPair::from_values(&[]), None);
    }

    #[test]
    fn test_bridge_with_twelve_values() {
        let text = bridge_file(12, 3);
        let geom = parse_geometry("m/a.g01", text.as_bytes()).unwrap();
        let reach = &geom.structures[0];
        assert_eq!(reach.bridge_data.num_bridges, 1);
        assert_eq!(reach.num_xs, 1);

        let bridge = &reach.bridge_data.bridges[0];
        assert_eq!(bridge.name, "Washington");
        assert_eq!(bridge.station, 11536.0);
        assert_eq!(bridge.description, "Washington St");
        assert_eq!(bridge.deck_width, 42.5);
        assert_eq!(bridge.up_high_chord, ChordPair { max: 961.0, min: 950.0 });
        assert_eq!(bridge.up_low_chord, ChordPair { max: 940.0, min: 929.0 });
        assert_eq!(bridge.down_high_chord, ChordPair { max: 953.5, min: 951.5 });
        assert_eq!(bridge.down_low_chord, ChordPair { max: 939.5, min: 939.5 });
        assert_eq!(bridge.num_piers, 2);
    }

    #[test]
    fn test_empty_chord_is_an_error() {
        let text = bridge_file(0, 3);
        let err = parse_geometry("m/a.g01", text.as_bytes()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
        assert!(err.to_string().contains("upstream high chord"));
    }

    #[test]
    fn test_truncated_chord_block() {
        let text = "River Reach=R,S\nType RM Length L Ch R = 3 ,100\nDeck Dist Width\n0,20,2.6,0,12,12\n       1       2\n";
        let err = parse_geometry("m/a.g01", text.as_bytes()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
        assert!(err.to_string().starts_with("Malformed m/a.g01"));
    }

    #[test]
    fn test_bridge_without_coefficients_stops_at_next_structure() {
        let text = "River Reach=R,S\nType RM Length L Ch R = 3 ,100\nNode Name=B1\nType RM Length L Ch R = 3 ,90\nNode Name=B2\nRiver Reach=T,U\n";
        let geom = parse_geometry("a.g01", text.as_bytes()).unwrap();
        let bridges: Vec<_> = geom.bridges().map(|b| b.name.as_str()).collect();
        assert_eq!(bridges, vec!["B1", "B2"]);
        assert_eq!(geom.structures.len(), 2);
    }
}
