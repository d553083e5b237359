//! Generators for HEC-RAS text files.
//!
//! These produce files in the layouts HEC-RAS writes, so parsers can be
//! exercised without shipping real model data. Numbers are right-aligned in
//! fixed-width fields; callers choose values that fit the field width.

/// Lays out values right-aligned, `row_width / value_width` to a row.
///
/// # Example
///
/// ```
/// use test_utils::fixed_width_values;
///
/// let block = fixed_width_values(&[1.0, 2.5, 3.0], 16, 8);
/// assert_eq!(block, "       1     2.5\n       3");
/// ```
pub fn fixed_width_values(values: &[f64], row_width: usize, value_width: usize) -> String {
    let per_row = (row_width / value_width).max(1);
    values
        .chunks(per_row)
        .map(|row| {
            row.iter()
                .map(|v| format!("{:>w$}", v, w = value_width))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lays out (a, b) pairs, two fields per pair.
///
/// # Example
///
/// ```
/// use test_utils::fixed_width_pairs;
///
/// let block = fixed_width_pairs(&[[1.0, 2.0], [3.0, 4.0]], 32, 8);
/// assert_eq!(block, "       1       2       3       4");
/// ```
pub fn fixed_width_pairs(pairs: &[[f64; 2]], row_width: usize, value_width: usize) -> String {
    let flat: Vec<f64> = pairs.iter().flatten().copied().collect();
    fixed_width_values(&flat, row_width, value_width)
}

/// Project file referencing model files by extension (`g01`, `p01`, ...).
pub fn project_file(title: &str, units: &str, files: &[&str]) -> String {
    let mut lines = vec![format!("Proj Title={}", title)];
    if let Some(plan) = files.iter().find(|f| f.starts_with('p')) {
        lines.push(format!("Current Plan={}", plan));
    }
    lines.push("Default Exp/Contr=0.3,0.1".to_string());
    lines.push(units.to_string());
    for file in files {
        let key = match file.chars().next() {
            Some('g') => "Geom File",
            Some('p') => "Plan File",
            Some('f') => "Flow File",
            Some('u') => "Unsteady File",
            Some('q') => "QuasiSteady File",
            _ => continue,
        };
        lines.push(format!("{}={}", key, file));
    }
    lines.push("BEGIN DESCRIPTION:".to_string());
    lines.push(format!("{} test model", title));
    lines.push("END DESCRIPTION:".to_string());
    lines.join("\r\n") + "\r\n"
}

/// Plan file referencing one geometry and one flow file.
pub fn plan_file(title: &str, short_id: &str, version: &str, geom: &str, flow: &str) -> String {
    format!(
        "Plan Title={}\nProgram Version={}\nShort Identifier={}\nSimulation Date=01JAN2000,0000,02JAN2000,0000\nGeom File={}\nFlow File={}\nBEGIN DESCRIPTION:\n{} plan\nEND DESCRIPTION:\nSubcritical Flow\nComputation Interval=1MIN\n",
        title, version, short_id, geom, flow, title
    )
}

/// Steady flow file with one flow change location on `river`/`reach` and a
/// downstream normal depth boundary for every profile.
pub fn steady_flow_file(title: &str, version: &str, river: &str, reach: &str, flows: &[f64]) -> String {
    let names: Vec<String> = (1..=flows.len()).map(|i| format!("PF {}", i)).collect();
    let mut lines = vec![
        format!("Flow Title={}", title),
        format!("Program Version={}", version),
        format!("Number of Profiles= {}", flows.len()),
        format!("Profile Names={}", names.join(",")),
        format!("River Rch & RM={},{},15696.24", river, reach),
        fixed_width_values(flows, 80, 8),
    ];
    for profile in 1..=flows.len() {
        lines.push(format!("Boundary for River Rch & Prof#={},{}, {}", river, reach, profile));
        lines.push("Up Type= 0".to_string());
        lines.push("Dn Type= 3".to_string());
        lines.push("Dn Slope=0.0005".to_string());
    }
    lines.push("DSS Import StartDate=".to_string());
    lines.join("\n") + "\n"
}

/// Unsteady flow file with an upstream flow hydrograph and a downstream
/// normal depth boundary on `river`/`reach`.
pub fn unsteady_flow_file(
    title: &str,
    version: &str,
    river: &str,
    reach: &str,
    hydrograph: &[f64],
) -> String {
    [
        format!("Flow Title={}", title),
        format!("Program Version={}", version),
        "Use Restart= 0".to_string(),
        format!("Boundary Location={},{},15696.24,,,,,", river, reach),
        "Interval=1HOUR".to_string(),
        format!("Flow Hydrograph= {}", hydrograph.len()),
        fixed_width_values(hydrograph, 80, 8),
        "Stage Hydrograph TW Check=0".to_string(),
        format!("Boundary Location={},{},237.6,,,,,", river, reach),
        "Friction Slope=0.0003,0".to_string(),
    ]
    .join("\n")
        + "\n"
}

/// Bridge deck and chord data written by [`GeometryBuilder::bridge`].
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSpec {
    pub name: String,
    pub station: f64,
    pub description: String,
    pub deck_width: f64,
    pub up_high_chord: Vec<f64>,
    pub up_low_chord: Vec<f64>,
    pub down_high_chord: Vec<f64>,
    pub down_low_chord: Vec<f64>,
    pub num_piers: usize,
}

impl BridgeSpec {
    /// Bridge with `points` deck points per side; high chords rise from 950,
    /// low chords fall from 940.
    pub fn with_deck_points(name: &str, station: f64, points: usize) -> Self {
        let high: Vec<f64> = (0..points).map(|i| 950.0 + i as f64 * 0.5).collect();
        let low: Vec<f64> = (0..points).map(|i| 940.0 - i as f64 * 0.5).collect();
        Self {
            name: name.to_string(),
            station,
            description: format!("{} crossing", name),
            deck_width: 42.5,
            up_high_chord: high.clone(),
            up_low_chord: low.clone(),
            down_high_chord: high,
            down_low_chord: low,
            num_piers: 2,
        }
    }
}

/// Builds geometry files section by section.
///
/// # Example
///
/// ```
/// use test_utils::GeometryBuilder;
///
/// let text = GeometryBuilder::new("Existing")
///     .river("White", "Muncie", &[[0.0, 0.0], [100.0, 100.0]])
///     .culvert("900")
///     .build();
/// assert!(text.starts_with("Geom Title=Existing"));
/// assert!(text.contains("Type RM Length L Ch R = 2 ,900"));
/// ```
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    title: String,
    version: String,
    description: Option<String>,
    body: Vec<String>,
}

impl GeometryBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            version: "5.07".to_string(),
            description: None,
            body: Vec::new(),
        }
    }

    pub fn program_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// River reach with its centerline.
    pub fn river(mut self, river: &str, reach: &str, centerline: &[[f64; 2]]) -> Self {
        self.body.push(format!("River Reach={:<16},{:<16}", river, reach));
        self.body.push(format!("Reach XY= {} ", centerline.len()));
        self.body.push(fixed_width_pairs(centerline, 64, 16));
        self.body.push("Rch Text X Y=0,0".to_string());
        self
    }

    /// Cross section with a GIS cut line, station/elevation survey and
    /// optional bank stations.
    pub fn cross_section(
        mut self,
        station: &str,
        cut_line: &[[f64; 2]],
        station_elevation: &[[f64; 2]],
        banks: Option<[f64; 2]>,
    ) -> Self {
        self.body.push(structure_line(1, station));
        self.body.push("Node Last Edited Time=Jan/01/2020 00:00:00".to_string());
        self.body.push(format!("XS GIS Cut Line={}", cut_line.len()));
        self.body.push(fixed_width_pairs(cut_line, 64, 16));
        self.body.push(format!("#Sta/Elev= {} ", station_elevation.len()));
        self.body.push(fixed_width_pairs(station_elevation, 80, 8));
        self.body.push("#Mann= 3 , 0 , 0 ".to_string());
        if let Some([left, right]) = banks {
            self.body.push(format!("Bank Sta={},{}", left, right));
        }
        self
    }

    pub fn culvert(mut self, station: &str) -> Self {
        self.body.push(structure_line(2, station));
        self.body.push("Culvert=2,6,6,40,0.013,0.5,1,1,0,0,940,940,Culvert #1".to_string());
        self
    }

    pub fn inline_structure(mut self, station: &str) -> Self {
        self.body.push(structure_line(5, station));
        self.body.push("IW Dist,WD,Coef,Skew,MaxSub,Min_El,Is_Ogee=0,20,2.6,0,.95,0,0".to_string());
        self
    }

    pub fn bridge(mut self, spec: &BridgeSpec) -> Self {
        let stations = |n: usize| -> Vec<f64> { (0..n).map(|i| i as f64 * 10.0).collect() };
        let up = spec.up_high_chord.len();
        let down = spec.down_high_chord.len();

        self.body.push(structure_line(3, &spec.station.to_string()));
        self.body.push("BEGIN DESCRIPTION:".to_string());
        self.body.push(spec.description.clone());
        self.body.push("END DESCRIPTION:".to_string());
        self.body.push(format!("Node Name={}", spec.name));
        self.body.push(
            "Deck Dist Width WeirC Skew NumUp NumDn MinLoCord MaxHiCord MaxSubmerge Is_Ogee"
                .to_string(),
        );
        self.body.push(format!("10,{},2.6,0,{},{},0,0,.95,0", spec.deck_width, up, down));
        for block in [
            stations(up),
            spec.up_high_chord.clone(),
            spec.up_low_chord.clone(),
            stations(down),
            spec.down_high_chord.clone(),
            spec.down_low_chord.clone(),
        ] {
            if !block.is_empty() {
                self.body.push(fixed_width_values(&block, 80, 8));
            }
        }
        for i in 0..spec.num_piers {
            let at = 100.0 * (i + 1) as f64;
            self.body.push(format!(
                "Pier Skew, UpSta & Num, DnSta & Num=0,{},2,{},2",
                at, at
            ));
        }
        self.body.push("BR Coef=0,0.95,0,0,1.25,0,0".to_string());
        self
    }

    /// Storage area with its outline ring.
    pub fn storage_area(mut self, name: &str, outline: &[[f64; 2]]) -> Self {
        self.body.push(format!("Storage Area={:<16},,", name));
        self.body.push(format!("Storage Area Surface Line= {} ", outline.len()));
        self.body.push(fixed_width_pairs(outline, 32, 16));
        self.body.push("Storage Area Type= 1 ".to_string());
        self
    }

    /// Append a raw line, e.g. to corrupt a file.
    pub fn line(mut self, raw: &str) -> Self {
        self.body.push(raw.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut lines = vec![
            format!("Geom Title={}", self.title),
            format!("Program Version={}", self.version),
        ];
        if let Some(description) = &self.description {
            lines.push("BEGIN GEOM DESCRIPTION:".to_string());
            lines.push(description.clone());
            lines.push("END GEOM DESCRIPTION:".to_string());
        }
        lines.push("Viewing Rectangle= 0 , 1 , 1 , 0 ".to_string());
        lines.push(String::new());
        lines.extend(self.body.iter().cloned());
        lines.push(String::new());
        lines.push("LCMann Time=Dec/30/1899 00:00:00".to_string());
        lines.join("\n") + "\n"
    }
}

fn structure_line(kind: u32, station: &str) -> String {
    format!("Type RM Length L Ch R = {} ,{:<8},100,100,100", kind, station)
}
