//! Well-known text (WKT1) parsing.
//!
//! HEC-RAS projection files are usually written by ArcGIS, so the text is
//! often in the ESRI dialect (`D_` datum prefixes, `Lambert_Conformal_Conic`
//! without the 1SP/2SP suffix, `Foot_US` units). [`morph_from_esri`] rewrites
//! a parsed tree into the OGC spelling before it is interpreted.

use std::fmt;

use ras_common::{RasError, RasResult};

/// A keyword node such as `PROJCS["name", ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WktNode {
    pub keyword: String,
    pub values: Vec<WktValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WktValue {
    /// Quoted string
    Text(String),
    Number(f64),
    /// Bare word that is not a number (axis directions like `NORTH`)
    Ident(String),
    Node(WktNode),
}

impl WktNode {
    /// First child node with the given keyword (case-insensitive).
    pub fn child(&self, keyword: &str) -> Option<&WktNode> {
        self.values.iter().find_map(|v| match v {
            WktValue::Node(n) if n.keyword.eq_ignore_ascii_case(keyword) => Some(n),
            _ => None,
        })
    }

    pub fn children<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a WktNode> + 'a {
        self.values.iter().filter_map(move |v| match v {
            WktValue::Node(n) if n.keyword.eq_ignore_ascii_case(keyword) => Some(n),
            _ => None,
        })
    }

    fn children_mut(&mut self) -> impl Iterator<Item = &mut WktNode> {
        self.values.iter_mut().filter_map(|v| match v {
            WktValue::Node(n) => Some(n),
            _ => None,
        })
    }

    /// The node's name: its first quoted argument.
    pub fn name(&self) -> Option<&str> {
        match self.values.first() {
            Some(WktValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn set_name(&mut self, name: impl Into<String>) {
        if let Some(first @ WktValue::Text(_)) = self.values.first_mut() {
            *first = WktValue::Text(name.into());
        }
    }

    /// Numeric argument at `index` (counting the name as index 0).
    pub fn number(&self, index: usize) -> Option<f64> {
        match self.values.get(index) {
            Some(WktValue::Number(n)) => Some(*n),
            Some(WktValue::Text(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for WktNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.keyword)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match value {
                WktValue::Text(s) => write!(f, "\"{}\"", s.replace('"', "\"\""))?,
                WktValue::Number(n) => write!(f, "{}", n)?,
                WktValue::Ident(s) => write!(f, "{}", s)?,
                WktValue::Node(n) => write!(f, "{}", n)?,
            }
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Comma,
    Text(String),
    Word(String),
}

fn tokenize(input: &str) -> RasResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '[' | '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ']' | ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        // A doubled quote is an escaped quote
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                            text.push('"');
                        }
                        Some('"') => break,
                        Some(ch) => text.push(ch),
                        None => {
                            return Err(RasError::InvalidProjection(
                                "unterminated string in WKT".to_string(),
                            ))
                        }
                    }
                }
                tokens.push(Token::Text(text));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || "[](),\"".contains(ch) {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, message: &str) -> RasError {
        RasError::InvalidProjection(format!("WKT token {}: {}", self.pos, message))
    }

    fn node(&mut self) -> RasResult<WktNode> {
        let keyword = match self.next() {
            Some(Token::Word(w)) => w,
            _ => return Err(self.error("expected keyword")),
        };
        if self.next() != Some(Token::Open) {
            return Err(self.error(&format!("expected '[' after {}", keyword)));
        }

        let mut values = Vec::new();
        loop {
            if self.peek() == Some(&Token::Close) {
                self.next();
                break;
            }
            values.push(self.value()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::Close) => break,
                _ => return Err(self.error(&format!("unterminated {}", keyword))),
            }
        }

        Ok(WktNode { keyword, values })
    }

    fn value(&mut self) -> RasResult<WktValue> {
        match self.peek().cloned() {
            Some(Token::Text(s)) => {
                self.next();
                Ok(WktValue::Text(s))
            }
            Some(Token::Word(w)) => {
                if self.tokens.get(self.pos + 1) == Some(&Token::Open) {
                    return Ok(WktValue::Node(self.node()?));
                }
                self.next();
                Ok(match w.parse::<f64>() {
                    Ok(n) => WktValue::Number(n),
                    Err(_) => WktValue::Ident(w),
                })
            }
            _ => Err(self.error("expected value")),
        }
    }
}

/// Parse WKT text into a node tree.
pub fn parse(input: &str) -> RasResult<WktNode> {
    let tokens = tokenize(input.trim())?;
    if tokens.is_empty() {
        return Err(RasError::InvalidProjection("empty WKT".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.node()?;
    if parser.peek().is_some() {
        return Err(parser.error("trailing content after WKT"));
    }
    Ok(node)
}

/// Rewrite ESRI-dialect names into their OGC equivalents.
///
/// OGC input passes through unchanged, so this is safe to apply to every
/// projection file before interpretation.
pub fn morph_from_esri(mut root: WktNode) -> WktNode {
    morph_node(&mut root);
    if root.keyword.eq_ignore_ascii_case("PROJCS") {
        morph_projection_name(&mut root);
    }
    root
}

fn morph_node(node: &mut WktNode) {
    match node.keyword.to_ascii_uppercase().as_str() {
        "DATUM" => {
            if let Some(name) = node.name().map(str::to_string) {
                node.set_name(esri_datum_name(&name));
            }
        }
        "UNIT" => {
            if let Some(name) = node.name().map(str::to_string) {
                node.set_name(esri_unit_name(&name));
            }
        }
        "PARAMETER" => {
            if let Some(name) = node.name().map(str::to_string) {
                node.set_name(name.to_ascii_lowercase());
            }
        }
        _ => {}
    }
    for child in node.children_mut() {
        morph_node(child);
    }
}

fn esri_datum_name(name: &str) -> String {
    let stripped = name.strip_prefix("D_").unwrap_or(name);
    match stripped {
        "North_American_1983" => "North_American_Datum_1983".to_string(),
        "North_American_1927" => "North_American_Datum_1927".to_string(),
        other => other.to_string(),
    }
}

fn esri_unit_name(name: &str) -> String {
    match name {
        "Foot_US" => "US survey foot".to_string(),
        "Foot" => "foot".to_string(),
        "Meter" => "metre".to_string(),
        "Degree" => "degree".to_string(),
        other => other.to_string(),
    }
}

/// ESRI leaves the variant off projection names that OGC splits in two.
fn morph_projection_name(projcs: &mut WktNode) {
    let has_param = |root: &WktNode, name: &str| {
        root.children("PARAMETER")
            .any(|p| p.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    };
    let has_sp1 = has_param(projcs, "standard_parallel_1");
    let has_sp2 = has_param(projcs, "standard_parallel_2");

    for child in projcs.children_mut() {
        if !child.keyword.eq_ignore_ascii_case("PROJECTION") {
            continue;
        }
        let Some(name) = child.name().map(str::to_string) else {
            continue;
        };
        let renamed = match name.as_str() {
            "Lambert_Conformal_Conic" if has_sp2 => "Lambert_Conformal_Conic_2SP",
            "Lambert_Conformal_Conic" => "Lambert_Conformal_Conic_1SP",
            "Mercator" if has_sp1 => "Mercator_2SP",
            "Mercator" => "Mercator_1SP",
            "Albers" => "Albers_Conic_Equal_Area",
            "Gauss_Kruger" => "Transverse_Mercator",
            _ => continue,
        };
        child.set_name(renamed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESRI_INDIANA_EAST: &str = r#"PROJCS["NAD_1983_StatePlane_Indiana_East_FIPS_1301_Feet",GEOGCS["GCS_North_American_1983",DATUM["D_North_American_1983",SPHEROID["GRS_1980",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",328083.3333333333],PARAMETER["False_Northing",820208.3333333333],PARAMETER["Central_Meridian",-85.66666666666667],PARAMETER["Scale_Factor",0.9999666666666667],PARAMETER["Latitude_Of_Origin",37.5],UNIT["Foot_US",0.3048006096012192]]"#;

    #[test]
    fn test_parse_tree() {
        let root = parse(ESRI_INDIANA_EAST).unwrap();
        assert_eq!(root.keyword, "PROJCS");
        assert_eq!(root.name(), Some("NAD_1983_StatePlane_Indiana_East_FIPS_1301_Feet"));

        let spheroid = root.child("GEOGCS").and_then(|g| g.child("DATUM")).and_then(|d| d.child("SPHEROID")).unwrap();
        assert_eq!(spheroid.number(1), Some(6378137.0));
        assert_eq!(root.children("PARAMETER").count(), 5);
    }

    #[test]
    fn test_child_outlives_keyword() {
        let root = parse(ESRI_INDIANA_EAST).unwrap();
        let unit = {
            let keyword = "unit".to_string();
            root.child(&keyword)
        };
        assert_eq!(unit.and_then(|u| u.name()), Some("Foot_US"));
        assert!(root.child("VERTCS").is_none());
    }

    #[test]
    fn test_parse_accepts_parentheses_and_idents() {
        let root = parse(r#"GEOGCS("x",AXIS["Lat",NORTH])"#).unwrap();
        let axis = root.child("AXIS").unwrap();
        assert_eq!(axis.values[1], WktValue::Ident("NORTH".to_string()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("PROJCS[\"a\"").is_err());
        assert!(parse("PROJCS[\"a\"]]").is_err());
        assert!(parse("not wkt at all").is_err());
    }

    #[test]
    fn test_morph_from_esri() {
        let root = morph_from_esri(parse(ESRI_INDIANA_EAST).unwrap());
        let datum = root.child("GEOGCS").and_then(|g| g.child("DATUM")).unwrap();
        assert_eq!(datum.name(), Some("North_American_Datum_1983"));

        let unit = root.child("UNIT").unwrap();
        assert_eq!(unit.name(), Some("US survey foot"));
        assert!(root
            .children("PARAMETER")
            .any(|p| p.name() == Some("central_meridian")));
    }

    #[test]
    fn test_morph_lambert_variant() {
        let wkt = r#"PROJCS["x",GEOGCS["g",DATUM["D_North_American_1983",SPHEROID["GRS_1980",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic"],PARAMETER["Standard_Parallel_1",38.3],PARAMETER["Standard_Parallel_2",39.45],UNIT["Meter",1.0]]"#;
        let root = morph_from_esri(parse(wkt).unwrap());
        assert_eq!(
            root.child("PROJECTION").and_then(|p| p.name()),
            Some("Lambert_Conformal_Conic_2SP")
        );
    }

    #[test]
    fn test_display_reparses() {
        let root = parse(ESRI_INDIANA_EAST).unwrap();
        let again = parse(&root.to_string()).unwrap();
        assert_eq!(root, again);
    }
}
