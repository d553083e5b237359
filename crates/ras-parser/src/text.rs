//! Line-oriented reading of HEC-RAS text files.
//!
//! HEC-RAS files mix `Key=value` lines with fixed-width numeric blocks: a
//! count line such as `#Sta/Elev= 12` is followed by rows of right-aligned
//! values, each `value_width` characters wide and at most `row_width`
//! characters per row.

use ras_common::{RasError, RasResult};

/// Forward-only cursor over the lines of a file that remembers where it is,
/// so format errors can name the offending line.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    path: &'a str,
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(path: &'a str, text: &'a str) -> Self {
        Self {
            path,
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Consume and return the next line.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// One-based number of the line most recently returned by `next`.
    pub fn line_number(&self) -> usize {
        self.pos
    }

    /// Format error pointing at the current line.
    pub fn error(&self, message: impl Into<String>) -> RasError {
        RasError::format(self.path, self.line_number(), message)
    }

    /// Next line, or a format error naming what was expected.
    pub fn expect_line(&mut self, what: &str) -> RasResult<&'a str> {
        match self.next() {
            Some(line) => Ok(line),
            None => Err(self.error(format!("unexpected end of file, expected {}", what))),
        }
    }

    /// Advance to the next line starting with `marker`, without passing a line
    /// that starts with any of `stops`. Returns the marker line.
    pub fn seek(&mut self, marker: &str, stops: &[&str]) -> Option<&'a str> {
        while let Some(line) = self.peek() {
            if line.starts_with(marker) {
                self.pos += 1;
                return Some(line);
            }
            if stops.iter().any(|s| line.starts_with(s)) {
                return None;
            }
            self.pos += 1;
        }
        None
    }

    /// Read a description block up to (and consuming) the line containing
    /// `end_marker`. Blank lines are dropped; the rest are newline-joined.
    pub fn read_description(&mut self, end_marker: &str) -> String {
        let mut kept = Vec::new();
        while let Some(line) = self.next() {
            if line.contains(end_marker) {
                break;
            }
            if !line.is_empty() {
                kept.push(line);
            }
        }
        kept.join("\n")
    }

    /// Skip `n` lines, failing if the file ends first.
    pub fn skip(&mut self, n: usize, what: &str) -> RasResult<()> {
        for _ in 0..n {
            self.expect_line(what)?;
        }
        Ok(())
    }

    /// Read `count` values laid out `row_width / value_width` to a row.
    /// Blank fields are skipped.
    pub fn values_block(
        &mut self,
        count: usize,
        row_width: usize,
        value_width: usize,
        what: &str,
    ) -> RasResult<Vec<f64>> {
        let rows = number_of_lines(count, row_width, value_width);
        let mut values = Vec::with_capacity(count);
        for _ in 0..rows {
            let line = self.expect_line(what)?;
            let mut start = 0;
            while start < row_width && values.len() < count {
                let Some(raw) = field(line, start, value_width) else {
                    break;
                };
                let raw = raw.trim();
                if !raw.is_empty() {
                    values.push(self.parse_f64(raw, what)?);
                }
                start += value_width;
            }
        }
        Ok(values)
    }

    /// Read `count` (a, b) pairs, two fields of `value_width` per pair.
    pub fn pairs_block(
        &mut self,
        count: usize,
        row_width: usize,
        value_width: usize,
        what: &str,
    ) -> RasResult<Vec<[f64; 2]>> {
        let stride = value_width * 2;
        let mut pairs = Vec::with_capacity(count);
        while pairs.len() < count {
            let line = self.expect_line(what)?;
            let mut start = 0;
            while start < row_width && pairs.len() < count {
                let Some(first) = field(line, start, value_width) else {
                    break;
                };
                let second = field(line, start + value_width, value_width).unwrap_or("");
                pairs.push([
                    self.parse_f64(first.trim(), what)?,
                    self.parse_f64(second.trim(), what)?,
                ]);
                start += stride;
            }
        }
        Ok(pairs)
    }

    /// Find a count line (`marker= n`) and read the pair block that follows.
    pub fn seek_pairs(
        &mut self,
        marker: &str,
        stops: &[&str],
        row_width: usize,
        value_width: usize,
    ) -> RasResult<Option<Vec<[f64; 2]>>> {
        let Some(line) = self.seek(marker, stops) else {
            return Ok(None);
        };
        let count = self.parse_count(right_of_equals(line), marker)?;
        self.pairs_block(count, row_width, value_width, marker).map(Some)
    }

    pub fn parse_f64(&self, raw: &str, what: &str) -> RasResult<f64> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| self.error(format!("invalid number '{}' in {}", raw, what)))
    }

    pub fn parse_count(&self, raw: &str, what: &str) -> RasResult<usize> {
        raw.trim()
            .parse::<usize>()
            .map_err(|_| self.error(format!("invalid count '{}' for {}", raw, what)))
    }
}

/// Value after the first `=`, trimmed. Empty when the line has no `=`.
pub fn right_of_equals(line: &str) -> &str {
    line.split_once('=').map(|(_, v)| v.trim()).unwrap_or("")
}

/// Comma-separated fields after the `=`, trimmed.
pub fn csv_after_equals(line: &str) -> Vec<&str> {
    line.split_once('=')
        .map(|(_, v)| v.split(',').map(str::trim).collect())
        .unwrap_or_default()
}

/// Rows needed for `count` values at `row_width / value_width` per row.
pub fn number_of_lines(count: usize, row_width: usize, value_width: usize) -> usize {
    let per_row = (row_width / value_width).max(1);
    count.div_ceil(per_row)
}

/// Fixed-width field starting at `start`; the last field of a short row may
/// be narrower. `None` once `start` is past the end of the line.
fn field(line: &str, start: usize, width: usize) -> Option<&str> {
    if start >= line.len() {
        return None;
    }
    let end = (start + width).min(line.len());
    line.get(start..end)
}
