//! Grade line parser: OCR text → ordered [`GradeSet`].
//!
//! Each trimmed line passes through two small classifiers:
//!
//! 1. [`is_header_line`] rejects table headers and decorative rows even when
//!    they happen to contain a `n/m` token.
//! 2. [`match_grade`] looks for `achieved/total`, optionally followed by a
//!    percentage, anywhere in the line.
//!
//! [`classify_line`] combines them into a [`LineClass`]. Lines that match
//! nothing are dropped silently: gradebook layouts vary too much to guess at
//! partial rows, so precision wins over recall.

use crate::model::{GradeRecord, GradeSet};
use crate::pipeline::lines::split_lines;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Substrings marking header and noise rows.
pub const HEADER_MARKERS: [&str; 4] = ["Grade tem", "Points", "Comments", "Grades -"];

/// `achieved/total`, then optional whitespace and an optional `NN%`.
static RE_GRADE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)/([0-9]+)\s*(?:[0-9]+%)?").unwrap());

/// Why a line was skipped before or after matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    Header,
    /// The score matched but its total is zero.
    ZeroTotal,
}

/// Outcome of classifying one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    Skip(SkipReason),
    NoMatch,
    Record(GradeRecord),
}

/// A score token found in a line.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeMatch<'a> {
    pub achieved: f64,
    pub total: f64,
    /// The full matched text, including any trailing percentage.
    pub token: &'a str,
}

/// True when the line contains any of [`HEADER_MARKERS`].
pub fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Find the first `achieved/total` token in the line.
pub fn match_grade(line: &str) -> Option<GradeMatch<'_>> {
    let caps = RE_GRADE.captures(line)?;
    let achieved = caps[1].parse::<f64>().ok()?;
    let total = caps[2].parse::<f64>().ok()?;
    let token = caps.get(0)?.as_str();
    Some(GradeMatch {
        achieved,
        total,
        token,
    })
}

/// Classify a single raw line.
pub fn classify_line(line: &str) -> LineClass {
    let line = line.trim();
    if line.is_empty() {
        return LineClass::Skip(SkipReason::Empty);
    }
    if is_header_line(line) {
        return LineClass::Skip(SkipReason::Header);
    }
    let Some(found) = match_grade(line) else {
        return LineClass::NoMatch;
    };
    if found.total <= 0.0 {
        return LineClass::Skip(SkipReason::ZeroTotal);
    }
    let item = line.replace(found.token, "").trim().to_string();
    LineClass::Record(GradeRecord::new(item, found.achieved, found.total))
}

/// Parse every line of the document text into a [`GradeSet`].
///
/// An empty result is a normal outcome; callers decide how to report it.
pub fn extract_grades(text: &str) -> GradeSet {
    let mut grades = GradeSet::new();

    for (i, line) in split_lines(text).enumerate() {
        match classify_line(line) {
            LineClass::Record(record) => {
                debug!(
                    "Line {}: item={:?} achieved={} total={}",
                    i, record.item, record.achieved, record.total
                );
                grades.push(record);
            }
            LineClass::Skip(SkipReason::Empty) => {}
            LineClass::Skip(reason) => debug!("Line {}: skipped ({:?}): {:?}", i, reason, line.trim()),
            LineClass::NoMatch => debug!("Line {}: no score: {:?}", i, line.trim()),
        }
    }

    if grades.is_empty() {
        warn!("No grade rows found in {} lines of text", split_lines(text).count());
    } else {
        debug!("Extracted {} grade records", grades.len());
    }
    grades
}
