//! Gradebook data model: records, the ordered record set, and the course title.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Section assigned to every parsed record.
///
/// The line parser never discovers section markers, so all records share
/// this one section and the aggregator's weighted branch degenerates to the
/// plain ratio.
pub const DEFAULT_SECTION: &str = "All Grades";

/// Weight assigned to every parsed record (0–100 scale).
pub const DEFAULT_WEIGHT: f64 = 100.0;

/// Sentinel title when no course code is found.
pub const UNKNOWN_COURSE: &str = "Unknown Course";

/// One parsed gradebook line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    /// Grouping label used for weighting.
    pub section: String,
    /// Assignment name: the line text left after the score was removed.
    pub item: String,
    /// Points earned. May exceed `total`.
    pub achieved: f64,
    /// Points possible. Always `> 0` inside a [`GradeSet`].
    pub total: f64,
    /// Section weight on a 0–100 scale; `None` when no weight is known.
    pub weight: Option<f64>,
}

impl GradeRecord {
    /// A record in the default section with the default weight.
    pub fn new(item: impl Into<String>, achieved: f64, total: f64) -> Self {
        Self {
            section: DEFAULT_SECTION.to_string(),
            item: item.into(),
            achieved,
            total,
            weight: Some(DEFAULT_WEIGHT),
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_weight(mut self, weight: Option<f64>) -> Self {
        self.weight = weight;
        self
    }

    /// Percentage of this single record, e.g. `90.0` for 18/20.
    pub fn percentage(&self) -> f64 {
        (self.achieved / self.total) * 100.0
    }
}

/// Ordered records of one document, in order of appearance.
///
/// Records with a non-positive or non-finite `total` are refused on insert
/// and on deserialization, so aggregation never divides by zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<GradeRecord>", try_from = "Vec<GradeRecord>")]
pub struct GradeSet {
    records: Vec<GradeRecord>,
}

impl GradeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Returns `false` (and drops it) when `total <= 0`.
    pub fn push(&mut self, record: GradeRecord) -> bool {
        if !has_valid_total(&record) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[GradeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GradeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of `achieved` across all records.
    pub fn total_achieved(&self) -> f64 {
        self.records.iter().map(|r| r.achieved).sum()
    }

    /// Sum of `total` across all records.
    pub fn total_possible(&self) -> f64 {
        self.records.iter().map(|r| r.total).sum()
    }
}

impl FromIterator<GradeRecord> for GradeSet {
    fn from_iter<I: IntoIterator<Item = GradeRecord>>(iter: I) -> Self {
        let mut set = GradeSet::new();
        for record in iter {
            set.push(record);
        }
        set
    }
}

fn has_valid_total(record: &GradeRecord) -> bool {
    record.total > 0.0 && record.total.is_finite()
}

impl TryFrom<Vec<GradeRecord>> for GradeSet {
    type Error = String;

    fn try_from(records: Vec<GradeRecord>) -> Result<Self, Self::Error> {
        if let Some(bad) = records.iter().find(|r| !has_valid_total(r)) {
            return Err(format!(
                "grade record {:?} has total {}, expected a positive finite number",
                bad.item, bad.total
            ));
        }
        Ok(Self { records })
    }
}

impl From<GradeSet> for Vec<GradeRecord> {
    fn from(set: GradeSet) -> Self {
        set.records
    }
}

impl<'a> IntoIterator for &'a GradeSet {
    type Item = &'a GradeRecord;
    type IntoIter = std::slice::Iter<'a, GradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Per-section totals, derived from a [`GradeSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub section: String,
    pub achieved: f64,
    pub total: f64,
    /// Weight of the first record encountered in the section.
    pub weight: Option<f64>,
    /// `100 * achieved / total`; `None` when the section has no points possible.
    pub percentage: Option<f64>,
}

/// Normalised course title, or the "Unknown Course" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CourseTitle {
    Known(String),
    Unknown,
}

impl CourseTitle {
    pub fn is_unknown(&self) -> bool {
        matches!(self, CourseTitle::Unknown)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CourseTitle::Known(title) => title,
            CourseTitle::Unknown => UNKNOWN_COURSE,
        }
    }
}

impl fmt::Display for CourseTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CourseTitle> for String {
    fn from(title: CourseTitle) -> Self {
        title.as_str().to_string()
    }
}

impl From<String> for CourseTitle {
    fn from(s: String) -> Self {
        if s == UNKNOWN_COURSE {
            CourseTitle::Unknown
        } else {
            CourseTitle::Known(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialization_keeps_the_total_invariant() {
        let ok: GradeSet =
            serde_json::from_str(r#"[{"section":"All Grades","item":"Quiz 1","achieved":9.0,"total":10.0,"weight":100.0}]"#)
                .unwrap();
        assert_eq!(ok.len(), 1);
        assert_eq!(serde_json::to_value(&ok).unwrap().as_array().unwrap().len(), 1);

        let err = serde_json::from_str::<GradeSet>(
            r#"[{"section":"All Grades","item":"Dropped","achieved":1.0,"total":0.0,"weight":null}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Dropped"), "got: {err}");
    }

    #[test]
    fn push_refuses_non_positive_totals() {
        let mut set = GradeSet::new();
        assert!(set.push(GradeRecord::new("Homework 1", 18.0, 20.0)));
        assert!(!set.push(GradeRecord::new("Bonus", 5.0, 0.0)));
        assert!(!set.push(GradeRecord::new("Broken", 1.0, -4.0)));
        assert!(!set.push(GradeRecord::new("NaN", 1.0, f64::NAN)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn achieved_above_total_is_kept() {
        let set: GradeSet = vec![GradeRecord::new("Extra credit", 22.0, 20.0)]
            .into_iter()
            .collect();
        assert_eq!(set.records()[0].achieved, 22.0);
        assert!((set.records()[0].percentage() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn new_record_uses_defaults() {
        let r = GradeRecord::new("Quiz 1", 9.0, 10.0);
        assert_eq!(r.section, DEFAULT_SECTION);
        assert_eq!(r.weight, Some(DEFAULT_WEIGHT));
    }

    #[test]
    fn course_title_serialises_as_string() {
        let json = serde_json::to_string(&CourseTitle::Unknown).unwrap();
        assert_eq!(json, "\"Unknown Course\"");
        let back: CourseTitle = serde_json::from_str("\"MIS-353-01 Fall\"").unwrap();
        assert_eq!(back, CourseTitle::Known("MIS-353-01 Fall".into()));
    }
}
