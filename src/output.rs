//! Result types returned by the gradescan pipeline.

use crate::model::{CourseTitle, GradeSet, SectionSummary};
use serde::{Deserialize, Serialize};

/// Concatenated OCR text of a document and how it was obtained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Every selected page's cleaned text, each followed by `\n`.
    pub text: String,
    pub stats: ExtractionStats,
}

/// Counters and timings of the text extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the PDF (0 when text did not come from a PDF).
    pub document_pages: usize,
    /// Pages chosen by the page selection.
    pub selected_pages: usize,
    /// Pages rendered and recognised.
    pub processed_pages: usize,
    /// Characters of concatenated text.
    pub characters: usize,
    pub render_duration_ms: u64,
    pub ocr_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// A graded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    pub course_title: CourseTitle,
    /// Parsed records in order of appearance. Never empty.
    pub grades: GradeSet,
    pub sections: Vec<SectionSummary>,
    /// Overall percentage, rounded to two decimals, not clamped.
    pub overall_grade: f64,
    pub stats: ExtractionStats,
}

impl GradeReport {
    /// Overall grade as shown to users, e.g. `90.00%`.
    pub fn overall_grade_display(&self) -> String {
        format!("{:.2}%", self.overall_grade)
    }
}

/// Result of grading one document.
///
/// `NoGrades` is the empty-result condition: the document was read but no
/// line looked like a score. It is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GradeOutcome {
    Graded(GradeReport),
    NoGrades {
        course_title: CourseTitle,
        stats: ExtractionStats,
    },
}

impl GradeOutcome {
    pub fn report(&self) -> Option<&GradeReport> {
        match self {
            GradeOutcome::Graded(report) => Some(report),
            GradeOutcome::NoGrades { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<GradeReport> {
        match self {
            GradeOutcome::Graded(report) => Some(report),
            GradeOutcome::NoGrades { .. } => None,
        }
    }

    pub fn course_title(&self) -> &CourseTitle {
        match self {
            GradeOutcome::Graded(report) => &report.course_title,
            GradeOutcome::NoGrades { course_title, .. } => course_title,
        }
    }

    pub fn stats(&self) -> &ExtractionStats {
        match self {
            GradeOutcome::Graded(report) => &report.stats,
            GradeOutcome::NoGrades { stats, .. } => stats,
        }
    }
}
