//! # gradescan
//!
//! Read a scanned or exported course gradebook PDF, recognise its text with
//! OCR, pick out every `achieved/total` score line and compute the overall
//! course grade.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file, URL download, or in-memory bytes
//!  ├─ 2. Render   rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. OCR      tesseract per page, cleaned and concatenated
//!  ├─ 4. Title    first line starting with a course code (XX-000-00)
//!  ├─ 5. Parse    one record per score line, header lines skipped
//!  ├─ 6. Grade    weighted / unweighted percentage, two decimals
//!  └─ 7. Output   table, rendered summary, optional .xlsx
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gradescan::{grade, render_summary, GradeOutcome, GradescanConfig, TableStyle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GradescanConfig::default();
//!     match grade("gradebook.pdf", &config).await? {
//!         GradeOutcome::Graded(report) => {
//!             println!("{}", render_summary(&report, TableStyle::Terminal));
//!         }
//!         GradeOutcome::NoGrades { .. } => eprintln!("No grades found in the PDF"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Text that was already extracted can be graded without pdfium or tesseract:
//!
//! ```rust
//! use gradescan::{analyse_text, ExtractionStats};
//!
//! let text = "MIS-353-01 Fall\nHomework 1 18/20\nGrades - Header\nQuiz 1 9/10 90%\n";
//! let outcome = analyse_text(text, ExtractionStats::default());
//! let report = outcome.report().unwrap();
//! assert_eq!(report.overall_grade_display(), "90.00%");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gradescan` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Runtime requirements
//!
//! A pdfium shared library (system path or `PDFIUM_LIB_PATH`) and the
//! `tesseract` executable, unless an [`OcrEngine`] is injected.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod grade;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod spreadsheet;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GradescanConfig, GradescanConfigBuilder, PageSelection};
pub use error::GradescanError;
pub use grade::{
    analyse_text, extract_text, grade, grade_from_bytes, grade_sync, grade_to_spreadsheet,
    write_spreadsheet,
};
pub use model::{CourseTitle, GradeRecord, GradeSet, SectionSummary};
pub use output::{ExtractedText, ExtractionStats, GradeOutcome, GradeReport};
pub use pipeline::aggregate::{calculate_overall_grade, summarize_sections};
pub use pipeline::ocr::{OcrEngine, TesseractCli};
pub use pipeline::parse::extract_grades;
pub use pipeline::title::extract_course_title;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use spreadsheet::{default_spreadsheet_name, SpreadsheetWriter, XlsxWriter};
pub use table::{render_summary, to_table, GradeRow, GradeTable, TableStyle};
