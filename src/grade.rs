//! Entry points: document in, graded report out.
//!
//! The stages run strictly in sequence:
//!
//! ```text
//! resolve input ─▶ render + OCR (blocking) ─▶ title ─▶ parse ─▶ aggregate
//! ```
//!
//! Only the first two touch the filesystem or external processes.
//! [`analyse_text`] runs the rest on text that is already extracted.

use crate::config::GradescanConfig;
use crate::error::GradescanError;
use crate::output::{ExtractedText, ExtractionStats, GradeOutcome, GradeReport};
use crate::pipeline::{aggregate, extract, input, ocr, parse, title};
use crate::spreadsheet::{SpreadsheetWriter, XlsxWriter};
use crate::table::to_table;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// OCR every selected page of a PDF (local path or http(s) URL).
///
/// Fails if the document cannot be opened, a page cannot be rendered, or OCR
/// of a page fails. No partial text is ever returned.
pub async fn extract_text(
    input_str: impl AsRef<str>,
    config: &GradescanConfig,
) -> Result<ExtractedText, GradescanError> {
    let input_str = input_str.as_ref();
    info!("Extracting text: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    extract_resolved(resolved, config).await
}

/// Run the blocking extractor on a resolved input, then drop the input.
async fn extract_resolved(
    resolved: input::ResolvedInput,
    config: &GradescanConfig,
) -> Result<ExtractedText, GradescanError> {
    let engine = ocr::resolve_engine(config);
    let path = resolved.path().to_path_buf();
    let config = config.clone();

    let result = tokio::task::spawn_blocking(move || {
        extract::extract_text_blocking(&path, &config, engine.as_ref())
    })
    .await
    .map_err(|e| GradescanError::Internal(format!("Extraction task panicked: {}", e)))?;

    // Temp files backing the input are deleted here, success or not.
    drop(resolved);
    result
}

/// Title, records and overall grade of already-extracted text.
pub fn analyse_text(text: &str, stats: ExtractionStats) -> GradeOutcome {
    let course_title = title::extract_course_title(text);
    info!("Course title: {}", course_title);

    let grades = parse::extract_grades(text);
    if grades.is_empty() {
        warn!("No grades found for {}", course_title);
        return GradeOutcome::NoGrades {
            course_title,
            stats,
        };
    }

    let overall_grade = aggregate::calculate_overall_grade(&grades);
    info!(
        "Overall grade: {:.2}% from {} records",
        overall_grade,
        grades.len()
    );

    GradeOutcome::Graded(GradeReport {
        course_title,
        sections: aggregate::summarize_sections(&grades),
        grades,
        overall_grade,
        stats,
    })
}

/// Grade a PDF file or URL.
///
/// # Returns
/// `Ok(GradeOutcome::NoGrades { .. })` when the document was read but no
/// score lines were found; that is a result, not an error.
///
/// # Errors
/// Only fatal extraction failures (bad input, unreadable PDF, OCR failure).
pub async fn grade(
    input_str: impl AsRef<str>,
    config: &GradescanConfig,
) -> Result<GradeOutcome, GradescanError> {
    let total_start = Instant::now();
    let extracted = extract_text(input_str, config).await?;
    let outcome = analyse_text(&extracted.text, extracted.stats);
    info!("Graded in {}ms", total_start.elapsed().as_millis());
    Ok(outcome)
}

/// Grade a PDF held in memory.
///
/// The bytes go to a managed temp file that is deleted on return.
pub async fn grade_from_bytes(
    bytes: &[u8],
    config: &GradescanConfig,
) -> Result<GradeOutcome, GradescanError> {
    let resolved = input::resolve_bytes(bytes)?;
    let extracted = extract_resolved(resolved, config).await?;
    Ok(analyse_text(&extracted.text, extracted.stats))
}

/// Synchronous wrapper around [`grade`].
///
/// Creates a temporary tokio runtime internally.
pub fn grade_sync(
    input_str: impl AsRef<str>,
    config: &GradescanConfig,
) -> Result<GradeOutcome, GradescanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| GradescanError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(grade(input_str, config))
}

/// Grade a document and, if any grades were found, save them as `.xlsx`.
///
/// Nothing is written for [`GradeOutcome::NoGrades`].
pub async fn grade_to_spreadsheet(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &GradescanConfig,
) -> Result<GradeOutcome, GradescanError> {
    let outcome = grade(input_str, config).await?;
    if let Some(report) = outcome.report() {
        write_spreadsheet(report, output_path.as_ref(), &XlsxWriter::default())?;
    }
    Ok(outcome)
}

/// Persist a report's table with the given writer.
pub fn write_spreadsheet(
    report: &GradeReport,
    dest: &Path,
    writer: &dyn SpreadsheetWriter,
) -> Result<(), GradescanError> {
    writer.write(&to_table(&report.grades), dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CourseTitle;

    const SAMPLE: &str = "MIS-353-01 Fall\nHomework 1 18/20\nGrades - Header\nQuiz 1 9/10 90%\n";

    #[test]
    fn analyse_worked_example() {
        let outcome = analyse_text(SAMPLE, ExtractionStats::default());
        let report = outcome.report().expect("graded");
        assert_eq!(
            report.course_title,
            CourseTitle::Known("MIS-353-01 Fall".into())
        );
        assert_eq!(report.grades.len(), 2);
        assert_eq!(report.overall_grade, 90.0);
        assert_eq!(report.overall_grade_display(), "90.00%");
        assert_eq!(report.sections.len(), 1);
    }

    #[test]
    fn analyse_without_scores_is_no_grades() {
        let outcome = analyse_text("CS-101-01\nPoints Comments\n", ExtractionStats::default());
        match outcome {
            GradeOutcome::NoGrades { course_title, .. } => {
                assert_eq!(course_title.as_str(), "CS-101-01");
            }
            other => panic!("expected NoGrades, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn grade_from_bytes_rejects_non_pdf() {
        let err = grade_from_bytes(b"hello", &GradescanConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GradescanError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn grade_missing_file_is_extraction_error() {
        let err = grade("/no/such/gradebook.pdf", &GradescanConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_extraction_error());
        assert!(matches!(err, GradescanError::FileNotFound { .. }));
    }
}
