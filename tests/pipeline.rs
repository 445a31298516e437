//! Integration tests over the text half of the pipeline.
//!
//! Everything here runs on plain strings through the public API, so neither
//! pdfium nor tesseract is needed.

use gradescan::{
    analyse_text, calculate_overall_grade, extract_course_title, extract_grades,
    render_summary, to_table, CourseTitle, ExtractionStats, GradeOutcome, GradeRecord, GradeSet,
    SpreadsheetWriter, TableStyle, XlsxWriter,
};

const WORKED_EXAMPLE: &str =
    "MIS-353-01 Fall\nHomework 1 18/20\nGrades - Header\nQuiz 1 9/10 90%\n";

// ── Worked example ───────────────────────────────────────────────────────────

#[test]
fn worked_example_end_to_end() {
    let title = extract_course_title(WORKED_EXAMPLE);
    assert_eq!(title, CourseTitle::Known("MIS-353-01 Fall".to_string()));

    let grades = extract_grades(WORKED_EXAMPLE);
    let items: Vec<(&str, f64, f64)> = grades
        .iter()
        .map(|r| (r.item.as_str(), r.achieved, r.total))
        .collect();
    assert_eq!(
        items,
        vec![("Homework 1", 18.0, 20.0), ("Quiz 1", 9.0, 10.0)]
    );
    assert!(grades.iter().all(|r| r.section == "All Grades"));
    assert!(grades.iter().all(|r| r.weight == Some(100.0)));

    assert_eq!(calculate_overall_grade(&grades), 90.0);
}

#[test]
fn worked_example_report_and_table() {
    let outcome = analyse_text(WORKED_EXAMPLE, ExtractionStats::default());
    let report = outcome.into_report().expect("worked example has grades");

    let table = to_table(&report.grades);
    assert_eq!(
        table.columns(),
        &["Section", "Item", "Achieved", "Total", "Weight"]
    );
    assert_eq!(table.rows.len(), 2);

    let summary = render_summary(&report, TableStyle::Terminal);
    assert!(summary.contains("MIS-353-01 Fall"));
    assert!(summary.contains("90.00%"));
}

// ── Title ────────────────────────────────────────────────────────────────────

#[test]
fn title_is_scrubbed_of_punctuation() {
    let text = "Gradebook export\nCS-101-02: Intro (Spring), 2024!\nLab 1 5/5\n";
    assert_eq!(
        extract_course_title(text).as_str(),
        "CS-101-02 Intro Spring 2024"
    );
}

#[test]
fn missing_title_is_unknown_course() {
    let title = extract_course_title("Homework 1 18/20\n");
    assert!(title.is_unknown());
    assert_eq!(title.to_string(), "Unknown Course");
}

// ── Parser ───────────────────────────────────────────────────────────────────

#[test]
fn header_lines_never_produce_records() {
    let text = "Grade tem 1/2\nPoints 10/10\nComments 3/4\nGrades - 5/5\nLab 2 7/8\n";
    let grades = extract_grades(text);
    assert_eq!(grades.len(), 1);
    assert_eq!(grades.records()[0].item, "Lab 2");
}

#[test]
fn lines_without_scores_produce_nothing() {
    let grades = extract_grades("Attendance excellent\n\n   \nFinal exam pending\n");
    assert!(grades.is_empty());
}

#[test]
fn no_grades_outcome_keeps_title() {
    let outcome = analyse_text("MIS-353-01 Fall\nNothing graded yet\n", ExtractionStats::default());
    match outcome {
        GradeOutcome::NoGrades { course_title, .. } => {
            assert_eq!(course_title.as_str(), "MIS-353-01 Fall");
        }
        GradeOutcome::Graded(report) => panic!("unexpected grades: {:?}", report.grades),
    }
}

#[test]
fn lone_carriage_returns_split_lines() {
    let outcome = analyse_text(
        "MIS-353-01 Fall\rHomework 1 18/20\r",
        ExtractionStats::default(),
    );
    let report = outcome.report().expect("carriage-return text has a grade");
    assert_eq!(report.course_title.as_str(), "MIS-353-01 Fall");
    let items: Vec<&str> = report.grades.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(items, vec!["Homework 1"]);
    assert_eq!(report.overall_grade, 90.0);
}

// ── Aggregation ──────────────────────────────────────────────────────────────

#[test]
fn extra_credit_is_not_clamped() {
    let grades = extract_grades("Bonus 22/20\n");
    assert_eq!(calculate_overall_grade(&grades), 110.0);
}

#[test]
fn ties_round_to_even() {
    assert_eq!(calculate_overall_grade(&extract_grades("Exam 1 29/32\n")), 90.62);
    assert_eq!(calculate_overall_grade(&extract_grades("Quiz 1/32\n")), 3.12);
}

#[test]
fn empty_set_grades_zero() {
    assert_eq!(calculate_overall_grade(&GradeSet::new()), 0.0);
}

#[test]
fn equal_weight_sections_average() {
    let grades: GradeSet = vec![
        GradeRecord::new("Midterm", 8.0, 10.0)
            .with_section("Exams")
            .with_weight(Some(50.0)),
        GradeRecord::new("Lab 1", 10.0, 10.0)
            .with_section("Labs")
            .with_weight(Some(50.0)),
    ]
    .into_iter()
    .collect();
    assert_eq!(calculate_overall_grade(&grades), 90.0);
}

// ── Serialisation and spreadsheet ────────────────────────────────────────────

#[test]
fn outcome_serialises_with_status_tag() {
    let outcome = analyse_text(WORKED_EXAMPLE, ExtractionStats::default());
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "graded");
    assert_eq!(json["course_title"], "MIS-353-01 Fall");
    assert_eq!(json["grades"].as_array().unwrap().len(), 2);

    let empty = analyse_text("", ExtractionStats::default());
    let json = serde_json::to_value(&empty).unwrap();
    assert_eq!(json["status"], "no_grades");
    assert_eq!(json["course_title"], "Unknown Course");
}

#[test]
fn spreadsheet_from_text() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("grades_MIS353Fall.xlsx");

    let grades = extract_grades(WORKED_EXAMPLE);
    XlsxWriter::default()
        .write(&to_table(&grades), &dest)
        .unwrap();

    assert!(dest.metadata().unwrap().len() > 0);
}
