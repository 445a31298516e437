//! Course title extraction.
//!
//! Gradebook exports print the course as `DEPT-NNN-SS` (department, course
//! number, section) at the start of a header line, e.g. `MIS-353-01 Fall`.
//! The first such line wins; OCR debris on it is scrubbed.

use crate::model::CourseTitle;
use crate::pipeline::lines::split_lines;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Course code at the very start of a line.
static RE_COURSE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,}-\d{3}-\d{2}").unwrap());

/// Everything that is not an ASCII letter, digit, hyphen or space.
static RE_TITLE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9\- ]").unwrap());

/// Return the first line starting with a course code, scrubbed of OCR artefacts.
///
/// The match is anchored at the start of the untrimmed line. The whole line
/// (trimmed) becomes the title, so trailing term text such as `Fall` is kept.
pub fn extract_course_title(text: &str) -> CourseTitle {
    for line in split_lines(text) {
        if RE_COURSE_CODE.is_match(line) {
            let title = RE_TITLE_NOISE.replace_all(line.trim(), "").into_owned();
            debug!("Course title line: {:?} → {:?}", line, title);
            return CourseTitle::Known(title);
        }
    }
    debug!("No course code found");
    CourseTitle::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_course_line_and_keeps_term() {
        let text = "Gradebook\nMIS-353-01 Fall\nHomework 1 18/20\n";
        assert_eq!(
            extract_course_title(text),
            CourseTitle::Known("MIS-353-01 Fall".into())
        );
    }

    #[test]
    fn strips_ocr_punctuation() {
        let text = "ACCT-201-03: Spring, 2024!|\n";
        assert_eq!(
            extract_course_title(text).as_str(),
            "ACCT-201-03 Spring 2024"
        );
    }

    #[test]
    fn carriage_returns_separate_lines() {
        let text = "MIS-353-01 Fall\rHomework 1 18/20\r";
        assert_eq!(extract_course_title(text).as_str(), "MIS-353-01 Fall");
    }

    #[test]
    fn first_match_wins() {
        let text = "CS-101-01 Intro\nMATH-220-02 Calculus\n";
        assert_eq!(extract_course_title(text).as_str(), "CS-101-01 Intro");
    }

    #[test]
    fn code_must_start_the_line() {
        let text = "Course: MIS-353-01\n  MIS-353-01 indented\n";
        assert!(extract_course_title(text).is_unknown());
    }

    #[test]
    fn single_letter_department_is_not_a_code() {
        assert!(extract_course_title("M-353-01\n").is_unknown());
        assert!(extract_course_title("mis-353-01\n").is_unknown());
    }

    #[test]
    fn unknown_when_absent() {
        let title = extract_course_title("Homework 1 18/20\nQuiz 9/10\n");
        assert!(title.is_unknown());
        assert_eq!(title.to_string(), "Unknown Course");
        assert!(extract_course_title("").is_unknown());
    }
}
