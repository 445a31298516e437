//! Spreadsheet output for the grade table.
//!
//! Persisting the table is a collaborator concern, so it sits behind
//! [`SpreadsheetWriter`]. [`XlsxWriter`] is the stock implementation: one
//! sheet, a bold header row with [`COLUMNS`], one row per record with numeric
//! cells for points and weight. The file is written next to its destination
//! and renamed into place so a failed write never leaves a truncated file.

use crate::error::GradescanError;
use crate::table::{GradeTable, COLUMNS};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Longest file-name stem kept by [`sanitize_filename`].
const MAX_STEM_LEN: usize = 255;

/// Something that can persist a [`GradeTable`] at a destination.
pub trait SpreadsheetWriter {
    fn write(&self, table: &GradeTable, dest: &Path) -> Result<(), GradescanError>;
}

/// Writes `.xlsx` workbooks.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    pub sheet_name: String,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self {
            sheet_name: "Grades".to_string(),
        }
    }
}

impl XlsxWriter {
    fn build_workbook(&self, table: &GradeTable) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name)?;

        for (col, name) in COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *name, &header)?;
        }

        for (i, row) in table.rows.iter().enumerate() {
            let r = i as u32 + 1;
            sheet.write_string(r, 0, &row.section)?;
            sheet.write_string(r, 1, &row.item)?;
            sheet.write_number(r, 2, row.achieved)?;
            sheet.write_number(r, 3, row.total)?;
            if let Some(weight) = row.weight {
                sheet.write_number(r, 4, weight)?;
            }
        }

        Ok(workbook)
    }
}

impl SpreadsheetWriter for XlsxWriter {
    fn write(&self, table: &GradeTable, dest: &Path) -> Result<(), GradescanError> {
        let xlsx_failed = |e: XlsxError| GradescanError::SpreadsheetWriteFailed {
            path: dest.to_path_buf(),
            detail: e.to_string(),
        };

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GradescanError::OutputWriteFailed {
                path: dest.to_path_buf(),
                source: e,
            })?;
        }

        let mut workbook = self.build_workbook(table).map_err(xlsx_failed)?;
        let tmp_path = dest.with_extension("xlsx.tmp");
        workbook.save(&tmp_path).map_err(xlsx_failed)?;

        std::fs::rename(&tmp_path, dest).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            GradescanError::OutputWriteFailed {
                path: dest.to_path_buf(),
                source: e,
            }
        })?;

        info!("Wrote {} rows to {}", table.rows.len(), dest.display());
        Ok(())
    }
}

/// Keep only `[A-Za-z0-9_-]` and cap the length at 255 characters.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(MAX_STEM_LEN)
        .collect()
}

/// Default spreadsheet file name for an input path or URL:
/// `grades_<sanitized stem>.xlsx`.
pub fn default_spreadsheet_name(input: &str) -> PathBuf {
    let last = input
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let stem = Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("grades_{}.xlsx", sanitize_filename(&stem)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GradeRecord, GradeSet};
    use crate::table::to_table;

    fn table() -> GradeTable {
        let grades: GradeSet = vec![
            GradeRecord::new("Homework 1", 18.0, 20.0),
            GradeRecord::new("Quiz 1", 9.0, 10.0).with_weight(None),
        ]
        .into_iter()
        .collect();
        to_table(&grades)
    }

    #[test]
    fn writes_an_xlsx_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out").join("grades_test.xlsx");

        XlsxWriter::default().write(&table(), &dest).unwrap();

        let bytes = std::fs::read(&dest).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
        assert!(!dest.with_extension("xlsx.tmp").exists());
    }

    #[test]
    fn empty_table_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("empty.xlsx");
        XlsxWriter::default()
            .write(&GradeTable::default(), &dest)
            .unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn invalid_sheet_name_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bad.xlsx");
        let writer = XlsxWriter {
            sheet_name: "bad/name".into(),
        };
        let err = writer.write(&table(), &dest).unwrap_err();
        assert!(matches!(err, GradescanError::SpreadsheetWriteFailed { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("MIS 353 (fall).v2"), "MIS353fallv2");
        assert_eq!(sanitize_filename("grade_book-01"), "grade_book-01");
        assert_eq!(sanitize_filename(&"a".repeat(300)).len(), 255);
    }

    #[test]
    fn default_names() {
        assert_eq!(
            default_spreadsheet_name("/tmp/uploads/MIS 353 Fall.pdf"),
            PathBuf::from("grades_MIS353Fall.xlsx")
        );
        assert_eq!(
            default_spreadsheet_name("https://lms.example.edu/export/gradebook.pdf"),
            PathBuf::from("grades_gradebook.xlsx")
        );
        assert_eq!(default_spreadsheet_name("scan"), PathBuf::from("grades_scan.xlsx"));
    }
}
