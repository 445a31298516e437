//! Tabular view of a [`GradeSet`] and its rendered summary.
//!
//! [`to_table`] is the single tabular representation shared by the rendered
//! summary and the spreadsheet writer, so both always show the same columns
//! in the same order.

use crate::model::{GradeRecord, GradeSet};
use crate::output::GradeReport;
use serde::{Deserialize, Serialize};
use tabled::{
    settings::{object::Rows, Modify, Panel, Style, Width},
    Table, Tabled,
};

/// Column headers, in order.
pub const COLUMNS: [&str; 5] = ["Section", "Item", "Achieved", "Total", "Weight"];

/// One typed table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRow {
    pub section: String,
    pub item: String,
    pub achieved: f64,
    pub total: f64,
    pub weight: Option<f64>,
}

impl From<&GradeRecord> for GradeRow {
    fn from(r: &GradeRecord) -> Self {
        Self {
            section: r.section.clone(),
            item: r.item.clone(),
            achieved: r.achieved,
            total: r.total,
            weight: r.weight,
        }
    }
}

/// Records as rows under [`COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeTable {
    pub rows: Vec<GradeRow>,
}

impl GradeTable {
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Convert a [`GradeSet`] into its tabular representation.
pub fn to_table(grades: &GradeSet) -> GradeTable {
    GradeTable {
        rows: grades.iter().map(GradeRow::from).collect(),
    }
}

/// How [`render_summary`] lays out the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// Box-drawing table with title header and grade footer.
    #[default]
    Terminal,
    /// GitHub-flavoured Markdown.
    Markdown,
}

#[derive(Tabled)]
struct DisplayRow {
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Achieved")]
    achieved: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

impl From<&GradeRow> for DisplayRow {
    fn from(row: &GradeRow) -> Self {
        Self {
            section: row.section.clone(),
            item: row.item.clone(),
            achieved: format_points(row.achieved),
            total: format_points(row.total),
            weight: row.weight.map(format_points).unwrap_or_default(),
        }
    }
}

/// `18.0` for whole numbers, shortest round-trip form otherwise.
pub fn format_points(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Render course title, record table and overall grade.
pub fn render_summary(report: &GradeReport, style: TableStyle) -> String {
    let table = to_table(&report.grades);
    let rows: Vec<DisplayRow> = table.rows.iter().map(DisplayRow::from).collect();
    let grade = report.overall_grade_display();

    match style {
        TableStyle::Terminal => Table::new(&rows)
            .with(Panel::header(report.course_title.to_string()))
            .with(Panel::footer(format!("Overall grade: {grade}")))
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(40).keep_words(true)))
            .with(Style::modern())
            .to_string(),
        TableStyle::Markdown => {
            let body = Table::new(&rows).with(Style::markdown()).to_string();
            format!(
                "# {}\n\n{}\n\n**Overall grade:** {}\n",
                report.course_title, body, grade
            )
        }
    }
}
