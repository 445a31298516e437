//! Grade aggregation: one overall percentage from a [`GradeSet`].
//!
//! Two tiers:
//!
//! * **Weighted**: when any section carries a weight, each section's
//!   percentage contributes in proportion to its weight. Sections without a
//!   weight are left out of both numerator and denominator.
//! * **Unweighted**: otherwise (or when the weights sum to zero) the grade is
//!   the plain ratio of all points earned to all points possible.
//!
//! The result is rounded to two decimals (ties to even) and never clamped: extra credit can
//! push it above 100. Aggregation never fails; degenerate input yields 0.

use crate::model::{GradeSet, SectionSummary};
use tracing::debug;

/// Group records by section in order of first appearance.
pub fn summarize_sections(grades: &GradeSet) -> Vec<SectionSummary> {
    let mut sections: Vec<SectionSummary> = Vec::new();

    for record in grades {
        match sections.iter_mut().find(|s| s.section == record.section) {
            Some(summary) => {
                summary.achieved += record.achieved;
                summary.total += record.total;
            }
            None => sections.push(SectionSummary {
                section: record.section.clone(),
                achieved: record.achieved,
                total: record.total,
                weight: record.weight,
                percentage: None,
            }),
        }
    }

    for summary in &mut sections {
        if summary.total > 0.0 {
            summary.percentage = Some((summary.achieved / summary.total) * 100.0);
        }
    }
    sections
}

/// Compute the overall percentage grade, rounded to two decimals.
///
/// Returns `0.0` for an empty set; check emptiness separately when "no data"
/// must be told apart from a genuine zero.
pub fn calculate_overall_grade(grades: &GradeSet) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }

    let sections = summarize_sections(grades);

    if let Some(grade) = weighted_grade(&sections) {
        debug!("Weighted grade over {} sections: {}", sections.len(), grade);
        return round2(grade);
    }

    let total = grades.total_possible();
    if total > 0.0 {
        let grade = (grades.total_achieved() / total) * 100.0;
        debug!("Unweighted grade: {}", grade);
        round2(grade)
    } else {
        0.0
    }
}

/// Weighted average over sections that have both points and a weight.
///
/// `None` when no such section exists or the weights do not sum to a
/// positive value.
fn weighted_grade(sections: &[SectionSummary]) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut any_weight = false;

    for summary in sections {
        if let (Some(pct), Some(weight)) = (summary.percentage, summary.weight) {
            any_weight = true;
            weighted_sum += pct * (weight / 100.0);
            total_weight += weight;
        }
    }

    if any_weight && total_weight > 0.0 {
        Some(weighted_sum * (100.0 / total_weight))
    } else {
        None
    }
}

/// Round to two decimals, ties to even, on the exact binary value.
///
/// `{:.2}` formats the exact decimal expansion of the float and breaks ties
/// to even, so 90.625 becomes 90.62 while 90.6251 becomes 90.63. Scaling by
/// 100 first would perturb the value and could move it onto or off a tie.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
