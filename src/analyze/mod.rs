pub mod question;

use crate::answer_key::AnswerKey;
use crate::error::{BubblexanError, Result};
use crate::responses::ResponseTable;
use crate::types::report::{MissReport, MissRow};
use crate::types::scoring::round2;

pub use question::{analyze_question, format_partial_notes};

/// The two thresholds are independent: `miss_threshold` flags questions,
/// `partial_threshold` decides which partial answers count as missed.
pub fn validate_thresholds(miss_threshold: f64, partial_threshold: f64) -> Result<()> {
    if partial_threshold.is_nan() || partial_threshold <= 0.0 || partial_threshold > 1.0 {
        return Err(BubblexanError::InvalidInput(format!(
            "partial-threshold must be in (0, 1] (found {partial_threshold})"
        )));
    }
    if miss_threshold.is_nan() || miss_threshold < 0.0 {
        return Err(BubblexanError::InvalidInput(format!(
            "miss-threshold cannot be negative (found {miss_threshold})"
        )));
    }
    Ok(())
}

pub fn analyze_misses(
    responses: &ResponseTable,
    key: &AnswerKey,
    miss_threshold: f64,
    partial_threshold: f64,
) -> Result<MissReport> {
    validate_thresholds(miss_threshold, partial_threshold)?;

    let wide = responses.to_wide();
    let columns = key
        .entries()
        .iter()
        .map(|spec| {
            wide.resolve_column(&spec.column)
                .or_else(|| wide.resolve_column(&spec.label))
                .map(|column| (spec, column.to_string()))
                .ok_or_else(|| BubblexanError::QuestionNotInResults(spec.label.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let total_students = wide.len();
    let mut warnings = Vec::new();
    let mut rows = Vec::with_capacity(columns.len());
    for (spec, column) in columns {
        let tally = analyze_question(spec, &column, &wide, partial_threshold, &mut warnings);
        let percent = if wide.is_empty() {
            0.0
        } else {
            tally.missed as f64 / total_students as f64 * 100.0
        };
        rows.push(MissRow {
            question: spec.label.clone(),
            percent_missed: round2(percent),
            missed_count: tally.missed,
            total_students,
            correct_answer: spec.display.clone(),
            partial_credit_notes: format_partial_notes(spec.correct.len(), &tally.partial),
            high_miss: percent >= miss_threshold,
        });
    }

    tracing::info!(
        questions = rows.len(),
        students = total_students,
        warnings = warnings.len(),
        "miss analysis complete"
    );

    Ok(MissReport {
        miss_threshold,
        partial_threshold,
        rows,
        warnings,
    })
}

/// `Q3 (75.00%), Q7 (60.00%)`, or `None` when nothing crossed the threshold.
pub fn high_miss_summary(report: &MissReport) -> Option<String> {
    let flagged: Vec<String> = report
        .high_miss()
        .map(|row| format!("{} ({:.2}%)", row.question, row.percent_missed))
        .collect();
    if flagged.is_empty() {
        return None;
    }
    Some(format!(
        "{} missed by >= {:.2}% of students.",
        flagged.join(", "),
        report.miss_threshold
    ))
}
