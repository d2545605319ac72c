pub mod scoring;

use crate::answer_key::AnswerKey;
use crate::error::{BubblexanError, Result};
use crate::responses::ResponseTable;
use crate::types::report::{GradeReport, GradedRow, QuestionStat, StudentTotal};
use crate::types::scoring::round2;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub use scoring::score_row;

pub const GRADED_REPORT_FILE: &str = "graded_report.csv";
pub const QUESTION_STATS_FILE: &str = "question_stats.csv";

/// Scores every response row, then totals per student and averages per question.
///
/// A response to a question the key does not contain fails the whole run.
pub fn grade_responses(responses: &ResponseTable, key: &AnswerKey) -> Result<GradeReport> {
    let total_possible = key.total_points();
    if total_possible <= 0.0 {
        return Err(BubblexanError::InvalidInput(
            "total possible points must be positive".to_string(),
        ));
    }

    if responses.is_empty() {
        tracing::warn!("no response rows to grade");
    }

    let mut rows = Vec::with_capacity(responses.rows.len());
    let mut warnings = Vec::new();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut per_question: HashMap<String, (f64, usize)> = HashMap::new();

    for response in &responses.rows {
        let spec = key
            .get(&response.question_id)
            .ok_or_else(|| BubblexanError::QuestionNotInKey(response.question_id.clone()))?;
        let scored = score_row(&response.student_id, spec, &response.selection());
        if let Some(warning) = scored.warning {
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        *totals.entry(response.student_id.clone()).or_insert(0.0) += scored.score;
        let bucket = per_question.entry(spec.label.clone()).or_insert((0.0, 0));
        bucket.0 += scored.score;
        bucket.1 += 1;

        rows.push(GradedRow {
            student_id: response.student_id.clone(),
            question_id: response.question_id.clone(),
            selected_answers: response.selected_answers.clone(),
            score_per_question: scored.score,
            explanation: scored.explanation,
            total_score: 0.0,
            percent_grade: 0.0,
        });
    }

    let students: Vec<StudentTotal> = totals
        .into_iter()
        .map(|(student_id, total)| StudentTotal {
            student_id,
            total_score: round2(total),
            percent_grade: round2(total / total_possible * 100.0),
        })
        .collect();
    let by_student: HashMap<&str, &StudentTotal> = students
        .iter()
        .map(|student| (student.student_id.as_str(), student))
        .collect();
    for row in &mut rows {
        if let Some(student) = by_student.get(row.student_id.as_str()) {
            row.total_score = student.total_score;
            row.percent_grade = student.percent_grade;
        }
    }
    rows.sort_by(|a, b| {
        a.student_id
            .cmp(&b.student_id)
            .then_with(|| a.question_id.cmp(&b.question_id))
    });

    let question_stats = key
        .entries()
        .iter()
        .map(|spec| {
            let mean = per_question
                .get(&spec.label)
                .map(|(sum, count)| sum / *count as f64)
                .unwrap_or(0.0);
            let points = spec.points_or_zero();
            let percent_correct = if points > 0.0 {
                round2(mean / points * 100.0)
            } else {
                0.0
            };
            QuestionStat {
                question_id: spec.label.clone(),
                mean_score: round2(mean),
                percent_correct,
            }
        })
        .collect();

    tracing::info!(
        rows = rows.len(),
        students = students.len(),
        warnings = warnings.len(),
        "grading complete"
    );

    Ok(GradeReport {
        total_possible,
        rows,
        students,
        question_stats,
        warnings,
    })
}

/// Output paths for a grading run; `prefix` is empty for a plain run.
pub fn grade_output_paths(output_dir: &Path, prefix: &str) -> (PathBuf, PathBuf) {
    (
        output_dir.join(format!("{prefix}{GRADED_REPORT_FILE}")),
        output_dir.join(format!("{prefix}{QUESTION_STATS_FILE}")),
    )
}
