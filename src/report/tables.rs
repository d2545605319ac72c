use crate::error::Result;
use crate::types::report::{GradeReport, MissReport};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_graded_report<W: Write>(writer: W, report: &GradeReport) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "student_id",
        "question_id",
        "selected_answers",
        "score_per_question",
        "total_score",
        "percent_grade",
    ])?;
    for row in &report.rows {
        csv_writer.write_record([
            row.student_id.clone(),
            row.question_id.clone(),
            row.selected_answers.clone(),
            format!("{:.2}", row.score_per_question),
            format!("{:.2}", row.total_score),
            format!("{:.2}", row.percent_grade),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_question_stats<W: Write>(writer: W, report: &GradeReport) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["question_id", "mean_score", "percent_correct"])?;
    for stat in &report.question_stats {
        csv_writer.write_record([
            stat.question_id.clone(),
            format!("{:.2}", stat.mean_score),
            format!("{:.2}", stat.percent_correct),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_miss_report<W: Write>(writer: W, report: &MissReport) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Question",
        "Percent_Missed",
        "Missed_Count",
        "Total_Students",
        "Correct_Answer",
        "Partial_Credit_Notes",
    ])?;
    for row in &report.rows {
        csv_writer.write_record([
            row.question.clone(),
            format!("{:.2}", row.percent_missed),
            row.missed_count.to_string(),
            row.total_students.to_string(),
            row.correct_answer.clone(),
            row.partial_credit_notes.clone(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders with `write` into memory so callers can stage output before touching disk.
pub fn to_bytes<T, F>(value: &T, write: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Vec<u8>, &T) -> Result<()>,
{
    let mut buffer = Vec::new();
    write(&mut buffer, value)?;
    Ok(buffer)
}

pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}

/// One warning per line; nothing is written for an empty list.
pub fn write_log(path: &Path, entries: &[String]) -> Result<bool> {
    if entries.is_empty() {
        return Ok(false);
    }
    let mut text = entries.join("\n");
    text.push('\n');
    write_output(path, text.as_bytes())?;
    Ok(true)
}
