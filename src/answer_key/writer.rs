use crate::error::{BubblexanError, Result};
use crate::types::option::{parse_selection, OptionSet, Selection};
use crate::types::scoring::round2;
use std::io::Write;
use std::path::Path;

/// One generated key row.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEntry {
    pub number: u32,
    pub correct: OptionSet,
    pub points: f64,
}

impl KeyEntry {
    /// Sorted lowercase letters; multi-select rows are comma joined.
    pub fn answer_cell(&self) -> String {
        self.correct
            .iter()
            .map(|letter| letter.as_char().to_ascii_lowercase().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Builds numbered entries from answer cells such as `b` or `b,c,d`.
pub fn entries_from_answers(answers: &[String], points: f64) -> Result<Vec<KeyEntry>> {
    if answers.is_empty() {
        return Err(BubblexanError::InvalidInput(
            "at least one answer is required to build a key".to_string(),
        ));
    }
    if !points.is_finite() || points <= 0.0 {
        return Err(BubblexanError::InvalidInput(format!(
            "points must be positive (found {points})"
        )));
    }
    if (round2(points) - points).abs() > 1e-9 {
        return Err(BubblexanError::InvalidInput(format!(
            "points are written with two decimals; {points} would not survive a reload"
        )));
    }

    answers
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let number = index as u32 + 1;
            match parse_selection(raw) {
                Selection::Marked(correct) => Ok(KeyEntry {
                    number,
                    correct,
                    points,
                }),
                Selection::Empty => Err(BubblexanError::InvalidInput(format!(
                    "answer {number} is empty"
                ))),
                Selection::Invalid(tokens) => Err(BubblexanError::InvalidInput(format!(
                    "answer {number} has invalid option(s): {}",
                    tokens.join(", ")
                ))),
            }
        })
        .collect()
}

pub fn write_answer_key<W: Write>(writer: W, entries: &[KeyEntry]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Question", "Correct_Answer", "Points"])?;
    for entry in entries {
        csv_writer.write_record([
            format!("Q{}", entry.number),
            entry.answer_cell(),
            format!("{:.2}", entry.points),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_answer_key_file(path: &Path, entries: &[KeyEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_answer_key(file, entries)?;
    tracing::info!(path = %path.display(), questions = entries.len(), "answer key written");
    Ok(())
}
