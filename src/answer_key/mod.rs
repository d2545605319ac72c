pub mod writer;

use crate::error::{BubblexanError, Result};
use crate::table::RawTable;
use crate::types::option::{join_letters, parse_selection, OptionSet, Selection};
use std::collections::HashMap;
use std::path::Path;

const QUESTION_COLUMN: &str = "Question";
const ANSWER_COLUMNS: [&str; 3] = ["Correct_Answer", "Correct Answer", "Answer"];
const POINTS_COLUMN: &str = "Points";

/// Which consumer the key is loaded for; grading requires point values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVariant {
    Grading,
    Analysis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerKeySpec {
    /// Normalized display label, e.g. `Q4`.
    pub label: String,
    /// Question cell as written in the key file.
    pub column: String,
    pub correct: OptionSet,
    /// Correct-answer cell as written, used verbatim by give-backs.
    pub correct_raw: String,
    pub display: String,
    pub points: Option<f64>,
}

impl AnswerKeySpec {
    pub fn is_multiple(&self) -> bool {
        self.correct.len() > 1
    }

    pub fn points_or_zero(&self) -> f64 {
        self.points.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct AnswerKey {
    entries: Vec<AnswerKeySpec>,
    index: HashMap<String, usize>,
}

impl AnswerKey {
    pub fn load(path: &Path, variant: KeyVariant) -> Result<Self> {
        let table = RawTable::read_path(path)?;
        Self::from_table(&table, variant)
    }

    pub fn from_table(table: &RawTable, variant: KeyVariant) -> Result<Self> {
        let question_col = table.require_columns(&[QUESTION_COLUMN])?[0];
        let answer_col = match variant {
            KeyVariant::Grading => table.require_columns(&[ANSWER_COLUMNS[0], POINTS_COLUMN])?[0],
            KeyVariant::Analysis => table.first_column(&ANSWER_COLUMNS).ok_or_else(|| {
                BubblexanError::MissingColumns {
                    file: table.source.clone(),
                    columns: ANSWER_COLUMNS[0].to_string(),
                }
            })?,
        };
        let points_col = table.column(POINTS_COLUMN);

        let mut entries = Vec::with_capacity(table.rows.len());
        let mut index = HashMap::new();
        for row in &table.rows {
            let raw_question = RawTable::cell(row, question_col);
            let label = normalize_question_label(raw_question);
            if label.is_empty() {
                return Err(BubblexanError::InvalidInput(
                    "answer-key row is missing a Question value".to_string(),
                ));
            }
            if index.contains_key(&label) {
                return Err(BubblexanError::InvalidInput(format!(
                    "duplicate question '{label}' in answer key"
                )));
            }

            let correct_raw = RawTable::cell(row, answer_col).to_string();
            let correct = parse_correct_options(&label, &correct_raw)?;
            let points = match (variant, points_col) {
                (KeyVariant::Grading, Some(col)) => {
                    Some(parse_points(&label, RawTable::cell(row, col))?)
                }
                (KeyVariant::Analysis, Some(col)) if !RawTable::cell(row, col).is_empty() => {
                    Some(parse_points(&label, RawTable::cell(row, col))?)
                }
                _ => None,
            };
            let display = display_answer(&correct_raw, &correct);

            index.insert(label.clone(), entries.len());
            entries.push(AnswerKeySpec {
                label,
                column: raw_question.to_string(),
                correct,
                correct_raw,
                display,
                points,
            });
        }

        if entries.is_empty() {
            return Err(BubblexanError::InvalidInput(format!(
                "{} has no answer-key rows",
                table.source
            )));
        }

        let key = Self { entries, index };
        if variant == KeyVariant::Grading && key.total_points() <= 0.0 {
            return Err(BubblexanError::InvalidInput(
                "total possible points must be positive".to_string(),
            ));
        }
        Ok(key)
    }

    pub fn entries(&self) -> &[AnswerKeySpec] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&AnswerKeySpec> {
        self.index.get(label).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn total_points(&self) -> f64 {
        self.entries.iter().map(AnswerKeySpec::points_or_zero).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// `q12`, `Q 12` and `12` all become `Q12`.
pub fn normalize_question_label(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }
    let suffix = match text.strip_prefix(['q', 'Q']) {
        Some(rest) if !rest.trim().is_empty() => rest.trim(),
        _ => text,
    };
    format!("Q{}", suffix.to_uppercase())
}

fn parse_correct_options(label: &str, raw: &str) -> Result<OptionSet> {
    match parse_selection(raw) {
        Selection::Marked(set) => Ok(set),
        Selection::Empty => Err(BubblexanError::InvalidInput(format!(
            "question '{label}' has no correct answers"
        ))),
        Selection::Invalid(tokens) => Err(BubblexanError::InvalidInput(format!(
            "question '{label}' has invalid option(s): {}",
            tokens.join(", ")
        ))),
    }
}

fn parse_points(label: &str, raw: &str) -> Result<f64> {
    let points: f64 = raw.trim().parse().map_err(|_| {
        BubblexanError::InvalidInput(format!(
            "question '{label}' has a non-numeric point value '{raw}'"
        ))
    })?;
    if !points.is_finite() || points < 0.0 {
        return Err(BubblexanError::InvalidInput(format!(
            "question '{label}' has invalid point value {raw}"
        )));
    }
    Ok(points)
}

fn display_answer(raw: &str, correct: &OptionSet) -> String {
    if raw.trim_start().starts_with('[') {
        raw.trim().to_string()
    } else if correct.len() > 1 {
        format!("[{}]", join_letters(correct, ","))
    } else {
        join_letters(correct, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::option::OptionLetter;

    fn table(data: &str) -> RawTable {
        RawTable::from_reader(data.as_bytes(), "key.csv").expect("key table should parse")
    }

    #[test]
    fn normalizes_question_labels() {
        assert_eq!(normalize_question_label("q12"), "Q12");
        assert_eq!(normalize_question_label(" Q 3 "), "Q3");
        assert_eq!(normalize_question_label("7"), "Q7");
        assert_eq!(normalize_question_label("q2b"), "Q2B");
        assert_eq!(normalize_question_label("   "), "");
    }

    #[test]
    fn grading_key_parses_sets_points_and_display() {
        let key = AnswerKey::from_table(
            &table("Question,Correct_Answer,Points\nq1,b,1\nQ2,\"b,c,d\",4.00\n3,[a;e],2\n"),
            KeyVariant::Grading,
        )
        .expect("key should load");

        assert_eq!(key.len(), 3);
        assert_eq!(key.total_points(), 7.0);
        let q2 = key.get("Q2").expect("Q2 should exist");
        assert!(q2.is_multiple());
        assert_eq!(q2.correct_raw, "b,c,d");
        assert_eq!(q2.display, "[B,C,D]");
        assert_eq!(key.get("Q1").map(|spec| spec.display.as_str()), Some("B"));
        assert_eq!(key.get("Q3").map(|spec| spec.display.as_str()), Some("[a;e]"));
        assert!(key
            .get("Q3")
            .is_some_and(|spec| spec.correct.contains(&OptionLetter::E)));
    }

    #[test]
    fn grading_key_requires_points_column() {
        let result = AnswerKey::from_table(
            &table("Question,Correct_Answer\nQ1,a\n"),
            KeyVariant::Grading,
        );
        assert!(matches!(result, Err(BubblexanError::MissingColumns { columns, .. }) if columns == "Points"));
    }

    #[test]
    fn rejects_duplicates_invalid_letters_and_non_positive_totals() {
        let duplicate = AnswerKey::from_table(
            &table("Question,Correct_Answer,Points\nQ1,a,1\nq1,b,1\n"),
            KeyVariant::Grading,
        );
        assert!(matches!(duplicate, Err(BubblexanError::InvalidInput(m)) if m.contains("duplicate")));

        let invalid = AnswerKey::from_table(
            &table("Question,Correct_Answer,Points\nQ1,f,1\n"),
            KeyVariant::Grading,
        );
        assert!(matches!(invalid, Err(BubblexanError::InvalidInput(m)) if m.contains("invalid option")));

        let zero = AnswerKey::from_table(
            &table("Question,Correct_Answer,Points\nQ1,a,0\nQ2,b,0\n"),
            KeyVariant::Grading,
        );
        assert!(matches!(zero, Err(BubblexanError::InvalidInput(m)) if m.contains("positive")));

        let negative = AnswerKey::from_table(
            &table("Question,Correct_Answer,Points\nQ1,a,-1\n"),
            KeyVariant::Grading,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn analysis_key_accepts_answer_column_without_points() {
        let key = AnswerKey::from_table(&table("question,Answer\nQ1,c\n"), KeyVariant::Analysis)
            .expect("analysis key should load");
        let spec = key.get("Q1").expect("Q1 should exist");
        assert_eq!(spec.points, None);
        assert_eq!(spec.column, "Q1");
    }
}
