use crate::answer_key::AnswerKeySpec;
use crate::responses::wide::WideTable;
use crate::types::option::{join_letters, parse_selection, Selection};
use std::collections::{BTreeMap, BTreeSet};

const RATIO_EPSILON: f64 = 1e-9;

/// Tally for one key question across every student in `wide`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionTally {
    pub missed: usize,
    /// Hit count -> number of students, for partial multi-select answers only.
    pub partial: BTreeMap<usize, usize>,
}

/// Counts misses for `spec` using the results column `column`.
///
/// A partially correct multi-select answer still counts as missed when its
/// hit ratio falls below `partial_threshold`.
pub fn analyze_question(
    spec: &AnswerKeySpec,
    column: &str,
    wide: &WideTable,
    partial_threshold: f64,
    warnings: &mut Vec<String>,
) -> QuestionTally {
    let total_correct = spec.correct.len();
    let mut tally = QuestionTally::default();

    for student in &wide.students {
        let who = format!("{} / {}", spec.label, student.student_id);
        let selected = match parse_selection(student.answer(column)) {
            Selection::Empty => {
                tally.missed += 1;
                continue;
            }
            Selection::Invalid(tokens) => {
                warnings.push(format!("{who}: Invalid option(s): {}", tokens.join(", ")));
                tally.missed += 1;
                continue;
            }
            Selection::Marked(set) => set,
        };

        if total_correct == 1 {
            if selected != spec.correct {
                if selected.len() > 1 {
                    warnings.push(format!("{who}: multiple marks for single-choice question."));
                }
                tally.missed += 1;
            }
            continue;
        }

        let extra: BTreeSet<_> =
            selected.difference(&spec.correct).copied().collect();
        if !extra.is_empty() {
            warnings.push(format!(
                "{who}: selected incorrect option(s) {}.",
                join_letters(&extra, ", ")
            ));
            tally.missed += 1;
            continue;
        }

        let hits = selected.intersection(&spec.correct).count();
        if hits == 0 {
            tally.missed += 1;
            continue;
        }
        if hits < total_correct {
            *tally.partial.entry(hits).or_insert(0) += 1;
        }
        let ratio = hits as f64 / total_correct as f64;
        if ratio + RATIO_EPSILON < partial_threshold {
            tally.missed += 1;
        }
    }

    tally
}

/// `2 students selected 2/3 correct, 1 student selected 1/3 correct`
pub fn format_partial_notes(total_correct: usize, partial: &BTreeMap<usize, usize>) -> String {
    if total_correct <= 1 {
        return String::new();
    }
    partial
        .iter()
        .rev()
        .map(|(hits, count)| {
            let noun = if *count == 1 { "student" } else { "students" };
            format!("{count} {noun} selected {hits}/{total_correct} correct")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::ResponseTable;
    use crate::types::option::OptionLetter;

    fn multi_spec() -> AnswerKeySpec {
        let correct = [OptionLetter::B, OptionLetter::C, OptionLetter::D]
            .into_iter()
            .collect();
        AnswerKeySpec {
            label: "Q4".to_string(),
            column: "Q4".to_string(),
            correct,
            correct_raw: "b,c,d".to_string(),
            display: "[B,C,D]".to_string(),
            points: None,
        }
    }

    fn wide(data: &str) -> WideTable {
        ResponseTable::from_reader(data.as_bytes(), "results.csv")
            .expect("results should parse")
            .to_wide()
    }

    #[test]
    fn partial_threshold_decides_whether_partial_answers_are_missed() {
        let table = wide("Student_ID,Q4\nS1,\"B,C\"\nS2,\"B,C,D\"\n");
        let spec = multi_spec();

        let mut warnings = Vec::new();
        let strict = analyze_question(&spec, "Q4", &table, 1.0, &mut warnings);
        assert_eq!(strict.missed, 1);
        assert_eq!(strict.partial.get(&2), Some(&1));

        let lenient = analyze_question(&spec, "Q4", &table, 0.5, &mut warnings);
        assert_eq!(lenient.missed, 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn extras_blanks_and_invalid_tokens_are_missed() {
        let table = wide("Student_ID,Q4\nS1,\"A,B\"\nS2,\nS3,\"B,X\"\n");
        let mut warnings = Vec::new();
        let tally = analyze_question(&multi_spec(), "Q4", &table, 0.5, &mut warnings);
        assert_eq!(tally.missed, 3);
        assert!(tally.partial.is_empty());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("selected incorrect option(s) A."));
        assert!(warnings[1].contains("Invalid option(s): X"));
    }

    #[test]
    fn single_choice_multi_marks_are_noted() {
        let spec = AnswerKeySpec {
            label: "Q1".to_string(),
            column: "Q1".to_string(),
            correct: [OptionLetter::A].into_iter().collect(),
            correct_raw: "a".to_string(),
            display: "A".to_string(),
            points: Some(1.0),
        };
        let table = wide("Student_ID,Q1\nS1,A\nS2,\"A,B\"\nS3,C\n");
        let mut warnings = Vec::new();
        let tally = analyze_question(&spec, "Q1", &table, 1.0, &mut warnings);
        assert_eq!(tally.missed, 2);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Q1 / S2"));
    }

    #[test]
    fn partial_notes_sort_by_descending_hits() {
        let partial = BTreeMap::from([(1, 1), (2, 3)]);
        assert_eq!(
            format_partial_notes(3, &partial),
            "3 students selected 2/3 correct, 1 student selected 1/3 correct"
        );
        assert_eq!(format_partial_notes(1, &partial), "");
        assert_eq!(format_partial_notes(3, &BTreeMap::new()), "");
    }
}
