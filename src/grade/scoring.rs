use crate::answer_key::AnswerKeySpec;
use crate::types::option::{join_letters, Selection};
use crate::types::scoring::{round2, QuestionScore};

/// Canvas multiple-select rule: each correct option is worth `points / correct_options`,
/// each incorrect option subtracts the same amount, and the result is floored at zero.
pub fn score_multiple_select(
    points: f64,
    correct_options: usize,
    selected_correct: usize,
    selected_incorrect: usize,
) -> (f64, String) {
    if correct_options == 0 {
        return (0.0, "Invalid question: no correct options.".to_string());
    }

    let per_option = points / correct_options as f64;
    let raw = (selected_correct as f64 - selected_incorrect as f64) * per_option;
    let score = round2(raw.max(0.0));
    let gained = round2(selected_correct as f64 * per_option);
    let lost = round2(selected_incorrect as f64 * per_option);
    let explanation = format!(
        "{selected_correct} correct (+{gained:.2}), {selected_incorrect} incorrect (-{lost:.2}), Total: {score:.2}/{points:.2}"
    );
    (score, explanation)
}

/// Scores one response cell against its key entry.
///
/// Invalid tokens and multiple marks on a single-select question score zero and
/// carry a warning; neither aborts grading.
pub fn score_row(student_id: &str, spec: &AnswerKeySpec, selection: &Selection) -> QuestionScore {
    let points = spec.points_or_zero();

    let selected = match selection {
        Selection::Invalid(tokens) => {
            return QuestionScore {
                score: 0.0,
                explanation: format!("Invalid selection (0.00/{points:.2})"),
                warning: Some(format!(
                    "{} / {student_id}: invalid option(s) {}; scored as incorrect.",
                    spec.label,
                    tokens.join(", ")
                )),
            };
        }
        Selection::Empty => None,
        Selection::Marked(set) => Some(set),
    };

    if !spec.is_multiple() {
        let correct = selected.is_some_and(|set| *set == spec.correct);
        let multiple_marks = selected.is_some_and(|set| set.len() > 1);
        let score = if correct { round2(points) } else { 0.0 };
        let verdict = if correct { "correct" } else { "incorrect" };
        return QuestionScore {
            score,
            explanation: format!("Single-select: {verdict} ({score:.2}/{points:.2})"),
            warning: multiple_marks.then(|| {
                format!(
                    "{} / {student_id}: multiple marks ({}) for single-select question.",
                    spec.label,
                    selected.map(|set| join_letters(set, ",")).unwrap_or_default()
                )
            }),
        };
    }

    let (hits, extras) = match selected {
        Some(set) => (
            set.intersection(&spec.correct).count(),
            set.difference(&spec.correct).count(),
        ),
        None => (0, 0),
    };
    let (score, explanation) = score_multiple_select(points, spec.correct.len(), hits, extras);
    QuestionScore {
        score,
        explanation,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::option::{parse_selection, OptionLetter};

    fn spec(label: &str, correct: &[OptionLetter], points: f64) -> AnswerKeySpec {
        let correct = correct.iter().copied().collect();
        AnswerKeySpec {
            label: label.to_string(),
            column: label.to_string(),
            display: join_letters(&correct, ","),
            correct_raw: join_letters(&correct, ",").to_lowercase(),
            correct,
            points: Some(points),
        }
    }

    #[test]
    fn canvas_partial_credit_for_three_correct_options() {
        let q = spec(
            "Q4",
            &[OptionLetter::B, OptionLetter::C, OptionLetter::D],
            4.0,
        );

        let two_hits = score_row("S1", &q, &parse_selection("B,C"));
        assert_eq!(two_hits.score, 2.67);
        assert_eq!(
            two_hits.explanation,
            "2 correct (+2.67), 0 incorrect (-0.00), Total: 2.67/4.00"
        );

        let with_extra = score_row("S2", &q, &parse_selection("B,C,D,A"));
        assert_eq!(with_extra.score, 2.67);

        let only_wrong = score_row("S3", &q, &parse_selection("A"));
        assert_eq!(only_wrong.score, 0.0);

        let all = score_row("S4", &q, &parse_selection("[d; c; b]"));
        assert_eq!(all.score, 4.0);
    }

    #[test]
    fn multiple_select_never_goes_negative() {
        let (score, explanation) = score_multiple_select(3.0, 2, 0, 3);
        assert_eq!(score, 0.0);
        assert_eq!(
            explanation,
            "0 correct (+0.00), 3 incorrect (-4.50), Total: 0.00/3.00"
        );
    }

    #[test]
    fn single_select_requires_exact_match() {
        let q = spec("Q1", &[OptionLetter::B], 1.5);

        let right = score_row("S1", &q, &parse_selection("b"));
        assert_eq!(right.score, 1.5);
        assert_eq!(right.explanation, "Single-select: correct (1.50/1.50)");
        assert!(right.warning.is_none());

        let wrong = score_row("S1", &q, &parse_selection("A"));
        assert_eq!(wrong.score, 0.0);
        assert!(wrong.warning.is_none());

        let both = score_row("S1", &q, &parse_selection("A,B"));
        assert_eq!(both.score, 0.0);
        let warning = both.warning.expect("multiple marks should warn");
        assert!(warning.contains("multiple marks"));

        let blank = score_row("S1", &q, &parse_selection(""));
        assert_eq!(blank.score, 0.0);
        assert!(blank.warning.is_none());
    }

    #[test]
    fn invalid_tokens_score_zero_with_warning() {
        let q = spec("Q2", &[OptionLetter::A], 1.0);
        let scored = score_row("S9", &q, &parse_selection("A,Z"));
        assert_eq!(scored.score, 0.0);
        let warning = scored.warning.expect("invalid tokens should warn");
        assert!(warning.contains("Q2 / S9"));
        assert!(warning.contains('Z'));
    }
}
