use crate::types::report::{GradeReport, MissReport};

pub fn grade_to_markdown(report: &GradeReport) -> String {
    let mut output = String::new();
    output.push_str("# Grade Report\n\n");
    output.push_str(&format!(
        "Students: {}\nResponses: {}\nTotal possible points: {:.2}\n\n",
        report.students.len(),
        report.rows.len(),
        report.total_possible
    ));

    output.push_str("## Students\n\n");
    if report.students.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str("| Student | Total | Percent |\n|---|---:|---:|\n");
        for student in &report.students {
            output.push_str(&format!(
                "| {} | {:.2} | {:.2}% |\n",
                student.student_id, student.total_score, student.percent_grade
            ));
        }
        output.push('\n');
    }

    output.push_str("## Questions\n\n");
    output.push_str("| Question | Mean | Percent correct |\n|---|---:|---:|\n");
    for stat in &report.question_stats {
        output.push_str(&format!(
            "| {} | {:.2} | {:.2}% |\n",
            stat.question_id, stat.mean_score, stat.percent_correct
        ));
    }
    push_warnings(&mut output, &report.warnings);
    output
}

pub fn misses_to_markdown(report: &MissReport) -> String {
    let mut output = String::new();
    output.push_str("# Miss Report\n\n");
    output.push_str(&format!(
        "Miss threshold: {:.2}%\nPartial threshold: {:.2}\n\n",
        report.miss_threshold, report.partial_threshold
    ));
    output.push_str("| Question | Missed | Students | Percent | Answer | Partial credit |\n");
    output.push_str("|---|---:|---:|---:|---|---|\n");
    for row in &report.rows {
        output.push_str(&format!(
            "| {}{} | {} | {} | {:.2}% | {} | {} |\n",
            row.question,
            if row.high_miss { " (high)" } else { "" },
            row.missed_count,
            row.total_students,
            row.percent_missed,
            row.correct_answer,
            row.partial_credit_notes
        ));
    }
    push_warnings(&mut output, &report.warnings);
    output
}

fn push_warnings(output: &mut String, warnings: &[String]) {
    output.push_str("\n## Warnings\n\n");
    if warnings.is_empty() {
        output.push_str("- none\n");
        return;
    }
    for warning in warnings {
        output.push_str(&format!("- {warning}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{MissRow, QuestionStat, StudentTotal};

    #[test]
    fn grade_markdown_contains_sections() {
        let report = GradeReport {
            total_possible: 4.0,
            rows: Vec::new(),
            students: vec![StudentTotal {
                student_id: "S1".to_string(),
                total_score: 2.67,
                percent_grade: 66.75,
            }],
            question_stats: vec![QuestionStat {
                question_id: "Q1".to_string(),
                mean_score: 2.67,
                percent_correct: 66.75,
            }],
            warnings: vec!["Q1 / S1: multiple marks".to_string()],
        };

        let rendered = grade_to_markdown(&report);
        assert!(rendered.contains("# Grade Report"));
        assert!(rendered.contains("| S1 | 2.67 | 66.75% |"));
        assert!(rendered.contains("## Questions"));
        assert!(rendered.contains("- Q1 / S1: multiple marks"));
    }

    #[test]
    fn miss_markdown_marks_high_miss_rows() {
        let report = MissReport {
            miss_threshold: 50.0,
            partial_threshold: 1.0,
            rows: vec![MissRow {
                question: "Q3".to_string(),
                percent_missed: 60.0,
                missed_count: 3,
                total_students: 5,
                correct_answer: "C".to_string(),
                partial_credit_notes: String::new(),
                high_miss: true,
            }],
            warnings: Vec::new(),
        };

        let rendered = misses_to_markdown(&report);
        assert!(rendered.contains("| Q3 (high) | 3 | 5 | 60.00% | C |  |"));
        assert!(rendered.contains("- none"));
    }
}
