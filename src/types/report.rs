use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradedRow {
    pub student_id: String,
    pub question_id: String,
    pub selected_answers: String,
    pub score_per_question: f64,
    pub explanation: String,
    pub total_score: f64,
    pub percent_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStat {
    pub question_id: String,
    pub mean_score: f64,
    pub percent_correct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentTotal {
    pub student_id: String,
    pub total_score: f64,
    pub percent_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    pub total_possible: f64,
    pub rows: Vec<GradedRow>,
    pub students: Vec<StudentTotal>,
    pub question_stats: Vec<QuestionStat>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissRow {
    pub question: String,
    pub percent_missed: f64,
    pub missed_count: usize,
    pub total_students: usize,
    pub correct_answer: String,
    pub partial_credit_notes: String,
    pub high_miss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissReport {
    pub miss_threshold: f64,
    pub partial_threshold: f64,
    pub rows: Vec<MissRow>,
    pub warnings: Vec<String>,
}

impl MissReport {
    pub fn high_miss(&self) -> impl Iterator<Item = &MissRow> {
        self.rows.iter().filter(|row| row.high_miss)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentRecord {
    pub question_id: String,
    pub row_count: usize,
    pub student_count: usize,
}

impl AdjustmentRecord {
    pub fn describe(&self) -> String {
        if self.row_count == 0 {
            return format!("{}: no matching responses found.", self.question_id);
        }
        let noun = if self.student_count == 1 {
            "student"
        } else {
            "students"
        };
        format!(
            "{}: updated {} {} ({} rows).",
            self.question_id, self.student_count, noun, self.row_count
        )
    }
}
