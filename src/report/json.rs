use crate::types::report::{GradeReport, MissReport};

pub fn grade_to_json(report: &GradeReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn misses_to_json(report: &MissReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::MissRow;

    #[test]
    fn miss_json_contains_rows_and_thresholds() {
        let report = MissReport {
            miss_threshold: 40.0,
            partial_threshold: 0.5,
            rows: vec![MissRow {
                question: "Q2".to_string(),
                percent_missed: 25.0,
                missed_count: 1,
                total_students: 4,
                correct_answer: "[B,C]".to_string(),
                partial_credit_notes: "1 student selected 1/2 correct".to_string(),
                high_miss: false,
            }],
            warnings: Vec::new(),
        };

        let json = misses_to_json(&report).expect("json should render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json should parse");
        assert_eq!(value["miss_threshold"], 40.0);
        assert_eq!(value["rows"][0]["question"], "Q2");
        assert_eq!(value["rows"][0]["high_miss"], false);
    }
}
