use super::ResponseTable;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub student_id: String,
    pub answers: HashMap<String, String>,
}

impl WideRow {
    pub fn answer(&self, question: &str) -> &str {
        self.answers.get(question).map(String::as_str).unwrap_or("")
    }
}

/// One row per student, one column per question label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub question_order: Vec<String>,
    pub students: Vec<WideRow>,
}

impl WideTable {
    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Case-insensitive column match, with or without the `Q` prefix.
    pub fn resolve_column(&self, label: &str) -> Option<&str> {
        let wanted = label.trim();
        let bare = wanted
            .strip_prefix(['q', 'Q'])
            .map(str::trim)
            .filter(|rest| !rest.is_empty())
            .unwrap_or(wanted);
        self.question_order
            .iter()
            .find(|column| {
                let column_bare = column
                    .strip_prefix(['q', 'Q'])
                    .filter(|rest| !rest.is_empty())
                    .unwrap_or(column.as_str());
                column.eq_ignore_ascii_case(wanted) || column_bare.eq_ignore_ascii_case(bare)
            })
            .map(String::as_str)
    }
}

impl ResponseTable {
    /// Pivots to one row per student; a later duplicate (student, question)
    /// overwrites the earlier cell. Blank student ids get a `row_<n>` id.
    pub fn to_wide(&self) -> WideTable {
        let mut wide = WideTable::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (index, row) in self.rows.iter().enumerate() {
            let student_id = if row.student_id.is_empty() {
                format!("row_{}", index + 1)
            } else {
                row.student_id.clone()
            };
            let position = *positions.entry(student_id.clone()).or_insert_with(|| {
                wide.students.push(WideRow {
                    student_id,
                    answers: HashMap::new(),
                });
                wide.students.len() - 1
            });

            if row.question_id.is_empty() {
                continue;
            }
            if !wide.question_order.contains(&row.question_id) {
                wide.question_order.push(row.question_id.clone());
            }
            wide.students[position]
                .answers
                .insert(row.question_id.clone(), row.selected_answers.clone());
        }

        wide
    }
}
