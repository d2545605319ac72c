pub mod wide;

use crate::answer_key::normalize_question_label;
use crate::error::{BubblexanError, Result};
use crate::table::RawTable;
use crate::types::option::{parse_selection, Selection};
use std::io::{Read, Write};
use std::path::Path;

pub const STUDENT_COLUMN: &str = "student_id";
pub const QUESTION_COLUMN: &str = "question_id";
pub const ANSWERS_COLUMN: &str = "selected_answers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Long,
    Wide,
}

/// One student's marks for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRow {
    pub student_id: String,
    pub question_id: String,
    /// Cell as scanned; may be empty or hold invalid tokens.
    pub selected_answers: String,
    /// Values for any columns beyond the three canonical ones.
    pub extra: Vec<String>,
}

impl ResponseRow {
    pub fn selection(&self) -> Selection {
        parse_selection(&self.selected_answers)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTable {
    pub format: SourceFormat,
    pub extra_headers: Vec<String>,
    pub rows: Vec<ResponseRow>,
}

impl ResponseTable {
    pub fn load(path: &Path) -> Result<Self> {
        let table = RawTable::read_path(path)?;
        Self::from_table(&table)
    }

    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let table = RawTable::from_reader(reader, source)?;
        Self::from_table(&table)
    }

    pub fn from_table(table: &RawTable) -> Result<Self> {
        // Either long-format column commits the file to long format.
        let has_long_columns =
            table.column(QUESTION_COLUMN).is_some() || table.column(ANSWERS_COLUMN).is_some();
        if has_long_columns {
            return Self::from_long(table);
        }
        if table.column(STUDENT_COLUMN).is_some() {
            return Ok(Self::from_wide(table));
        }
        Err(BubblexanError::MissingColumns {
            file: table.source.clone(),
            columns: [STUDENT_COLUMN, QUESTION_COLUMN, ANSWERS_COLUMN].join(", "),
        })
    }

    fn from_long(table: &RawTable) -> Result<Self> {
        let columns = table.require_columns(&[STUDENT_COLUMN, QUESTION_COLUMN, ANSWERS_COLUMN])?;
        let (student_col, question_col, answers_col) = (columns[0], columns[1], columns[2]);
        let extra_columns: Vec<usize> = (0..table.headers.len())
            .filter(|index| !columns.contains(index))
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|row| ResponseRow {
                student_id: normalize_student_id(RawTable::cell(row, student_col)),
                question_id: normalize_question_label(RawTable::cell(row, question_col)),
                selected_answers: RawTable::cell(row, answers_col).to_string(),
                extra: extra_columns
                    .iter()
                    .map(|&index| RawTable::cell(row, index).to_string())
                    .collect(),
            })
            .collect();

        Ok(Self {
            format: SourceFormat::Long,
            extra_headers: extra_columns
                .iter()
                .map(|&index| table.headers[index].clone())
                .collect(),
            rows,
        })
    }

    // One long row per (student, question column), in column order.
    fn from_wide(table: &RawTable) -> Self {
        let student_col = table.column(STUDENT_COLUMN).unwrap_or(0);
        let question_columns: Vec<(usize, String)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(index, header)| *index != student_col && !header.is_empty())
            .map(|(index, header)| (index, normalize_question_label(header)))
            .collect();

        let mut rows = Vec::with_capacity(table.rows.len() * question_columns.len());
        for (row_index, row) in table.rows.iter().enumerate() {
            let mut student_id = normalize_student_id(RawTable::cell(row, student_col));
            if student_id.is_empty() {
                student_id = format!("ROW_{}", row_index + 1);
            }
            for (column, label) in &question_columns {
                rows.push(ResponseRow {
                    student_id: student_id.clone(),
                    question_id: label.clone(),
                    selected_answers: RawTable::cell(row, *column).to_string(),
                    extra: Vec::new(),
                });
            }
        }

        Self {
            format: SourceFormat::Wide,
            extra_headers: Vec::new(),
            rows,
        }
    }

    pub fn headers(&self) -> Vec<String> {
        [STUDENT_COLUMN, QUESTION_COLUMN, ANSWERS_COLUMN]
            .iter()
            .map(ToString::to_string)
            .chain(self.extra_headers.iter().cloned())
            .collect()
    }

    /// Writes the long form: canonical columns first, extras after.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.headers())?;
        for row in &self.rows {
            let record = [&row.student_id, &row.question_id, &row.selected_answers]
                .into_iter()
                .chain(row.extra.iter());
            csv_writer.write_record(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn normalize_student_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}
