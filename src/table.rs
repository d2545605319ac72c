use crate::error::{BubblexanError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Header row plus trimmed cells, as read from a CSV file.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    lookup: HashMap<String, usize>,
}

impl RawTable {
    pub fn read_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BubblexanError::PathNotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }

    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let header = if index == 0 {
                    header.trim_start_matches('\u{feff}')
                } else {
                    header
                };
                header.trim().to_string()
            })
            .collect();
        if headers.iter().all(String::is_empty) {
            return Err(BubblexanError::InvalidInput(format!(
                "{source} is missing a header row"
            )));
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut cells: Vec<String> =
                record.iter().map(|cell| cell.trim().to_string()).collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }
            fold_surplus_cells(&mut cells, headers.len());
            rows.push(cells);
        }

        let lookup = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.to_lowercase(), index))
            .collect();

        Ok(Self {
            source: source.to_string(),
            headers,
            rows,
            lookup,
        })
    }

    /// Case-insensitive header position.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.lookup.get(&name.trim().to_lowercase()).copied()
    }

    pub fn first_column(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column(name))
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.column(name).is_none())
            .collect();
        if !missing.is_empty() {
            let mut sorted = missing;
            sorted.sort_unstable();
            return Err(BubblexanError::MissingColumns {
                file: self.source.clone(),
                columns: sorted.join(", "),
            });
        }
        Ok(names.iter().filter_map(|name| self.column(name)).collect())
    }

    pub fn cell<'a>(row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
}

// An unquoted `A,B` in the last column arrives as extra fields.
fn fold_surplus_cells(cells: &mut Vec<String>, header_len: usize) {
    if header_len == 0 || cells.len() <= header_len {
        cells.resize(header_len, String::new());
        return;
    }
    let surplus: Vec<String> = cells.split_off(header_len);
    let last = &mut cells[header_len - 1];
    let parts: Vec<&str> = std::iter::once(last.as_str())
        .chain(surplus.iter().map(String::as_str))
        .filter(|part| !part.is_empty())
        .collect();
    *last = parts.join(",");
}
