use std::collections::HashMap;

/// One record of a sheet: column header to cell value.
/// Blank cells are not stored, so `get` returning `None` means "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from a header line and one value line, the way a sheet
    /// hands them out. Missing trailing cells are treated as blank.
    pub fn from_header(header: &[String], values: &[String]) -> Self {
        let mut row = Row::new();
        for (i, column) in header.iter().enumerate() {
            if let Some(value) = values.get(i) {
                row.set(column.trim(), value);
            }
        }
        row
    }

    pub fn set(&mut self, column: &str, value: &str) {
        if value.trim().is_empty() {
            self.cells.remove(column);
        } else {
            self.cells.insert(column.to_string(), value.to_string());
        }
    }

    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Trimmed, lower-cased cell value; empty when absent.
    pub fn norm(&self, column: &str) -> String {
        self.get(column)
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Row {
    fn from(cells: [(&str, &str); N]) -> Self {
        cells
            .into_iter()
            .fold(Row::new(), |row, (column, value)| row.with(column, value))
    }
}
