use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single record as returned by the table API. Keys keep the order the API
/// emitted them in.
pub type Row = serde_json::Map<String, Value>;

/// Entry of the platform's table catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl TableRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }
}

/// Column-ordered table of string cells whose schema is only known at
/// runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableFrame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a frame from API records. Columns are the union of all record
    /// keys in first-seen order; absent keys become empty cells.
    pub fn from_rows(records: &[Row]) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in records {
            for key in record.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map(value_to_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Projects the frame onto the given column indices, in that order.
    pub fn select(&self, indices: &[usize]) -> TableFrame {
        let columns = indices
            .iter()
            .map(|&idx| self.columns[idx].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|cells| {
                indices
                    .iter()
                    .map(|&idx| cells.get(idx).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        TableFrame { columns, rows }
    }
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub frame: TableFrame,
}

/// Represents all sheets of one workbook, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

impl WorkbookData {
    pub fn sheet(&self, name: &str) -> Option<&SheetTable> {
        self.tables.iter().find(|table| table.sheet_name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.tables
            .iter()
            .map(|table| table.sheet_name.as_str())
            .collect()
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(value) => value.clone(),
        other => other.to_string(),
    }
}

/// Hands out Excel-safe, unique sheet names.
#[derive(Debug, Default)]
pub struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    pub fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let prefix = truncate_chars(&base, MAX_SHEET_NAME - suffix.len());
            let candidate = format!("{prefix}{suffix}");
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

const MAX_SHEET_NAME: usize = 31;

fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "Sheet".to_string();
    }

    truncate_chars(sanitized, MAX_SHEET_NAME)
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
