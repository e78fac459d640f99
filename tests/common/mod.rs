#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;
use snow_tables::client::TableSource;
use snow_tables::model::{Row, TableRecord};

/// In-memory stand-in for the table API. Tables without registered rows
/// behave like a failed request.
#[derive(Default)]
pub struct FakeSource {
    pub catalogue: Vec<TableRecord>,
    pub rows: HashMap<String, Vec<Row>>,
    pub requests: RefCell<Vec<(String, Option<usize>)>>,
}

impl FakeSource {
    pub fn with_table(mut self, name: &str, label: &str, rows: Value) -> Self {
        self.catalogue.push(TableRecord {
            name: name.to_string(),
            label: Some(label.to_string()),
        });
        let rows = match rows {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        self.rows.insert(name.to_string(), rows);
        self
    }

    pub fn with_failing_table(mut self, name: &str) -> Self {
        self.catalogue.push(TableRecord::new(name));
        self
    }

    pub fn requested_tables(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(table, _)| table.clone())
            .collect()
    }
}

impl TableSource for FakeSource {
    fn list_tables(&self) -> Vec<TableRecord> {
        self.catalogue.clone()
    }

    fn fetch_rows(&self, table: &str, limit: Option<usize>) -> Vec<Row> {
        self.requests.borrow_mut().push((table.to_string(), limit));
        let rows = self.rows.get(table).cloned().unwrap_or_default();
        match limit {
            Some(limit) => rows.into_iter().take(limit).collect(),
            None => rows,
        }
    }
}
