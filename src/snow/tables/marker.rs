//! Column selection markers.
//!
//! Every exported column `C` is followed by a marker column `C_Y`. A curator
//! opts a column in by typing the sentinel `Y` into the first data cell of its
//! marker column; the filter stage reads that cell back and keeps only the
//! opted-in columns. Cells below the first data row are never consulted.

use tracing::warn;

use crate::snow::tables::model::TableFrame;

/// Suffix appended to a column name to form its marker column.
pub const MARKER_SUFFIX: &str = "_Y";
/// Marker cell value that selects the paired column.
pub const SENTINEL: &str = "Y";

pub fn marker_name(column: &str) -> String {
    format!("{column}{MARKER_SUFFIX}")
}

/// Returns the paired column name when `column` is a marker column.
pub fn original_name(column: &str) -> Option<&str> {
    column.strip_suffix(MARKER_SUFFIX)
}

/// Pairs every column with an empty marker column placed right after it.
pub fn with_markers(frame: &TableFrame) -> TableFrame {
    let columns = frame
        .columns
        .iter()
        .flat_map(|column| [column.clone(), marker_name(column)])
        .collect();
    let rows = frame
        .rows
        .iter()
        .map(|cells| {
            cells
                .iter()
                .flat_map(|cell| [cell.clone(), String::new()])
                .collect()
        })
        .collect();
    TableFrame::new(columns, rows)
}

/// Indices of the columns whose marker carries the sentinel, in marker column
/// order.
pub fn selected_columns(frame: &TableFrame) -> Vec<usize> {
    let mut selected = Vec::new();
    for (idx, column) in frame.columns.iter().enumerate() {
        let Some(original) = original_name(column) else {
            continue;
        };
        if frame.cell(0, idx) != Some(SENTINEL) {
            continue;
        }
        match frame.column_index(original) {
            Some(original_idx) if !selected.contains(&original_idx) => {
                selected.push(original_idx)
            }
            Some(_) => {}
            None => warn!(marker = %column, "marker selects a column that is not present"),
        }
    }
    selected
}

/// Keeps only the selected columns. Returns `None` when nothing is selected.
pub fn filter_frame(frame: &TableFrame) -> Option<TableFrame> {
    let selected = selected_columns(frame);
    if selected.is_empty() {
        None
    } else {
        Some(frame.select(&selected))
    }
}
