use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::warn;

use crate::snow::tables::error::Result;
use crate::snow::tables::model::{TableFrame, WorkbookData};

/// Padding added to the longest cell of a column.
pub const COLUMN_PADDING: usize = 2;
/// Widest column Excel accepts, in character units.
const MAX_COLUMN_WIDTH: usize = 255;
/// Longest string Excel stores in a single cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Writes the provided workbook data to the given path, replacing any
/// existing file.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        let frame = &table.frame;
        for (col_idx, header) in frame.columns.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, row) in frame.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let fitted = fit_cell(cell);
                if fitted.len() < cell.len() {
                    warn!(
                        sheet = %table.sheet_name,
                        column = frame.columns.get(col_idx).map(String::as_str).unwrap_or_default(),
                        row = row_idx + 1,
                        "cell exceeds Excel's length limit, truncated"
                    );
                }
                worksheet.write_string((row_idx + 1) as u32, col_idx as u16, fitted)?;
            }
        }

        for (col_idx, width) in column_widths(frame).into_iter().enumerate() {
            worksheet.set_column_width(col_idx as u16, width as f64)?;
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}

/// Cuts a cell down to the characters Excel accepts.
fn fit_cell(cell: &str) -> &str {
    match cell.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &cell[..end],
        None => cell,
    }
}

/// Width of every column: the longest cell, header included, plus padding.
pub fn column_widths(frame: &TableFrame) -> Vec<usize> {
    frame
        .columns
        .iter()
        .enumerate()
        .map(|(col_idx, header)| {
            let longest = frame
                .rows
                .iter()
                .filter_map(|row| row.get(col_idx))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}
