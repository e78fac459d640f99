use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::snow::tables::error::{ExportError, Result};
use crate::snow::tables::model::{SheetTable, TableFrame, WorkbookData};

/// Reads every sheet of a workbook, in workbook order, treating the first row
/// of each sheet as its header.
pub fn read_workbook(path: &Path) -> Result<WorkbookData> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut tables = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = read_required_sheet(&mut workbook, &sheet_name)?;
        tables.push(SheetTable {
            sheet_name,
            frame: range_to_frame(&range),
        });
    }

    Ok(WorkbookData { tables })
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ExportError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ExportError::from)?;
    Ok(range)
}

fn range_to_frame(range: &calamine::Range<DataType>) -> TableFrame {
    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| cell_to_string(Some(cell))).collect(),
        None => return TableFrame::default(),
    };

    let rows = rows
        .map(|row| {
            (0..columns.len())
                .map(|col_idx| cell_to_string(row.get(col_idx)))
                .collect()
        })
        .collect();

    TableFrame::new(columns, rows)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
