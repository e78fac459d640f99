use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::snow::tables::categorize::categorize;
use crate::snow::tables::client::TableSource;
use crate::snow::tables::config::{CategoryMap, DEFAULT_ROW_LIMIT};
use crate::snow::tables::error::{ExportError, Result};
use crate::snow::tables::io::{csv_write, excel_read, excel_write};
use crate::snow::tables::marker;
use crate::snow::tables::model::{SheetNameRegistry, SheetTable, TableFrame, WorkbookData};

/// Sheet holding the table catalogue.
pub const TABLES_SHEET: &str = "Tables";
/// Directory the categorized export writes into.
pub const UNFILTERED_DIR: &str = "unfiltered";
/// Prefix of every workbook written by the filter stage.
pub const FILTERED_PREFIX: &str = "filtered_";

const WORKBOOK_EXTENSION: &str = "xlsx";

/// Files produced by a stage and the tables it skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

/// Writes the table catalogue (name and label) into a single-sheet workbook.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn list_tables(source: &impl TableSource, output: &Path) -> Result<usize> {
    let tables = source.list_tables();
    info!(table_count = tables.len(), "retrieved table names");

    let rows = tables
        .into_iter()
        .map(|table| vec![table.name, table.label.unwrap_or_default()])
        .collect::<Vec<_>>();
    let count = rows.len();
    let workbook = WorkbookData {
        tables: vec![SheetTable {
            sheet_name: TABLES_SHEET.to_string(),
            frame: TableFrame::new(vec!["name".into(), "description".into()], rows),
        }],
    };

    ensure_parent(output)?;
    excel_write::write_workbook(output, &workbook)?;
    info!("table catalogue written");
    Ok(count)
}

/// Writes one CSV file per table. `table_limit` caps how many catalogue
/// entries are processed; `None` or `Some(0)` processes all of them.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), ?table_limit))]
pub fn export_csv(
    source: &impl TableSource,
    output_dir: &Path,
    table_limit: Option<usize>,
) -> Result<ExportSummary> {
    fs::create_dir_all(output_dir)?;

    let mut tables = source.list_tables();
    if let Some(limit) = table_limit.filter(|limit| *limit > 0) {
        tables.truncate(limit);
    }
    info!(table_count = tables.len(), "exporting tables");

    let mut summary = ExportSummary::default();
    for table in tables {
        let rows = source.fetch_rows(&table.name, Some(DEFAULT_ROW_LIMIT));
        if rows.is_empty() {
            debug!(table = %table.name, "no rows retrieved, skipping");
            summary.skipped.push(table.name);
            continue;
        }

        let frame = TableFrame::from_rows(&rows);
        let path = output_dir.join(format!("{}.csv", table.name));
        csv_write::write_csv(&path, &frame)?;
        info!(
            table = %table.name,
            path = %path.display(),
            rows = frame.rows.len(),
            "table written"
        );
        summary.written.push(path);
    }

    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        "CSV export complete"
    );
    Ok(summary)
}

/// Writes one workbook per category with one marker-paired sheet per table.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub fn export_categorized(
    source: &impl TableSource,
    categories: &CategoryMap,
    output_dir: &Path,
) -> Result<ExportSummary> {
    fs::create_dir_all(output_dir)?;

    let names: Vec<String> = source
        .list_tables()
        .into_iter()
        .map(|table| table.name)
        .collect();
    let grouped = categorize(&names, categories);

    let mut summary = ExportSummary::default();
    for group in grouped {
        let mut sheet_names = SheetNameRegistry::default();
        let mut workbook = WorkbookData::default();

        for table in group.tables {
            let rows = source.fetch_rows(&table, None);
            if rows.is_empty() {
                debug!(category = %group.category, %table, "no rows retrieved, skipping");
                summary.skipped.push(table);
                continue;
            }

            let frame = marker::with_markers(&TableFrame::from_rows(&rows));
            workbook.tables.push(SheetTable {
                sheet_name: sheet_names.assign(&table),
                frame,
            });
        }

        if workbook.tables.is_empty() {
            warn!(category = %group.category, "no table data for category, workbook not written");
            continue;
        }

        let path = output_dir.join(format!("{}.{WORKBOOK_EXTENSION}", group.category));
        excel_write::write_workbook(&path, &workbook)?;
        info!(
            category = %group.category,
            path = %path.display(),
            sheets = workbook.tables.len(),
            "category workbook written"
        );
        summary.written.push(path);
    }

    info!(written = summary.written.len(), "categorized export complete");
    Ok(summary)
}

/// Reduces every workbook in `input_dir` to the columns selected by its
/// markers. Sheets with no selection are dropped; a workbook left with no
/// sheet is not written.
#[instrument(
    level = "info",
    skip_all,
    fields(input_dir = %input_dir.display(), output_dir = %output_dir.display())
)]
pub fn filter_workbooks(input_dir: &Path, output_dir: &Path) -> Result<ExportSummary> {
    if !input_dir.is_dir() {
        return Err(ExportError::MissingInput(input_dir.to_path_buf()));
    }
    fs::create_dir_all(output_dir)?;

    let mut summary = ExportSummary::default();
    for path in workbook_paths(input_dir)? {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let source = excel_read::read_workbook(&path)?;
        let filtered = filter_workbook(&source);
        for sheet in &source.tables {
            if filtered.sheet(&sheet.sheet_name).is_none() {
                debug!(
                    workbook = file_name,
                    sheet = %sheet.sheet_name,
                    "no column selected, sheet dropped"
                );
            }
        }

        if filtered.tables.is_empty() {
            warn!(workbook = file_name, "no sheet has a selected column, workbook not written");
            summary.skipped.push(file_name.to_string());
            continue;
        }

        let output = output_dir.join(format!("{FILTERED_PREFIX}{file_name}"));
        excel_write::write_workbook(&output, &filtered)?;
        info!(
            path = %output.display(),
            sheets = filtered.tables.len(),
            "filtered workbook written"
        );
        summary.written.push(output);
    }

    info!(written = summary.written.len(), "filtering complete");
    Ok(summary)
}

/// Keeps, per sheet, the columns selected by markers, preserving sheet order.
pub fn filter_workbook(workbook: &WorkbookData) -> WorkbookData {
    let tables = workbook
        .tables
        .iter()
        .filter_map(|sheet| {
            marker::filter_frame(&sheet.frame).map(|frame| SheetTable {
                sheet_name: sheet.sheet_name.clone(),
                frame,
            })
        })
        .collect();
    WorkbookData { tables }
}

fn workbook_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_workbook = path
            .extension()
            .is_some_and(|extension| extension == WORKBOOK_EXTENSION);
        if path.is_file() && is_workbook {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}
