mod common;

use common::FakeSource;
use serde_json::json;
use snow_tables::config::parse_categories;
use snow_tables::export;
use snow_tables::io::{excel_read, excel_write};
use snow_tables::marker::SENTINEL;
use snow_tables::model::WorkbookData;
use tempfile::tempdir;

/// Stands in for the curator: types the sentinel into the first data cell of
/// the named marker column.
fn select(workbook: &mut WorkbookData, sheet: &str, marker_column: &str) {
    let table = workbook
        .tables
        .iter_mut()
        .find(|table| table.sheet_name == sheet)
        .expect("sheet present");
    let idx = table
        .frame
        .column_index(marker_column)
        .expect("marker column present");
    table.frame.rows[0][idx] = SENTINEL.to_string();
}

#[test]
fn selected_column_survives_filtering_unchanged() {
    let source = FakeSource::default()
        .with_table(
            "u_pairs",
            "Pairs",
            json!([
                {"A": "alpha", "B": "beta"},
                {"A": "", "B": "delta"},
                {"A": "gamma", "B": "epsilon"}
            ]),
        )
        .with_table("u_untouched", "Untouched", json!([{"C": "kept out"}]));
    let categories = parse_categories("pairs:u_pairs,u_untouched\n");
    let temp_dir = tempdir().expect("temporary directory");
    let unfiltered = temp_dir.path().join("unfiltered");
    let filtered_dir = temp_dir.path().join("filtered");

    export::export_categorized(&source, &categories, &unfiltered).expect("categorized export");

    let exported_path = unfiltered.join("pairs.xlsx");
    let mut exported = excel_read::read_workbook(&exported_path).expect("export read");
    select(&mut exported, "u_pairs", "A_Y");
    excel_write::write_workbook(&exported_path, &exported).expect("curated workbook saved");

    let summary = export::filter_workbooks(&unfiltered, &filtered_dir).expect("filter");

    let output = filtered_dir.join("filtered_pairs.xlsx");
    assert_eq!(summary.written, vec![output.clone()]);

    let filtered = excel_read::read_workbook(&output).expect("filtered read");
    assert_eq!(filtered.sheet_names(), vec!["u_pairs"]);
    let frame = &filtered.tables[0].frame;
    assert_eq!(frame.columns, vec!["A"]);
    assert_eq!(frame.rows, vec![vec!["alpha"], vec![""], vec!["gamma"]]);
}

#[test]
fn workbook_without_selection_is_not_written() {
    let source = FakeSource::default().with_table("incident", "Incident", json!([{"number": "1"}]));
    let categories = parse_categories("service:incident\n");
    let temp_dir = tempdir().expect("temporary directory");
    let unfiltered = temp_dir.path().join("unfiltered");
    let filtered_dir = temp_dir.path().join("filtered");

    export::export_categorized(&source, &categories, &unfiltered).expect("categorized export");
    let summary = export::filter_workbooks(&unfiltered, &filtered_dir).expect("filter");

    assert!(summary.written.is_empty());
    assert_eq!(summary.skipped, vec!["service.xlsx"]);
    assert!(!filtered_dir.join("filtered_service.xlsx").exists());
}

#[test]
fn selection_below_first_row_is_ignored() {
    let source = FakeSource::default().with_table(
        "incident",
        "Incident",
        json!([{"number": "1", "state": "new"}, {"number": "2", "state": "closed"}]),
    );
    let categories = parse_categories("service:incident\n");
    let temp_dir = tempdir().expect("temporary directory");
    let unfiltered = temp_dir.path().join("unfiltered");

    export::export_categorized(&source, &categories, &unfiltered).expect("categorized export");
    let path = unfiltered.join("service.xlsx");
    let mut workbook = excel_read::read_workbook(&path).expect("export read");
    let frame = &mut workbook.tables[0].frame;
    let number_marker = frame.column_index("number_Y").expect("marker");
    let state_marker = frame.column_index("state_Y").expect("marker");
    frame.rows[1][number_marker] = SENTINEL.to_string();
    frame.rows[0][state_marker] = SENTINEL.to_string();

    let filtered = export::filter_workbook(&workbook);

    assert_eq!(filtered.tables.len(), 1);
    assert_eq!(filtered.tables[0].frame.columns, vec!["state"]);
    assert_eq!(
        filtered.tables[0].frame.rows,
        vec![vec!["new"], vec!["closed"]]
    );
}

#[test]
fn column_widths_track_longest_cell() {
    let frame = snow_tables::model::TableFrame::new(
        vec!["id".into(), "description".into()],
        vec![
            vec!["12345".into(), "short".into()],
            vec!["1".into(), "".into()],
        ],
    );

    assert_eq!(excel_write::column_widths(&frame), vec![7, 13]);
}
