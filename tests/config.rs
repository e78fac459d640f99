use std::fs;

use snow_tables::ExportError;
use snow_tables::config::{self, ApiEndpoint};
use tempfile::tempdir;

#[test]
fn credentials_build_instance_endpoint() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("credentials.txt");
    fs::write(
        &path,
        "instance=dev98765\nusername=admin\npassword=pa=ss\nthis line is ignored\n",
    )
    .expect("credentials written");

    let credentials = config::read_credentials(&path).expect("credentials read");
    let endpoint = ApiEndpoint::for_instance(&credentials.instance);

    assert_eq!(credentials.username, "admin");
    assert_eq!(credentials.password, "pa=ss");
    assert_eq!(
        endpoint.base_url(),
        "https://dev98765.service-now.com/api/now/table/"
    );
    assert_eq!(
        endpoint.table_url("sys_db_object"),
        "https://dev98765.service-now.com/api/now/table/sys_db_object"
    );
}

#[test]
fn missing_credential_keys_are_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("credentials.txt");
    fs::write(&path, "instance=dev98765\nuser name admin\n").expect("credentials written");

    let error = config::read_credentials(&path).expect_err("credentials incomplete");

    match error {
        ExportError::MissingCredentials { keys, .. } => {
            assert_eq!(keys, vec!["username", "password"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_credentials_file_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("absent.txt");

    let error = config::read_credentials(&path).expect_err("file absent");

    assert!(matches!(error, ExportError::MissingConfig(missing) if missing == path));
}

#[test]
fn categories_keep_file_order() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("categories.txt");
    fs::write(
        &path,
        "incidents:incident,incident_task\nno separator here\ncmdb:cmdb_ci, cmdb_rel_ci,\n",
    )
    .expect("categories written");

    let categories = config::read_categories(&path).expect("categories read");
    let entries: Vec<(&str, Vec<&str>)> = categories
        .iter()
        .map(|category| {
            (
                category.name.as_str(),
                category.tables.iter().map(String::as_str).collect(),
            )
        })
        .collect();

    assert_eq!(
        entries,
        vec![
            ("incidents", vec!["incident", "incident_task"]),
            ("cmdb", vec!["cmdb_ci", "cmdb_rel_ci"]),
        ]
    );
}

#[test]
fn empty_categories_file_is_rejected() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("categories.txt");
    fs::write(&path, "\nnothing useful\n").expect("categories written");

    let error = config::read_categories(&path).expect_err("no categories");

    assert!(matches!(error, ExportError::NoCategories(_)));
}

#[test]
fn base_url_override_gains_trailing_slash() {
    let endpoint = ApiEndpoint::with_base_url("http://localhost:8080/api/now/table");

    assert_eq!(
        endpoint.table_url("incident"),
        "http://localhost:8080/api/now/table/incident"
    );
}
