//! Local configuration: the credentials file, the categories file and the
//! API endpoint derived from them.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::snow::tables::error::{ExportError, Result};

/// Domain under which every platform instance is hosted.
pub const PLATFORM_DOMAIN: &str = "service-now.com";
/// Pseudo-table describing every table known to the instance.
pub const METADATA_TABLE: &str = "sys_db_object";
/// Row ceiling requested by the flat CSV export.
pub const DEFAULT_ROW_LIMIT: usize = 10_000;

const REQUIRED_KEYS: [&str; 3] = ["instance", "username", "password"];

/// Login details for a single platform instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub instance: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("instance", &self.instance)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    /// Builds credentials from parsed `key=value` pairs, reporting every
    /// required key that is absent.
    pub fn from_map(mut values: BTreeMap<String, String>, path: &Path) -> Result<Self> {
        let missing: Vec<&'static str> = REQUIRED_KEYS
            .into_iter()
            .filter(|key| !values.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(ExportError::MissingCredentials {
                path: path.to_path_buf(),
                keys: missing,
            });
        }

        let mut take = |key: &str| values.remove(key).unwrap_or_default();
        Ok(Self {
            instance: take("instance"),
            username: take("username"),
            password: take("password"),
        })
    }
}

/// Parses `key=value` lines. Lines without `=` are skipped and the value
/// keeps any further `=` characters.
pub fn parse_credentials(source: &str) -> BTreeMap<String, String> {
    source
        .lines()
        .filter_map(|line| line.trim().split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Reads and validates the credentials file.
pub fn read_credentials(path: &Path) -> Result<Credentials> {
    let source = read_config_file(path)?;
    let values = parse_credentials(&source);
    debug!(keys = values.len(), path = %path.display(), "parsed credentials file");
    Credentials::from_map(values, path)
}

/// A named group of tables written into one workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub tables: Vec<String>,
}

/// Categories in the order they appear in the categories file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

impl CategoryMap {
    /// Inserts a category. A repeated name keeps its original position and
    /// takes the new table list.
    pub fn insert(&mut self, name: String, tables: Vec<String>) {
        match self.categories.iter_mut().find(|entry| entry.name == name) {
            Some(existing) => existing.tables = tables,
            None => self.categories.push(Category { name, tables }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Parses `category:table1,table2` lines. Lines without `:` are skipped.
pub fn parse_categories(source: &str) -> CategoryMap {
    let mut map = CategoryMap::default();
    for (name, tables) in source
        .lines()
        .filter_map(|line| line.trim().split_once(':'))
    {
        let tables = tables
            .split(',')
            .map(str::trim)
            .filter(|table| !table.is_empty())
            .map(str::to_string)
            .collect();
        map.insert(name.to_string(), tables);
    }
    map
}

/// Reads the categories file, rejecting a file that defines no category.
pub fn read_categories(path: &Path) -> Result<CategoryMap> {
    let source = read_config_file(path)?;
    let categories = parse_categories(&source);
    if categories.is_empty() {
        return Err(ExportError::NoCategories(path.to_path_buf()));
    }
    debug!(categories = categories.len(), path = %path.display(), "parsed categories file");
    Ok(categories)
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => ExportError::MissingConfig(path.to_path_buf()),
        _ => ExportError::Io(error),
    })
}

/// Base address of the table API for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    base_url: String,
}

impl ApiEndpoint {
    /// Endpoint of the hosted instance named by `instance`.
    pub fn for_instance(instance: &str) -> Self {
        Self {
            base_url: format!("https://{instance}.{PLATFORM_DOMAIN}/api/now/table/"),
        }
    }

    /// Endpoint rooted at an arbitrary base URL; a trailing `/` is added when
    /// missing.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}{table}", self.base_url)
    }
}
