use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error type covering the failures that abort a run.
///
/// Failures of a single remote table request are not represented here: the
/// client logs them and hands back an empty result so the run can continue.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Errors bubbled up from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when the HTTP client cannot be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when a local configuration file does not exist.
    #[error("the file {0} was not found")]
    MissingConfig(PathBuf),

    /// Raised when the credentials file lacks one or more required keys.
    #[error("credentials are missing or improperly formatted in {path}: missing {}", keys.join(", "))]
    MissingCredentials {
        path: PathBuf,
        keys: Vec<&'static str>,
    },

    /// Raised when the categories file yields no usable category.
    #[error("categories are missing or improperly formatted in {0}")]
    NoCategories(PathBuf),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the directory to filter does not exist.
    #[error("input directory not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
