pub mod categorize;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod io;
pub mod logging;
pub mod marker;
pub mod model;

pub use error::{ExportError, Result};
