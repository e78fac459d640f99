//! Core library for the snow-tables command line application.
//!
//! The library exposes the stages that power the command-line interface as
//! well as the integration tests. Configuration parsing lives in
//! [`snow::tables::config`], the remote table API behind the
//! [`TableSource`](snow::tables::client::TableSource) seam in
//! [`snow::tables::client`], spreadsheet and CSV adapters under
//! [`snow::tables::io`], the column selection convention in
//! [`snow::tables::marker`], and the end-to-end stages in
//! [`snow::tables::export`].

pub mod snow;

pub use snow::tables::{
    ExportError, Result, categorize, client, config, error, export, io, logging, marker, model,
};
