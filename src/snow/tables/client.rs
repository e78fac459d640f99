//! Client for the platform's table API.
//!
//! Requests never abort a run. A transport failure, a non-200 status or an
//! undecodable body is logged and reported as an empty result, which callers
//! treat as "nothing retrieved" for that table.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::snow::tables::config::{ApiEndpoint, Credentials, METADATA_TABLE};
use crate::snow::tables::error::Result;
use crate::snow::tables::model::{Row, TableRecord};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Source of table metadata and rows.
pub trait TableSource {
    /// Lists every table in the platform catalogue, in response order.
    fn list_tables(&self) -> Vec<TableRecord>;

    /// Fetches up to `limit` rows of `table`; `None` leaves the ceiling to the
    /// platform default.
    fn fetch_rows(&self, table: &str, limit: Option<usize>) -> Vec<Row>;
}

/// Blocking HTTP implementation of [`TableSource`].
pub struct TableApiClient {
    client: Client,
    endpoint: ApiEndpoint,
    username: String,
    password: String,
}

impl TableApiClient {
    pub fn new(endpoint: ApiEndpoint, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, endpoint, credentials))
    }

    fn with_client(client: Client, endpoint: ApiEndpoint, credentials: &Credentials) -> Self {
        Self {
            client,
            endpoint,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        }
    }

    /// Client for the hosted instance named in the credentials.
    pub fn for_instance(credentials: &Credentials) -> Result<Self> {
        Self::new(ApiEndpoint::for_instance(&credentials.instance), credentials)
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    fn get_result<T: DeserializeOwned>(&self, table: &str, limit: Option<usize>) -> Vec<T> {
        let mut request = self
            .client
            .get(self.endpoint.table_url(table))
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE);
        if let Some(limit) = limit {
            request = request.query(&[("sysparm_limit", limit)]);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(error) => {
                warn!(table, %error, "request failed");
                return Vec::new();
            }
        };

        let status = response.status();
        let body = match response.text() {
            Ok(body) => body,
            Err(error) => {
                warn!(table, status = status.as_u16(), %error, "failed to read response body");
                return Vec::new();
            }
        };

        decode_result(table, status, &body)
    }
}

impl TableSource for TableApiClient {
    #[instrument(level = "info", skip(self), fields(endpoint = %self.endpoint.base_url()))]
    fn list_tables(&self) -> Vec<TableRecord> {
        let tables: Vec<TableRecord> = self.get_result(METADATA_TABLE, None);
        debug!(table_count = tables.len(), "retrieved table catalogue");
        tables
    }

    #[instrument(level = "debug", skip(self))]
    fn fetch_rows(&self, table: &str, limit: Option<usize>) -> Vec<Row> {
        let rows: Vec<Row> = self.get_result(table, limit);
        debug!(row_count = rows.len(), "retrieved table rows");
        rows
    }
}

#[derive(Deserialize)]
struct ResultEnvelope<T> {
    result: Vec<T>,
}

/// Decodes a `{"result": [...]}` body, or logs and yields nothing.
fn decode_result<T: DeserializeOwned>(table: &str, status: StatusCode, body: &str) -> Vec<T> {
    if status != StatusCode::OK {
        warn!(
            table,
            status = status.as_u16(),
            response = body,
            "failed to retrieve data"
        );
        return Vec::new();
    }

    match serde_json::from_str::<ResultEnvelope<T>>(body) {
        Ok(envelope) => envelope.result,
        Err(error) => {
            warn!(table, %error, "unexpected response body");
            Vec::new()
        }
    }
}
