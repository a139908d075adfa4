use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Source;

/// Errors raised while acquiring a quiz document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("unable to fetch data, HTTP status code {status}")]
    Status { status: u16 },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The payload was not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Decode(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CSV data: {0}")]
    Csv(String),
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, FetchError> {
        if accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch one document. `key` is the top-level key CSV rows are wrapped
    /// under so file imports validate the same way as remote payloads.
    pub async fn fetch(&self, source: &Source, key: &str) -> Result<Value, FetchError> {
        info!(%source, "fetching quiz data");
        let document = match source {
            Source::Url(url) => self.fetch_url(url).await?,
            Source::File(path) => read_file(path, key)?,
        };
        debug!(%source, payload = %document, "fetched quiz data");
        Ok(document)
    }

    async fn fetch_url(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn read_file(path: &Path, key: &str) -> Result<Value, FetchError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let rows = import_csv(path)?;
        let mut document = Map::new();
        document.insert(key.to_string(), Value::Array(rows));
        return Ok(Value::Object(document));
    }

    let text = std::fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
}

const NUMERIC_COLUMNS: [&str; 3] = ["accuracy", "difficulty", "score"];

/// Reads a CSV export into flat JSON objects. Empty cells are left out so
/// they load as missing values. Only the measure columns are typed as
/// numbers; labels and times keep their exact text.
fn import_csv(path: &Path) -> Result<Vec<Value>, FetchError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| FetchError::Csv(e.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|e| FetchError::Csv(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FetchError::Csv(e.to_string()))?;
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let header = header.trim();
            let value = if NUMERIC_COLUMNS.contains(&header) {
                csv_number(cell)
            } else {
                Value::String(cell.to_string())
            };
            row.insert(header.to_string(), value);
        }
        rows.push(Value::Object(row));
    }

    Ok(rows)
}

fn csv_number(cell: &str) -> Value {
    if let Ok(int) = cell.parse::<i64>() {
        return Value::Number(Number::from(int));
    }
    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}
