//! Payload extraction from exported CSV files
//!
//! Export files carry one JSON payload per row in a dedicated column. All
//! columns are read as strings so the payload text reaches the decoder
//! untouched.

use crate::error::{IngestError, Result};
use crate::models::RawRecord;
use polars::prelude::{CsvReadOptions, SerReader};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Read the payload column of a CSV file, one entry per data row
pub fn read_payload_column(path: &Path, key: &str, column: &str) -> Result<Vec<Option<String>>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    if df.get_column_index(column).is_none() {
        return Err(IngestError::MissingPayloadColumn {
            key: key.to_string(),
            column: column.to_string(),
        });
    }

    let payloads: Vec<Option<String>> = df
        .column(column)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect();

    debug!("Read {} payload rows from {}", payloads.len(), key);
    Ok(payloads)
}

/// Decode one payload cell into a JSON object
pub fn decode_payload(cell: Option<&str>, key: &str, row: usize) -> Result<RawRecord> {
    let text = cell.ok_or_else(|| IngestError::malformed_row(key, row, "empty payload"))?;

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(IngestError::malformed_row(
            key,
            row,
            format!("payload is not an object: {}", json_type(&other)),
        )),
        Err(e) => Err(IngestError::malformed_row(key, row, e.to_string())),
    }
}

/// Name of a JSON value's type, for error messages
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
