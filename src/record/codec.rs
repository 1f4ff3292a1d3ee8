//! Table file codec
//!
//! Whole-document JSON decode/encode for a table's record array.

use std::path::Path;

use serde_json::Value;

use crate::error::{Result, TableError};

use super::Record;

/// Decode a table file's full content into records
///
/// Empty (or whitespace-only) content is an empty table. Anything that is not
/// a JSON array of objects is reported as `CorruptData`.
pub fn decode_records(path: &Path, content: &str) -> Result<Vec<Record>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let corrupt = |reason: String| TableError::CorruptData {
        path: path.to_path_buf(),
        reason,
    };

    let document: Value = serde_json::from_str(content).map_err(|e| corrupt(e.to_string()))?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(corrupt(format!(
                "expected a JSON array, found {}",
                kind_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(corrupt(format!(
                "element {} is {}, expected an object",
                i,
                kind_name(&other)
            ))),
        })
        .collect()
}

/// Encode records as a compact JSON array
pub fn encode_records(records: &[Record]) -> Result<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| TableError::Serialization(e.to_string()))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
