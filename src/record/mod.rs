//! Record Module
//!
//! Data model for table rows.
//!
//! ## Responsibilities
//! - Represent schemaless rows as insertion-ordered JSON objects
//! - Decode/encode a table file (one JSON array of objects)
//! - Loose value comparison used by select/update/delete
//!
//! ## File Format
//! ```text
//! [
//!   {"ID": "0", "Name": "Hans", "Age": "12"},
//!   {"ID": "1", "Name": "Karl", "Age": "15"}
//! ]
//! ```
//! The whole file is one JSON value. An empty file is an empty table.

mod codec;
mod compare;

pub use codec::{decode_records, encode_records};
pub use compare::{is_numeric_str, loose_eq, truthy};

use serde_json::{Map, Value};

/// A single table row: field name → arbitrary JSON value
pub type Record = Map<String, Value>;

/// Check whether `record` has a non-null `key` loosely equal to `value`
///
/// A field holding `null` counts as absent and never matches.
pub fn matches(record: &Record, key: &str, value: &Value) -> bool {
    match record.get(key) {
        Some(Value::Null) | None => false,
        Some(field) => loose_eq(field, value),
    }
}
