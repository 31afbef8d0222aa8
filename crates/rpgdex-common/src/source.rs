//! Structured-collection reader.
//!
//! Collections are JSON arrays on disk. Reading one yields either the parsed
//! elements, [`Error::NotFound`] when the file is absent, or
//! [`Error::Malformed`] when it exists but is not a JSON array.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::{Error, Result};

/// Read and parse any JSON document.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(Error::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&text).map_err(|e| Error::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read a collection file as a JSON array.
pub fn read_collection(path: &Path) -> Result<Vec<Value>> {
    match read_document(path)? {
        Value::Array(items) => Ok(items),
        other => Err(Error::Malformed {
            path: path.to_path_buf(),
            reason: format!("expected a JSON array, found {}", json_type_name(&other)),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
