//! API catalogue loading.
//!
//! The catalogue is the JSON response of the `listApis` call, either bare
//! (`{"count": N, "api": [...]}`) or still wrapped in its response envelope
//! (`{"listapisresponse": {...}}`).

use std::path::Path;

use apicheck_core::OperationSpec;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{LoadError, Result};

const RESPONSE_ENVELOPE: &str = "listapisresponse";

#[derive(Debug, Deserialize)]
struct Catalogue {
    #[serde(default)]
    count: Option<usize>,
    api: Vec<OperationSpec>,
}

/// Loads the operations of a catalogue file.
///
/// # Errors
///
/// Returns [`LoadError::IoError`] if the file cannot be read, or
/// [`LoadError::JsonError`] / [`LoadError::InvalidInput`] if it is not a
/// catalogue.
pub fn load_catalogue(path: impl AsRef<Path>) -> Result<Vec<OperationSpec>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let operations = parse_catalogue(&raw).map_err(|err| match err {
        LoadError::InvalidInput(msg) => {
            LoadError::InvalidInput(format!("'{}': {msg}", path.display()))
        }
        other => other,
    })?;
    info!(path = %path.display(), operations = operations.len(), "loaded catalogue");
    Ok(operations)
}

/// Parses catalogue JSON into operations, in document order.
///
/// # Examples
///
/// ```
/// let raw = r#"{"listapisresponse": {"count": 1, "api": [
///     {"name": "listZones", "isasync": false,
///      "params": [{"name": "id", "type": "uuid", "required": false, "description": "the ID"}],
///      "response": []}
/// ]}}"#;
/// let operations = apicheck_loader::parse_catalogue(raw).unwrap();
/// assert_eq!(operations[0].name, "listZones");
/// assert_eq!(operations[0].parameters[0].name, "id");
/// ```
pub fn parse_catalogue(raw: &str) -> Result<Vec<OperationSpec>> {
    let mut document: Value = serde_json::from_str(raw)?;

    let body = match document
        .as_object_mut()
        .and_then(|map| map.remove(RESPONSE_ENVELOPE))
    {
        Some(inner) => inner,
        None => document,
    };
    if !body.is_object() || body.get("api").is_none() {
        return Err(LoadError::InvalidInput(
            "catalogue has no \"api\" list".to_string(),
        ));
    }

    let catalogue: Catalogue = serde_json::from_value(body)?;
    if let Some(count) = catalogue.count {
        if count != catalogue.api.len() {
            warn!(
                count,
                found = catalogue.api.len(),
                "catalogue count does not match its api list"
            );
        }
    }

    Ok(catalogue.api)
}
