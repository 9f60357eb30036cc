//! Struct descriptor loading.
//!
//! A source model provider (an AST walker, a reflection dump, ...) writes one
//! or more JSON files of the form `{"structs": [...]}`. Each entry is a
//! [`RawStruct`]; see its documentation for the field keys.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use apicheck_core::RawStruct;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LoadError, Result};

/// One descriptor file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub structs: Vec<RawStruct>,
}

/// Expands files and directories into a sorted list of descriptor files.
///
/// Directories contribute every `*.json` file they contain (not recursive).
///
/// # Errors
///
/// Returns [`LoadError::InvalidInput`] when no inputs are given, a path does
/// not exist, a file does not end in `.json`, or no descriptor files are
/// found.
pub fn collect_source_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        return Err(LoadError::InvalidInput(
            "No source descriptor paths were provided".to_string(),
        ));
    }

    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            for entry in fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && path.extension() == Some(OsStr::new("json")) {
                    paths.insert(path);
                }
            }
            continue;
        }

        if input.is_file() {
            if input.extension() != Some(OsStr::new("json")) {
                return Err(LoadError::InvalidInput(format!(
                    "Source descriptor '{}' must end in .json",
                    input.display()
                )));
            }
            paths.insert(input.clone());
            continue;
        }

        return Err(LoadError::InvalidInput(format!(
            "Source path '{}' does not exist",
            input.display()
        )));
    }

    if paths.is_empty() {
        return Err(LoadError::InvalidInput(
            "No source descriptor JSON files found in provided paths".to_string(),
        ));
    }

    Ok(paths.into_iter().collect())
}

/// Parses one descriptor document.
///
/// # Examples
///
/// ```
/// let raw = r#"{"structs": [{"name": "ListZones", "position": "zones.go:10:6",
///     "fields": [{"name": "ID", "type": "*UUID", "tag": "json:\"id,omitempty\""}]}]}"#;
/// let structs = apicheck_loader::parse_structs(raw).unwrap();
/// assert_eq!(structs[0].fields[0].type_signature, "*UUID");
/// ```
pub fn parse_structs(raw: &str) -> Result<Vec<RawStruct>> {
    let file: SourceFile = serde_json::from_str(raw)?;
    Ok(file.structs)
}

/// Loads every descriptor file, concatenating structs in path order.
///
/// # Errors
///
/// Returns [`LoadError::IoError`] or [`LoadError::JsonError`] for the first
/// file that cannot be read or parsed.
pub fn load_structs(paths: &[PathBuf]) -> Result<Vec<RawStruct>> {
    let mut structs = Vec::new();

    for path in paths {
        let loaded = load_file(path)?;
        debug!(path = %path.display(), structs = loaded.len(), "loaded descriptor file");
        structs.extend(loaded);
    }

    info!(files = paths.len(), structs = structs.len(), "loaded source model");
    Ok(structs)
}

fn load_file(path: &Path) -> Result<Vec<RawStruct>> {
    let raw = fs::read_to_string(path)?;
    parse_structs(&raw).map_err(|err| match err {
        LoadError::JsonError(json) => LoadError::InvalidInput(format!(
            "Invalid source descriptor '{}': {json}",
            path.display()
        )),
        other => other,
    })
}
