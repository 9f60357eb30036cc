//! Input loading for `apicheck`.
//!
//! This crate is the filesystem side of the check: it reads the API
//! catalogue (a `listApis` response), the struct descriptors produced by a
//! source model provider, and the optional YAML run configuration.
//!
//! # Quick start
//!
//! ```no_run
//! use apicheck_core::{Selection, SourceModel, validate};
//! use apicheck_loader::{collect_source_paths, load_catalogue, load_structs};
//!
//! let operations = load_catalogue("listApis.json").unwrap();
//! let paths = collect_source_paths(&["descriptors/".into()]).unwrap();
//! let model = SourceModel::from_structs(load_structs(&paths).unwrap());
//!
//! let report = validate(&operations, &model, &Selection::all());
//! print!("{}", report.render_text());
//! ```

mod catalogue;
mod config;
mod error;
mod sources;

pub use catalogue::{load_catalogue, parse_catalogue};
pub use config::{CheckConfig, OutputFormat};
pub use error::{LoadError, Result};
pub use sources::{SourceFile, collect_source_paths, load_structs, parse_structs};
