//! Cross-validation of API structs against an API catalogue.
//!
//! The crate compares two independently maintained descriptions of the same
//! API surface:
//!
//! - [`OperationSpec`] / [`ParameterSpec`]: the authoritative catalogue, one
//!   entry per operation with its request and response parameters.
//! - [`SourceModel`] / [`SourceEntity`]: the structs declared in code, with
//!   each field's serialized name, optionality, documentation, and type.
//!
//! [`match_operation`] aligns one operation with one struct and classifies
//! every field-level discrepancy as a [`ValidationError`]. [`check_model`]
//! does this for every operation that names a struct, and [`validate`] turns
//! the outcome into a [`Report`] with text rendering and an exit code.
//!
//! # Example
//!
//! ```
//! use apicheck_core::*;
//!
//! let operations = vec![
//!     OperationSpec::new("createZone")
//!         .with_param(ParameterSpec::required("zone", TypeCategory::String, "Zone name"))
//!         .with_param(ParameterSpec::required("count", TypeCategory::Integer, "Instances")),
//! ];
//! let model = SourceModel::from_structs([
//!     RawStruct::new("CreateZone", "zone.go:12:6")
//!         .with_field(RawField::tagged("Zone", "string", r#"json:"zone" doc:"Zone name""#))
//!         .with_field(RawField::tagged("Count", "int64", r#"json:"count" doc:"Instances""#)),
//! ]);
//!
//! let report = validate(&operations, &model, &Selection::command("createzone"));
//! assert_eq!(report.exit_code(), 1);
//! assert!(report.render_text().starts_with("count: expected to be a int, got \"int64\"\n"));
//! ```

mod check;
mod matcher;
mod report;
mod source;
mod spec;
mod taxonomy;

pub use check::{ASYNC_MARKER, CheckRun, EntityReport, Selection, check_model};
pub use matcher::{Findings, ValidationError, match_operation};
pub use report::{Report, validate};
pub use source::{RawField, RawStruct, SourceEntity, SourceField, SourceModel, TagInfo, parse_tag};
pub use spec::{OperationSpec, ParameterSpec, Which};
pub use taxonomy::{Accepts, SEQUENCE_PREFIX, TypeCategory};
