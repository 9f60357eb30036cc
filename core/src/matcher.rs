//! Field-level matching of a catalogue operation against a source struct.
//!
//! [`match_operation`] aligns the operation's parameters with the struct's
//! fields by serialized name and classifies every discrepancy into a
//! [`ValidationError`]. Findings are keyed by field name; each name carries at
//! most one finding.
//!
//! # Examples
//!
//! ```
//! use apicheck_core::*;
//!
//! let op = OperationSpec::new("listZones")
//!     .with_param(ParameterSpec::optional("id", TypeCategory::Uuid, "the ID of the zone"))
//!     .with_param(ParameterSpec::optional("name", TypeCategory::String, "the name of the zone"));
//! let entity = SourceEntity::from_raw(
//!     &RawStruct::new("ListZones", "zones.go:10:6")
//!         .with_field(RawField::tagged(
//!             "ID",
//!             "*UUID",
//!             r#"json:"id,omitempty" doc:"the ID of the zone""#,
//!         ))
//!         .with_field(RawField::tagged("Available", "*bool", r#"json:"available,omitempty""#)),
//! );
//!
//! let findings = match_operation(&op, &entity, Which::Request);
//! assert_eq!(findings.len(), 2);
//! assert!(matches!(findings["name"], ValidationError::MissingField(_)));
//! assert_eq!(findings["available"], ValidationError::ExtraField);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::{OperationSpec, ParameterSpec, SourceEntity, SourceField, TypeCategory, Which};

/// Findings for one struct, keyed by field name.
pub type Findings = BTreeMap<String, ValidationError>;

/// One field-level inconsistency between a struct and the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    /// Exported field carries no serialized name; it can never match.
    #[error("field error: no json annotation found")]
    MissingSerializedName,
    /// Catalogue parameter without a corresponding field.
    #[error("missing field:\n\t{}", declaration(.0))]
    MissingField(ParameterSpec),
    /// Field has no documentation string.
    #[error("missing doc:\n\t\t`doc:{0:?}`")]
    DocumentationMissing(String),
    #[error("wrong doc want {expected:?} got {actual:?}")]
    DocumentationMismatch { expected: String, actual: String },
    /// Field optionality disagrees with the parameter's `required` flag.
    #[error("wrong omitempty, want {}", optionality(.expected_required))]
    OptionalityMismatch { expected_required: bool },
    #[error("expected to be a {expected}, got {actual:?}")]
    TypeMismatch { expected: String, actual: String },
    /// Catalogue category outside the taxonomy.
    #[error("unknown type {category:?} <=> {actual:?}")]
    UnknownSpecCategory { category: String, actual: String },
    /// Field with no corresponding catalogue parameter.
    #[error("extra field found")]
    ExtraField,
}

fn declaration(param: &ParameterSpec) -> String {
    param.suggested_declaration()
}

fn optionality(required: &bool) -> &'static str {
    if *required { "required" } else { "omitempty" }
}

/// Matches the `which` parameter list of `op` against `entity`.
///
/// The entity is left untouched; consumption happens on a private working
/// set, so repeated calls on the same inputs return identical findings.
/// Parameters are processed in catalogue order. A parameter name listed twice
/// finds its field already consumed the second time and is reported missing.
pub fn match_operation(op: &OperationSpec, entity: &SourceEntity, which: Which) -> Findings {
    let mut findings = Findings::new();

    for name in &entity.unnamed_fields {
        findings.insert(name.clone(), ValidationError::MissingSerializedName);
    }

    let mut remaining: BTreeMap<&str, &SourceField> = entity
        .fields
        .iter()
        .map(|(name, field)| (name.as_str(), field))
        .collect();

    for param in op.parameters_for(which) {
        let Some(field) = remaining.remove(param.name.as_str()) else {
            findings.insert(
                param.name.clone(),
                ValidationError::MissingField(param.clone()),
            );
            continue;
        };
        if let Some(finding) = classify(param, field) {
            findings.insert(param.name.clone(), finding);
        }
    }

    for name in remaining.into_keys() {
        findings.insert(name.to_string(), ValidationError::ExtraField);
    }

    findings
}

/// Classifies one matched field.
///
/// Precedence, highest first: unknown category, optionality, type,
/// documentation. A type check is never reported once optionality failed.
fn classify(param: &ParameterSpec, field: &SourceField) -> Option<ValidationError> {
    if let TypeCategory::Unknown(raw) = &param.category {
        return Some(ValidationError::UnknownSpecCategory {
            category: raw.clone(),
            actual: field.type_signature.clone(),
        });
    }
    if field.optional == param.required {
        return Some(ValidationError::OptionalityMismatch {
            expected_required: param.required,
        });
    }
    param
        .category
        .check(&field.type_signature)
        .err()
        .or_else(|| documentation(param, field))
}

fn documentation(param: &ParameterSpec, field: &SourceField) -> Option<ValidationError> {
    if field.documentation.is_empty() {
        Some(ValidationError::DocumentationMissing(
            param.description.clone(),
        ))
    } else if field.documentation != param.description {
        Some(ValidationError::DocumentationMismatch {
            expected: param.description.clone(),
            actual: field.documentation.clone(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawField, RawStruct};

    fn field(name: &str, optional: bool, doc: &str, signature: &str) -> RawField {
        RawField {
            name: name.to_uppercase(),
            type_signature: signature.to_string(),
            serialized_name: Some(name.to_string()),
            optional,
            documentation: Some(doc.to_string()),
            ..Default::default()
        }
    }

    fn entity(fields: Vec<RawField>) -> SourceEntity {
        let mut raw = RawStruct::new("Command", "command.go:1:6");
        raw.fields = fields;
        SourceEntity::from_raw(&raw)
    }

    fn zone_param() -> ParameterSpec {
        ParameterSpec::required("zone", TypeCategory::String, "Zone name")
    }

    #[test]
    fn test_exact_match_has_no_findings() {
        let op = OperationSpec::new("command").with_param(zone_param());
        let entity = entity(vec![field("zone", false, "Zone name", "string")]);

        assert!(match_operation(&op, &entity, Which::Request).is_empty());
    }

    #[test]
    fn test_empty_doc_is_missing_documentation() {
        let op = OperationSpec::new("command").with_param(zone_param());
        let entity = entity(vec![field("zone", false, "", "string")]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(
            findings["zone"],
            ValidationError::DocumentationMissing("Zone name".to_string())
        );
    }

    #[test]
    fn test_different_doc_is_mismatch() {
        let op = OperationSpec::new("command").with_param(zone_param());
        let entity = entity(vec![field("zone", false, "Zone", "string")]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(
            findings["zone"],
            ValidationError::DocumentationMismatch {
                expected: "Zone name".to_string(),
                actual: "Zone".to_string(),
            }
        );
    }

    #[test]
    fn test_integer_rejects_int64() {
        let op = OperationSpec::new("command")
            .with_param(ParameterSpec::required("count", TypeCategory::Integer, ""));
        let entity = entity(vec![field("count", false, "", "int64")]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(
            findings["count"],
            ValidationError::TypeMismatch {
                expected: "int".to_string(),
                actual: "int64".to_string(),
            }
        );
    }

    #[test]
    fn test_type_mismatch_overrides_documentation() {
        let op = OperationSpec::new("command")
            .with_param(ParameterSpec::required("count", TypeCategory::Short, "how many"));
        let entity = entity(vec![field("count", false, "", "int")]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert!(matches!(
            findings["count"],
            ValidationError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_unconsumed_field_is_extra() {
        let op = OperationSpec::new("command").with_param(zone_param());
        let entity = entity(vec![
            field("zone", false, "Zone name", "string"),
            field("extra", true, "whatever", "int"),
        ]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings["extra"], ValidationError::ExtraField);
    }

    #[test]
    fn test_missing_parameter_reports_missing_field_only() {
        let op = OperationSpec::new("command")
            .with_param(zone_param())
            .with_param(ParameterSpec::optional("keypair", TypeCategory::String, ""));
        let entity = entity(vec![field("zone", false, "Zone name", "string")]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings["keypair"],
            ValidationError::MissingField(ParameterSpec::optional(
                "keypair",
                TypeCategory::String,
                ""
            ))
        );
    }

    #[test]
    fn test_unknown_category_overrides_everything() {
        let op = OperationSpec::new("command").with_param(ParameterSpec::required(
            "size",
            TypeCategory::from("weirdtype"),
            "the size",
        ));
        // wrong optionality and missing doc on top of the unknown category
        let entity = entity(vec![field("size", true, "", "int64")]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(
            findings["size"],
            ValidationError::UnknownSpecCategory {
                category: "weirdtype".to_string(),
                actual: "int64".to_string(),
            }
        );
    }

    #[test]
    fn test_optionality_mismatch_skips_type_check() {
        let op = OperationSpec::new("command")
            .with_param(ParameterSpec::required("count", TypeCategory::Short, "n"))
            .with_param(ParameterSpec::optional("limit", TypeCategory::Short, "n"));
        let entity = entity(vec![
            field("count", true, "n", "string"),
            field("limit", false, "n", "string"),
        ]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(
            findings["count"],
            ValidationError::OptionalityMismatch {
                expected_required: true
            }
        );
        assert_eq!(
            findings["limit"],
            ValidationError::OptionalityMismatch {
                expected_required: false
            }
        );
    }

    #[test]
    fn test_unnamed_fields_are_reported_once() {
        let op = OperationSpec::new("command").with_param(zone_param());
        let mut raw = RawStruct::new("Command", "command.go:1:6");
        raw.fields = vec![
            field("zone", false, "Zone name", "string"),
            RawField::tagged("Internal", "string", r#"doc:"not serialized""#),
        ];
        let entity = SourceEntity::from_raw(&raw);

        let findings = match_operation(&op, &entity, Which::Request);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings["Internal"],
            ValidationError::MissingSerializedName
        );
    }

    #[test]
    fn test_duplicate_parameter_is_reported_missing() {
        let op = OperationSpec::new("command")
            .with_param(zone_param())
            .with_param(zone_param());
        let entity = entity(vec![field("zone", false, "Zone name", "string")]);

        let findings = match_operation(&op, &entity, Which::Request);
        assert!(matches!(
            findings["zone"],
            ValidationError::MissingField(_)
        ));
    }

    #[test]
    fn test_response_side_uses_response_parameters() {
        let op = OperationSpec::new("command")
            .with_param(zone_param())
            .with_response(ParameterSpec::optional("id", TypeCategory::Uuid, "the ID"));
        let entity = entity(vec![field("id", true, "the ID", "*UUID")]);

        assert!(match_operation(&op, &entity, Which::Response).is_empty());
        let request = match_operation(&op, &entity, Which::Request);
        assert!(matches!(request["zone"], ValidationError::MissingField(_)));
        assert_eq!(request["id"], ValidationError::ExtraField);
    }

    #[test]
    fn test_matching_is_idempotent() {
        let op = OperationSpec::new("command")
            .with_param(zone_param())
            .with_param(ParameterSpec::required("count", TypeCategory::Integer, ""));
        let entity = entity(vec![
            field("zone", false, "", "string"),
            field("other", false, "", "string"),
        ]);

        let first = match_operation(&op, &entity, Which::Request);
        let second = match_operation(&op, &entity, Which::Request);
        assert_eq!(first, second);
        assert_eq!(entity.fields.len(), 2);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingField(zone_param()).to_string(),
            "missing field:\n\tZone string `json:\"zone\" doc:\"Zone name\"`"
        );
        assert_eq!(
            ValidationError::DocumentationMissing("Zone name".into()).to_string(),
            "missing doc:\n\t\t`doc:\"Zone name\"`"
        );
        assert_eq!(
            ValidationError::OptionalityMismatch {
                expected_required: false
            }
            .to_string(),
            "wrong omitempty, want omitempty"
        );
        assert_eq!(
            ValidationError::TypeMismatch {
                expected: "[]string".into(),
                actual: "string".into()
            }
            .to_string(),
            "expected to be a []string, got \"string\""
        );
        assert_eq!(
            ValidationError::UnknownSpecCategory {
                category: "weirdtype".into(),
                actual: "int64".into()
            }
            .to_string(),
            "unknown type \"weirdtype\" <=> \"int64\""
        );
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let json = serde_json::to_value(ValidationError::TypeMismatch {
            expected: "int".into(),
            actual: "int64".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "type_mismatch",
                "detail": {"expected": "int", "actual": "int64"}
            })
        );
        let json = serde_json::to_value(ValidationError::ExtraField).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "extra_field"}));
    }
}
