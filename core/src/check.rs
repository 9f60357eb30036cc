//! Validation run over a whole catalogue and source model.
//!
//! Every operation whose name matches a struct (ignoring case) is matched
//! against it. Pairs are independent, so matching runs on the rayon pool of
//! the caller; results are merged in catalogue order, which keeps the later
//! operation when two operations resolve to the same struct.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{Findings, OperationSpec, SourceEntity, SourceModel, Which, match_operation};

/// Suffix appended to the names of asynchronous operations in reports.
pub const ASYNC_MARKER: &str = " (A)";

/// Which struct the caller wants reported, if any.
///
/// # Examples
///
/// ```
/// use apicheck_core::Selection;
///
/// let summary = Selection::all();
/// assert!(summary.command.is_none());
///
/// let detail = Selection::command("deployVirtualMachine").with_response_type("VirtualMachine");
/// assert_eq!(detail.response_type.as_deref(), Some("VirtualMachine"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Operation (and struct) to report in detail.
    pub command: Option<String>,
    /// Struct checked against the response parameters of `command` instead.
    pub response_type: Option<String>,
}

impl Selection {
    /// Summary over every matched struct.
    pub fn all() -> Self {
        Self::default()
    }

    /// Detail report for one operation.
    pub fn command(name: &str) -> Self {
        Self {
            command: Some(name.to_string()),
            response_type: None,
        }
    }

    /// Redirects the check to `type_name` using the response parameters.
    pub fn with_response_type(mut self, type_name: &str) -> Self {
        self.response_type = Some(type_name.to_string());
        self
    }

    fn redirect(&self) -> Option<(String, String)> {
        match (&self.command, &self.response_type) {
            (Some(command), Some(type_name)) => {
                Some((command.to_lowercase(), type_name.to_lowercase()))
            }
            _ => None,
        }
    }
}

/// Findings for one struct, with what it was matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub name: String,
    pub position: String,
    /// Catalogue operation the struct was matched against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub which: Which,
    pub is_async: bool,
    pub error_count: usize,
    pub findings: Findings,
}

impl EntityReport {
    fn matched(op: &OperationSpec, entity: &SourceEntity, which: Which) -> Self {
        let findings = match_operation(op, entity, which);
        debug!(
            operation = %op.name,
            entity = %entity.declared_name,
            ?which,
            errors = findings.len(),
            "matched operation"
        );
        Self {
            name: entity.declared_name.clone(),
            position: entity.position.clone(),
            operation: Some(op.name.clone()),
            which,
            is_async: op.is_async,
            error_count: findings.len(),
            findings,
        }
    }

    /// Report for a struct no operation was matched against.
    pub fn unmatched(entity: &SourceEntity) -> Self {
        Self {
            name: entity.declared_name.clone(),
            position: entity.position.clone(),
            operation: None,
            which: Which::Request,
            is_async: false,
            error_count: 0,
            findings: Findings::new(),
        }
    }

    /// `<position>: <name>` plus the async marker.
    pub fn heading(&self) -> String {
        let marker = if self.is_async { ASYNC_MARKER } else { "" };
        format!("{}: {}{marker}", self.position, self.name)
    }
}

/// Outcome of matching a catalogue against a source model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRun {
    /// Matched structs keyed by lower-cased name.
    pub entities: BTreeMap<String, EntityReport>,
    /// Name of the operation whose response parameters were redirected to
    /// the selection's response type.
    pub redirected_from: Option<String>,
}

/// Matches every operation against its struct.
///
/// With a response type in `selection`, the operation named by
/// `selection.command` is checked against the response type's struct using
/// its response parameters.
pub fn check_model(
    operations: &[OperationSpec],
    model: &SourceModel,
    selection: &Selection,
) -> CheckRun {
    let redirect = selection.redirect();
    let mut redirected_from = None;

    let plan: Vec<(&OperationSpec, String, Which)> = operations
        .iter()
        .map(|op| {
            let key = op.key();
            match &redirect {
                Some((command, type_name)) if *command == key => {
                    redirected_from = Some(op.name.clone());
                    (op, type_name.clone(), Which::Response)
                }
                _ => (op, key, Which::Request),
            }
        })
        .collect();

    let matched: Vec<(String, EntityReport)> = plan
        .par_iter()
        .filter_map(|(op, key, which)| {
            let entity = model.get(key)?;
            Some((key.clone(), EntityReport::matched(op, entity, *which)))
        })
        .collect();

    let mut entities = BTreeMap::new();
    for (key, report) in matched {
        entities.insert(key, report);
    }

    info!(
        operations = operations.len(),
        structs = model.len(),
        matched = entities.len(),
        "catalogue check complete"
    );

    CheckRun {
        entities,
        redirected_from,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParameterSpec, RawField, RawStruct, TypeCategory, ValidationError};

    fn model() -> SourceModel {
        SourceModel::from_structs([
            RawStruct::new("DeployVirtualMachine", "vm.go:10:6").with_field(RawField::tagged(
                "ZoneID",
                "*UUID",
                r#"json:"zoneid" doc:"availability zone""#,
            )),
            RawStruct::new("VirtualMachine", "vm.go:40:6").with_field(RawField::tagged(
                "ID",
                "*UUID",
                r#"json:"id,omitempty" doc:"the ID""#,
            )),
            RawStruct::new("Orphan", "orphan.go:1:6"),
        ])
    }

    fn deploy() -> OperationSpec {
        OperationSpec::new("deployVirtualMachine")
            .asynchronous()
            .with_param(ParameterSpec::required(
                "zoneid",
                TypeCategory::Uuid,
                "availability zone",
            ))
            .with_response(ParameterSpec::optional("id", TypeCategory::Uuid, "the ID"))
    }

    #[test]
    fn test_only_named_structs_are_matched() {
        let run = check_model(&[deploy()], &model(), &Selection::all());

        assert_eq!(run.entities.len(), 1);
        let report = &run.entities["deployvirtualmachine"];
        assert_eq!(report.error_count, 0);
        assert!(report.is_async);
        assert_eq!(report.heading(), "vm.go:10:6: DeployVirtualMachine (A)");
        assert!(run.redirected_from.is_none());
    }

    #[test]
    fn test_response_type_redirects_lookup() {
        let selection = Selection::command("DEPLOYVIRTUALMACHINE").with_response_type("virtualMachine");
        let run = check_model(&[deploy()], &model(), &selection);

        assert_eq!(run.redirected_from.as_deref(), Some("deployVirtualMachine"));
        assert!(!run.entities.contains_key("deployvirtualmachine"));
        let report = &run.entities["virtualmachine"];
        assert_eq!(report.which, Which::Response);
        assert_eq!(report.error_count, 0);
    }

    #[test]
    fn test_later_operation_wins_for_same_struct() {
        let first = deploy();
        let second = OperationSpec::new("DeployVirtualMachine");
        let run = check_model(&[first, second], &model(), &Selection::all());

        let report = &run.entities["deployvirtualmachine"];
        assert_eq!(report.operation.as_deref(), Some("DeployVirtualMachine"));
        assert!(!report.is_async);
        assert_eq!(report.findings["zoneid"], ValidationError::ExtraField);
    }
}
