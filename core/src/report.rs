//! Report selection, text rendering, and exit codes.
//!
//! Without a selected command the report is a summary: one line per matched
//! struct with at least one finding, and exit code 0. With a selected
//! command it lists every finding of that struct and exits with the finding
//! count, or 1 if no struct has that name.

use serde::Serialize;

use crate::{EntityReport, OperationSpec, Selection, SourceModel, check_model};

/// Rendered outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Report {
    /// Structs with findings, in name order.
    Summary { entities: Vec<EntityReport> },
    /// All findings of the selected struct.
    Detail { entity: EntityReport },
    /// The selected name matches no struct.
    NotFound { name: String },
}

/// Runs the whole check and builds the report for `selection`.
///
/// # Examples
///
/// ```
/// use apicheck_core::*;
///
/// let operations = vec![
///     OperationSpec::new("listZones")
///         .with_param(ParameterSpec::optional("id", TypeCategory::Uuid, "the ID of the zone")),
/// ];
/// let model = SourceModel::from_structs([RawStruct::new("ListZones", "zones.go:10:6")]);
///
/// let summary = validate(&operations, &model, &Selection::all());
/// assert_eq!(summary.render_text(), "    1 zones.go:10:6: ListZones\n");
/// assert_eq!(summary.exit_code(), 0);
///
/// let detail = validate(&operations, &model, &Selection::command("ListZones"));
/// assert_eq!(detail.exit_code(), 1);
///
/// let missing = validate(&operations, &model, &Selection::command("listVolumes"));
/// assert_eq!(missing.render_text(), "listVolumes not found\n");
/// ```
pub fn validate(operations: &[OperationSpec], model: &SourceModel, selection: &Selection) -> Report {
    let mut run = check_model(operations, model, selection);

    let Some(command) = &selection.command else {
        let entities = run
            .entities
            .into_values()
            .filter(|entity| entity.error_count > 0)
            .collect();
        return Report::Summary { entities };
    };

    let target = match (&run.redirected_from, &selection.response_type) {
        (Some(_), Some(type_name)) => type_name,
        _ => command,
    };

    if let Some(entity) = run.entities.remove(&target.to_lowercase()) {
        return Report::Detail { entity };
    }
    match model.get(target) {
        Some(entity) => Report::Detail {
            entity: EntityReport::unmatched(entity),
        },
        None => Report::NotFound {
            name: target.clone(),
        },
    }
}

impl Report {
    /// Process exit code for this report.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Summary { .. } => 0,
            Self::Detail { entity } => i32::try_from(entity.error_count).unwrap_or(i32::MAX),
            Self::NotFound { .. } => 1,
        }
    }

    /// Human-readable report, newline terminated when not empty.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        match self {
            Self::Summary { entities } => {
                for entity in entities {
                    out.push_str(&format!("{:>5} {}\n", entity.error_count, entity.heading()));
                }
            }
            Self::Detail { entity } => {
                for (field, finding) in &entity.findings {
                    out.push_str(&format!("{field}: {finding}\n"));
                }
                out.push_str(&format!(
                    "\n{} has {} error(s)\n",
                    entity.heading(),
                    entity.error_count
                ));
            }
            Self::NotFound { name } => {
                out.push_str(&format!("{name} not found\n"));
            }
        }

        out
    }
}
