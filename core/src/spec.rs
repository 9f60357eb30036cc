//! Catalogue model: operations and their request and response parameters.
//!
//! The field names follow the `listApis` response so a catalogue entry can be
//! deserialized directly into an [`OperationSpec`].

use serde::{Deserialize, Serialize};

use crate::TypeCategory;

/// One documented parameter of an operation (request or response side).
///
/// # Examples
///
/// ```
/// use apicheck_core::{ParameterSpec, TypeCategory};
///
/// let zone = ParameterSpec::required("zoneid", TypeCategory::Uuid, "the ID of the zone");
/// assert_eq!(
///     zone.suggested_declaration(),
///     "Zoneid uuid `json:\"zoneid\" doc:\"the ID of the zone\"`"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Serialized name; compared case-sensitively with source fields.
    pub name: String,
    /// Missing from the document means an empty, unknown category.
    #[serde(rename = "type", default = "unspecified_category")]
    pub category: TypeCategory,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

fn unspecified_category() -> TypeCategory {
    TypeCategory::Unknown(String::new())
}

impl ParameterSpec {
    /// Creates a required parameter.
    pub fn required(name: &str, category: TypeCategory, description: &str) -> Self {
        Self {
            name: name.to_string(),
            category,
            required: true,
            description: description.to_string(),
        }
    }

    /// Creates an optional parameter.
    pub fn optional(name: &str, category: TypeCategory, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, category, description)
        }
    }

    /// Serialization tag the source field should carry.
    pub fn expected_tag(&self) -> String {
        if self.required {
            format!("json:\"{}\"", self.name)
        } else {
            format!("json:\"{},omitempty\"", self.name)
        }
    }

    /// Field declaration to paste into the source struct when it is missing.
    pub fn suggested_declaration(&self) -> String {
        let mut chars = self.name.chars();
        let title: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        let doc = if self.description.is_empty() {
            String::new()
        } else {
            format!(" doc:{:?}", self.description)
        };
        format!("{title} {} `{}{doc}`", self.category, self.expected_tag())
    }
}

/// Which parameter list of an operation a struct is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Which {
    #[default]
    Request,
    Response,
}

/// One named operation of the API catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operation name; matched against struct names case-insensitively.
    pub name: String,
    #[serde(rename = "isasync", default)]
    pub is_async: bool,
    #[serde(rename = "params", default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(rename = "response", default)]
    pub response_parameters: Vec<ParameterSpec>,
}

impl OperationSpec {
    /// Creates a synchronous operation with no parameters.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_async: false,
            parameters: Vec::new(),
            response_parameters: Vec::new(),
        }
    }

    /// Marks the operation as asynchronous.
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Adds a request parameter.
    pub fn with_param(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Adds a response parameter.
    pub fn with_response(mut self, param: ParameterSpec) -> Self {
        self.response_parameters.push(param);
        self
    }

    /// Lower-cased name used to look up the matching struct.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Parameter list for the requested side, in catalogue order.
    pub fn parameters_for(&self, which: Which) -> &[ParameterSpec] {
        match which {
            Which::Request => &self.parameters,
            Which::Response => &self.response_parameters,
        }
    }
}
