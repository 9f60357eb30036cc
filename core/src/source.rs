//! Source model: exported structs and their serialized fields.
//!
//! The source model provider hands over [`RawStruct`] descriptors, one per
//! declared struct. [`SourceModel::from_structs`] turns them into
//! [`SourceEntity`] values keyed by lower-cased name, dropping unexported
//! structs and fields and resolving each field's struct tag into a serialized
//! name, optionality, and documentation string.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

static JSON_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bjson:"(?P<name>[^,"]+)(?P<omit>,omitempty)?""#)
        .expect("static regex must compile")
});
static DOC_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdoc:"(?P<doc>[^"]+)""#).expect("static regex must compile"));

/// Field metadata resolved from a struct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInfo {
    /// Name from the `json` key, `None` when the key is absent.
    pub serialized_name: Option<String>,
    /// `true` when the `json` key carries `,omitempty`.
    pub optional: bool,
    /// Text of the `doc` key, empty when absent.
    pub documentation: String,
}

/// Parses a struct tag such as `` json:"zoneid,omitempty" doc:"the zone" ``.
///
/// # Examples
///
/// ```
/// use apicheck_core::parse_tag;
///
/// let info = parse_tag(r#"json:"zoneid,omitempty" doc:"the ID of the zone""#);
/// assert_eq!(info.serialized_name.as_deref(), Some("zoneid"));
/// assert!(info.optional);
/// assert_eq!(info.documentation, "the ID of the zone");
///
/// assert!(parse_tag(r#"xml:"zoneid""#).serialized_name.is_none());
/// ```
pub fn parse_tag(tag: &str) -> TagInfo {
    let mut info = TagInfo::default();

    if let Some(caps) = JSON_TAG_RE.captures(tag) {
        info.serialized_name = caps.name("name").map(|m| m.as_str().to_string());
        info.optional = caps.name("omit").is_some();
    }
    if let Some(caps) = DOC_TAG_RE.captures(tag) {
        if let Some(doc) = caps.name("doc") {
            info.documentation = doc.as_str().to_string();
        }
    }

    info
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// One struct field as reported by the source model provider.
///
/// Either `tag` (raw struct tag) or the explicit `serialized_name`,
/// `optional`, and `documentation` keys describe the serialization; a present
/// `tag` takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    /// Declared field name.
    pub name: String,
    /// Declared type signature (e.g. `int64`, `*bool`, `[]string`).
    #[serde(rename = "type")]
    pub type_signature: String,
    /// Defaults to the capitalisation rule when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized_name: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl RawField {
    /// Creates a field described by a raw struct tag.
    pub fn tagged(name: &str, type_signature: &str, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            type_signature: type_signature.to_string(),
            tag: Some(tag.to_string()),
            ..Default::default()
        }
    }

    /// Returns `true` if the field takes part in serialization.
    pub fn is_exported(&self) -> bool {
        self.exported.unwrap_or_else(|| is_exported(&self.name))
    }

    /// Resolves serialized name, optionality, and documentation.
    pub fn tag_info(&self) -> TagInfo {
        match &self.tag {
            Some(tag) => parse_tag(tag),
            None => TagInfo {
                serialized_name: self.serialized_name.clone(),
                optional: self.optional,
                documentation: self.documentation.clone().unwrap_or_default(),
            },
        }
    }
}

/// One declared struct as reported by the source model provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStruct {
    pub name: String,
    /// Display-only location, e.g. `vm.go:42:6`.
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

impl RawStruct {
    /// Creates an empty struct descriptor.
    pub fn new(name: &str, position: &str) -> Self {
        Self {
            name: name.to_string(),
            position: position.to_string(),
            ..Default::default()
        }
    }

    /// Adds a field.
    pub fn with_field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns `true` if the struct is visible outside its package.
    pub fn is_exported(&self) -> bool {
        self.exported.unwrap_or_else(|| is_exported(&self.name))
    }
}

/// A matchable struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceField {
    pub serialized_name: String,
    pub optional: bool,
    pub documentation: String,
    pub type_signature: String,
}

/// One exported struct, with fields keyed by serialized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntity {
    pub declared_name: String,
    pub position: String,
    pub fields: BTreeMap<String, SourceField>,
    /// Declared names of exported fields without a serialized name.
    pub unnamed_fields: Vec<String>,
}

impl SourceEntity {
    /// Builds an entity from a descriptor, skipping unexported fields.
    ///
    /// Two fields serializing to the same name keep the later one.
    pub fn from_raw(raw: &RawStruct) -> Self {
        let mut fields = BTreeMap::new();
        let mut unnamed_fields = Vec::new();

        for field in raw.fields.iter().filter(|f| f.is_exported()) {
            let info = field.tag_info();
            let Some(serialized_name) = info.serialized_name else {
                unnamed_fields.push(field.name.clone());
                continue;
            };
            if fields.contains_key(&serialized_name) {
                warn!(
                    entity = %raw.name,
                    field = %serialized_name,
                    "duplicate serialized name, keeping the later field"
                );
            }
            fields.insert(
                serialized_name.clone(),
                SourceField {
                    serialized_name,
                    optional: info.optional,
                    documentation: info.documentation,
                    type_signature: field.type_signature.clone(),
                },
            );
        }

        Self {
            declared_name: raw.name.clone(),
            position: raw.position.clone(),
            fields,
            unnamed_fields,
        }
    }
}

/// All exported structs of one run, keyed by lower-cased declared name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceModel {
    entities: BTreeMap<String, SourceEntity>,
}

impl SourceModel {
    /// Builds the model from provider descriptors.
    ///
    /// # Examples
    ///
    /// ```
    /// use apicheck_core::{RawField, RawStruct, SourceModel};
    ///
    /// let model = SourceModel::from_structs([
    ///     RawStruct::new("ListZones", "zones.go:10:6")
    ///         .with_field(RawField::tagged("ID", "*UUID", r#"json:"id,omitempty""#)),
    ///     RawStruct::new("zoneCache", "zones.go:40:6"),
    /// ]);
    /// assert_eq!(model.len(), 1);
    /// assert!(model.get("LISTZONES").is_some());
    /// ```
    pub fn from_structs(structs: impl IntoIterator<Item = RawStruct>) -> Self {
        let mut entities = BTreeMap::new();

        for raw in structs.into_iter().filter(RawStruct::is_exported) {
            let key = raw.name.to_lowercase();
            if entities.contains_key(&key) {
                warn!(entity = %raw.name, "duplicate struct name, keeping the later declaration");
            }
            entities.insert(key, SourceEntity::from_raw(&raw));
        }

        Self { entities }
    }

    /// Looks up an entity by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&SourceEntity> {
        self.entities.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
