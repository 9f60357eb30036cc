//! Catalogue type categories and the source type signatures they accept.
//!
//! The catalogue describes every parameter with a free-text category such as
//! `"integer"` or `"tzdate"`. [`TypeCategory`] is the closed set of categories
//! this crate understands; anything else is carried as
//! [`TypeCategory::Unknown`] and always fails the type check.
//!
//! # Examples
//!
//! ```
//! use apicheck_core::TypeCategory;
//!
//! assert_eq!(TypeCategory::from("short"), TypeCategory::Short);
//! assert!(TypeCategory::Short.admits("int16"));
//! assert!(!TypeCategory::Short.admits("int"));
//! assert!(TypeCategory::List.admits("[]string"));
//! assert!(TypeCategory::String.admits("*UUID"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matcher::ValidationError;

/// Prefix shared by every sequence-typed source signature (`[]string`, `[]Nic`, ...).
pub const SEQUENCE_PREFIX: &str = "[]";

/// Parameter type category as declared by the API catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeCategory {
    Short,
    Integer,
    Long,
    Boolean,
    String,
    Uuid,
    Date,
    /// Date with timezone, carried as a plain string in source.
    TzDate,
    List,
    Map,
    Set,
    /// Category this taxonomy does not model.
    Unknown(String),
}

/// Set of source type signatures accepted for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepts {
    /// No check is performed.
    Any,
    /// Signature must be one of the listed strings.
    Exactly(&'static [&'static str]),
    /// Signature must be a sequence type (see [`SEQUENCE_PREFIX`]).
    Sequence,
}

impl Accepts {
    /// Returns `true` if `signature` satisfies this set.
    pub fn admits(&self, signature: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(allowed) => allowed.contains(&signature),
            Self::Sequence => signature.starts_with(SEQUENCE_PREFIX),
        }
    }
}

impl TypeCategory {
    /// Catalogue spelling of the category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Short => "short",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::TzDate => "tzdate",
            Self::List => "list",
            Self::Map => "map",
            Self::Set => "set",
            Self::Unknown(raw) => raw,
        }
    }

    /// Source signatures accepted for this category, `None` for
    /// [`Unknown`](Self::Unknown).
    pub fn accepts(&self) -> Option<Accepts> {
        let accepts = match self {
            Self::Short => Accepts::Exactly(&["int16"]),
            Self::Integer => Accepts::Exactly(&["int"]),
            Self::Long => Accepts::Exactly(&["int64"]),
            Self::Boolean => Accepts::Exactly(&["bool", "*bool"]),
            Self::String | Self::Uuid | Self::Date | Self::Map => Accepts::Any,
            Self::TzDate => Accepts::Exactly(&["string"]),
            Self::List | Self::Set => Accepts::Sequence,
            Self::Unknown(_) => return None,
        };
        Some(accepts)
    }

    /// Signature suggested to the user when a check fails.
    pub fn expected_label(&self) -> &str {
        match self {
            Self::Short => "int16",
            Self::Integer => "int",
            Self::Long => "int64",
            Self::Boolean => "bool",
            Self::TzDate | Self::String | Self::Uuid | Self::Date => "string",
            Self::List => "[]string",
            Self::Set => "array",
            Self::Map => "map[string]string",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns `true` if a field typed `signature` satisfies this category.
    ///
    /// Always `false` for [`Unknown`](Self::Unknown).
    pub fn admits(&self, signature: &str) -> bool {
        self.accepts().is_some_and(|accepts| accepts.admits(signature))
    }

    /// Checks `signature` against this category.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownSpecCategory`] for an unmodelled category,
    /// [`ValidationError::TypeMismatch`] when the signature is not accepted.
    pub fn check(&self, signature: &str) -> Result<(), ValidationError> {
        let Some(accepts) = self.accepts() else {
            return Err(ValidationError::UnknownSpecCategory {
                category: self.as_str().to_string(),
                actual: signature.to_string(),
            });
        };
        if accepts.admits(signature) {
            Ok(())
        } else {
            Err(ValidationError::TypeMismatch {
                expected: self.expected_label().to_string(),
                actual: signature.to_string(),
            })
        }
    }
}

impl From<&str> for TypeCategory {
    fn from(raw: &str) -> Self {
        match raw {
            "short" => Self::Short,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "boolean" => Self::Boolean,
            "string" => Self::String,
            "uuid" => Self::Uuid,
            "date" => Self::Date,
            "tzdate" => Self::TzDate,
            "list" => Self::List,
            "map" => Self::Map,
            "set" => Self::Set,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for TypeCategory {
    fn from(raw: String) -> Self {
        match Self::from(raw.as_str()) {
            Self::Unknown(_) => Self::Unknown(raw),
            known => known,
        }
    }
}

impl From<TypeCategory> for String {
    fn from(category: TypeCategory) -> Self {
        match category {
            TypeCategory::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
