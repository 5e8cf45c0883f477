//! Declarative persisted-field definitions.
//!
//! A [`FieldDef`] describes the shape of one persisted document field. It is
//! an explicit sum type: a field is either a primitive value or a reference
//! to a document of another model, stored by identifier.

use serde_json::Value;

/// Definition of a single persisted document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDef {
    /// A UTF-8 string value.
    String,
    /// A boolean value.
    Bool,
    /// A signed integer value.
    Int,
    /// A floating point value.
    Float,
    /// A reference to a document of another model, stored as that
    /// document's identifier.
    Ref {
        /// Name of the referenced model.
        target: String,
    },
}

impl FieldDef {
    /// Creates a reference definition pointing at the named model.
    #[must_use]
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Ref {
            target: target.into(),
        }
    }

    /// Returns `true` if the JSON value matches this definition.
    ///
    /// References are stored identifiers, so they accept strings.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Ref { .. } => value.is_string(),
        }
    }

    /// Returns the human-readable name of the expected value shape.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Ref { .. } => "reference",
        }
    }

    /// Returns the referenced model name, if this is a reference field.
    #[must_use]
    pub fn ref_target(&self) -> Option<&str> {
        match self {
            Self::Ref { target } => Some(target),
            _ => None,
        }
    }
}
