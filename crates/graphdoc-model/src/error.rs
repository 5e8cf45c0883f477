//! Error types for the document model layer.
//!
//! This module defines all error types that can occur during schema
//! construction, model registration, and document operations.

use std::fmt;

/// Errors that can occur in the document model layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A model with this name is already registered.
    #[error("Model already registered: {name}")]
    DuplicateModel {
        /// The name of the conflicting model.
        name: String,
    },

    /// No model is registered under this name.
    #[error("Unknown model: {name}")]
    UnknownModel {
        /// The name that was looked up.
        name: String,
    },

    /// A document value was supplied for a field the schema does not define.
    #[error("Unknown field on {model}: {field}")]
    UnknownField {
        /// The model the document belongs to.
        model: String,
        /// The offending field name.
        field: String,
    },

    /// A schema declares a field name reserved by the document envelope.
    #[error("Reserved field name: {field}")]
    ReservedField {
        /// The reserved field name.
        field: String,
    },

    /// A document value does not match its declared field definition.
    #[error("Invalid value for {field}: expected {expected}")]
    InvalidValue {
        /// The offending field name.
        field: String,
        /// The expected value shape.
        expected: String,
    },

    /// A method was invoked that the schema does not define.
    #[error("Unknown method on {model}: {method}")]
    UnknownMethod {
        /// The model the document belongs to.
        model: String,
        /// The method name that was looked up.
        method: String,
    },

    /// The requested document was not found in the model's collection.
    #[error("Document not found: {model}/{id}")]
    NotFound {
        /// The model that was searched.
        model: String,
        /// The identifier that was looked up.
        id: String,
    },
}

impl StoreError {
    /// Creates a new `DuplicateModel` error.
    #[must_use]
    pub fn duplicate_model(name: impl Into<String>) -> Self {
        Self::DuplicateModel { name: name.into() }
    }

    /// Creates a new `UnknownModel` error.
    #[must_use]
    pub fn unknown_model(name: impl Into<String>) -> Self {
        Self::UnknownModel { name: name.into() }
    }

    /// Creates a new `UnknownField` error.
    #[must_use]
    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Creates a new `ReservedField` error.
    #[must_use]
    pub fn reserved_field(field: impl Into<String>) -> Self {
        Self::ReservedField {
            field: field.into(),
        }
    }

    /// Creates a new `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Creates a new `UnknownMethod` error.
    #[must_use]
    pub fn unknown_method(model: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            model: model.into(),
            method: method.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(model: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            model: model.into(),
            id: id.into(),
        }
    }

    /// Returns `true` if this is a duplicate model error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateModel { .. })
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateModel { .. } => ErrorCategory::Conflict,
            Self::UnknownModel { .. } | Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::UnknownField { .. }
            | Self::ReservedField { .. }
            | Self::InvalidValue { .. }
            | Self::UnknownMethod { .. } => ErrorCategory::Validation,
        }
    }
}

/// Categories of model-layer errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Lookup missed (model or document).
    NotFound,
    /// Name conflict.
    Conflict,
    /// Schema or value validation error.
    Validation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::duplicate_model("Food");
        assert_eq!(err.to_string(), "Model already registered: Food");

        let err = StoreError::unknown_field("User", "nickname");
        assert_eq!(err.to_string(), "Unknown field on User: nickname");

        let err = StoreError::not_found("Food", "abc");
        assert_eq!(err.to_string(), "Document not found: Food/abc");
    }

    #[test]
    fn test_error_predicates() {
        let err = StoreError::duplicate_model("Food");
        assert!(err.is_duplicate());
        assert!(!err.is_not_found());

        let err = StoreError::not_found("Food", "abc");
        assert!(err.is_not_found());
        assert!(!err.is_duplicate());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StoreError::duplicate_model("Food").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StoreError::unknown_model("Food").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StoreError::invalid_value("name", "string").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StoreError::reserved_field("id").category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(ErrorCategory::Conflict.to_string(), "conflict");
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
    }
}
