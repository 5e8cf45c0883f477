//! Error types for the definer and schema assembly.

use std::fmt;

use graphdoc_model::StoreError;

/// Errors that can occur while defining types or assembling the schema.
#[derive(Debug)]
pub enum GraphQLError {
    /// The type name is empty or not a valid GraphQL name.
    InvalidTypeName(String),

    /// A type with this name was already defined or registered.
    DuplicateType(String),

    /// Schema assembly or field evaluation failed.
    SchemaBuildFailed(String),

    /// Error surfaced from the document model layer.
    Storage(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTypeName(msg) => {
                write!(f, "Invalid type name: {msg}")
            }
            Self::DuplicateType(name) => {
                write!(f, "Type already defined: {name}")
            }
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::Storage(msg) => {
                write!(f, "Storage error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {}

impl GraphQLError {
    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTypeName(_) => "INVALID_TYPE_NAME",
            Self::DuplicateType(_) => "DUPLICATE_TYPE",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<StoreError> for GraphQLError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateModel { name } => Self::DuplicateType(name),
            other => Self::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GraphQLError::DuplicateType("Food".into());
        assert_eq!(err.to_string(), "Type already defined: Food");

        let err = GraphQLError::InvalidTypeName("must not be empty".into());
        assert_eq!(err.to_string(), "Invalid type name: must not be empty");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::DuplicateType("Food".into()).error_code(),
            "DUPLICATE_TYPE"
        );
        assert_eq!(
            GraphQLError::SchemaBuildFailed("boom".into()).error_code(),
            "SCHEMA_BUILD_FAILED"
        );
    }

    #[test]
    fn test_from_store_error() {
        let err: GraphQLError = StoreError::duplicate_model("Food").into();
        assert!(matches!(err, GraphQLError::DuplicateType(name) if name == "Food"));

        let err: GraphQLError = StoreError::unknown_model("Food").into();
        assert!(matches!(err, GraphQLError::Storage(_)));
    }
}
