//! # graphdoc-model
//!
//! Document model layer for graphdoc.
//!
//! This crate is the persistence-facing half of the workspace: declarative
//! field definitions, document schemas with instance methods, models with an
//! in-memory collection, and an injectable name-to-model registry. The
//! GraphQL-facing half (`graphdoc-graphql`) derives both its API types and
//! these storage schemas from a single field-descriptor map.
//!
//! ## Overview
//!
//! ```ignore
//! use std::sync::Arc;
//! use graphdoc_model::{DocumentSchema, FieldDef, ModelRegistry};
//! use serde_json::json;
//!
//! let registry = ModelRegistry::new();
//! let schema = DocumentSchema::new()
//!     .field("name", FieldDef::String)
//!     .method("shout", |doc, _args| {
//!         let name = doc.get("name").and_then(|v| v.as_str()).unwrap_or_default();
//!         Ok(json!(name.to_uppercase()))
//!     });
//!
//! let food = registry.register("Food", Arc::new(schema))?;
//! let pizza = food.create(json!({"name": "pizza"}))?;
//! assert_eq!(pizza.invoke("shout", &Default::default())?, json!("PIZZA"));
//! # Ok::<(), graphdoc_model::StoreError>(())
//! ```
//!
//! Reference fields between models store the referenced document's
//! identifier ([`Document::to_ref`]); resolving them back to documents is
//! the caller's concern (the GraphQL layer does this through the registry).

mod document;
mod error;
mod field;
mod model;
mod registry;
mod schema;

pub use document::{Document, ID_FIELD, TYPE_FIELD};
pub use error::{ErrorCategory, StoreError};
pub use field::FieldDef;
pub use model::Model;
pub use registry::ModelRegistry;
pub use schema::{DocumentSchema, MethodArgs, MethodFn};

/// Type alias for a model-layer result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use graphdoc_model::prelude::*;
/// ```
pub mod prelude {
    pub use crate::document::Document;
    pub use crate::error::{ErrorCategory, StoreError};
    pub use crate::field::FieldDef;
    pub use crate::model::Model;
    pub use crate::registry::ModelRegistry;
    pub use crate::schema::{DocumentSchema, MethodArgs, MethodFn};
    pub use crate::StoreResult;
}
