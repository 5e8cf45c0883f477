//! # graphdoc-graphql
//!
//! Dual-schema type definer: one declarative field map describes both a
//! queryable GraphQL type and a persisted document schema.
//!
//! Built on async-graphql's dynamic schema API, with `graphdoc-model` as
//! the document layer. Each [`TypeConfig`] maps field names to
//! [`FieldSpec`] descriptors carrying an API shape (GraphQL type,
//! arguments, resolution) and a storage shape (declarative persisted
//! definition or a computed method). [`TypeDefiner::define`] turns one such
//! config into:
//!
//! - an API object type, assembled into the executable schema by
//!   [`SchemaAssembler`], and
//! - a storage schema/model pair, materialized lazily when the field map is
//!   evaluated at schema-finalization time and reachable through the
//!   two-phase [`StorageHandle`] accessor.
//!
//! Both artifacts come from a single evaluation of the field map, so they
//! cannot disagree on field semantics.
//!
//! ## Overview
//!
//! ```ignore
//! let registry = ModelRegistry::new();
//! let definer = TypeDefiner::new(registry.clone());
//!
//! let food = definer.define(TypeConfig::deferred("Food", || {
//!     FieldSpecMap::from([
//!         (
//!             "name".to_string(),
//!             FieldSpec::api(TypeRef::named(TypeRef::STRING)).persisted(FieldDef::String),
//!         ),
//!     ])
//! }))?;
//!
//! let food_storage = food.storage();          // absent until the schema is built
//! let schema = SchemaAssembler::new(SchemaConfig::default())
//!     .register_type(food)
//!     .query_field(read_field("food", "Food", &registry))
//!     .build()?;
//!
//! let model = food_storage.model().unwrap();  // materialized by the build
//! let pizza = model.create(serde_json::json!({"name": "pizza"}))?;
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Schema assembly configuration
//! - [`definer`] - The dual-schema type definer and storage accessor
//! - [`error`] - Error types
//! - [`fields`] - Field descriptors and type configs
//! - [`resolvers`] - Field resolver construction
//! - [`schema`] - Schema assembly

pub mod config;
pub mod definer;
pub mod error;
pub mod fields;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::SchemaConfig;
pub use definer::{DefinedType, StorageHandle, StorageTypes, TypeDefiner};
pub use error::GraphQLError;
pub use fields::{
    ApiField, Argument, FieldSpec, FieldSpecMap, Fields, Resolution, ResolverFn, StoreSpec,
    TypeConfig,
};
pub use resolvers::read_field;
pub use schema::{QUERY_TYPE, SchemaAssembler};

/// Result type for definer operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
