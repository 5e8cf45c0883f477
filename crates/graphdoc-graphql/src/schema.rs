//! Schema assembly.
//!
//! [`SchemaAssembler`] registers defined types with the query engine and
//! finishes the executable schema. Registration is the finalization moment:
//! each defined type's field map is evaluated here (exactly once), which is
//! also what materializes its storage side.

use async_graphql::Value;
use async_graphql::dynamic::{Field, FieldFuture, Object, Schema, TypeRef};
use tracing::{debug, trace};

use crate::config::SchemaConfig;
use crate::definer::DefinedType;
use crate::error::GraphQLError;

/// Name of the query root type.
pub const QUERY_TYPE: &str = "Query";

/// Assembles an executable schema from defined types and root query fields.
///
/// # Example
///
/// ```ignore
/// let schema = SchemaAssembler::new(SchemaConfig::default())
///     .register_type(food)
///     .register_type(user)
///     .query_field(read_field("user", "User", &registry))
///     .build()?;
/// ```
pub struct SchemaAssembler {
    config: SchemaConfig,
    types: Vec<DefinedType>,
    query_fields: Vec<Field>,
}

impl SchemaAssembler {
    /// Creates an assembler with the given configuration.
    #[must_use]
    pub fn new(config: SchemaConfig) -> Self {
        Self {
            config,
            types: Vec::new(),
            query_fields: Vec::new(),
        }
    }

    /// Adds a defined type to the schema.
    #[must_use]
    pub fn register_type(mut self, defined: DefinedType) -> Self {
        self.types.push(defined);
        self
    }

    /// Adds a field to the query root.
    #[must_use]
    pub fn query_field(mut self, field: Field) -> Self {
        self.query_fields.push(field);
        self
    }

    /// Builds the executable schema.
    ///
    /// Evaluates every registered type's field map, assembles the query
    /// root, applies depth/complexity limits and the introspection toggle,
    /// and finishes the schema. Validation failures from the engine (for
    /// example, a field whose type was never defined) surface unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQLError::SchemaBuildFailed`] on engine validation
    /// failure, or the evaluation error of a defined type.
    pub fn build(self) -> Result<Schema, GraphQLError> {
        debug!(types = self.types.len(), "Starting GraphQL schema build");

        let mut builder = Schema::build(QUERY_TYPE, None, None);

        for defined in self.types {
            trace!(type_name = %defined.name(), "Registering defined type");
            builder = builder.register(defined.into_object()?);
        }

        let mut query = Object::new(QUERY_TYPE).description("graphdoc query root");
        if self.query_fields.is_empty() {
            // A valid schema needs at least one query field.
            query = query.field(
                Field::new("_placeholder", TypeRef::named(TypeRef::STRING), |_ctx| {
                    FieldFuture::new(async { Ok(None::<Value>) })
                })
                .description("Placeholder - no query fields registered"),
            );
        }
        for field in self.query_fields {
            query = query.field(field);
        }
        builder = builder.register(query);

        builder = builder
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);
        if !self.config.introspection {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definer::TypeDefiner;
    use crate::fields::{FieldSpec, FieldSpecMap, TypeConfig};
    use graphdoc_model::{FieldDef, ModelRegistry};

    fn food_type(definer: &TypeDefiner) -> DefinedType {
        definer
            .define(TypeConfig::new(
                "Food",
                FieldSpecMap::from([(
                    "name".to_string(),
                    FieldSpec::api(TypeRef::named(TypeRef::STRING)).persisted(FieldDef::String),
                )]),
            ))
            .unwrap()
    }

    #[test]
    fn test_empty_schema_gets_placeholder() {
        let schema = SchemaAssembler::new(SchemaConfig::default())
            .build()
            .unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("type Query"), "Schema should have Query type");
        assert!(sdl.contains("_placeholder"));
    }

    #[test]
    fn test_registered_type_appears_in_sdl() {
        let registry = ModelRegistry::new();
        let definer = TypeDefiner::new(registry.clone());
        let food = food_type(&definer);
        let storage = food.storage();

        let schema = SchemaAssembler::new(SchemaConfig::default())
            .register_type(food)
            .query_field(crate::resolvers::read_field("food", "Food", &registry))
            .build()
            .unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("type Food"), "Schema should have Food type");
        assert!(sdl.contains("food("), "Schema should have food read query");
        // Building the schema is the finalization moment.
        assert!(storage.is_ready());
    }

    #[test]
    fn test_unresolved_type_reference_fails_build() {
        let definer = TypeDefiner::new(ModelRegistry::new());
        let broken = definer
            .define(TypeConfig::new(
                "Broken",
                FieldSpecMap::from([(
                    "ghost".to_string(),
                    FieldSpec::api(TypeRef::named("Phantom")),
                )]),
            ))
            .unwrap();

        let err = SchemaAssembler::new(SchemaConfig::default())
            .register_type(broken)
            .build()
            .unwrap_err();
        assert!(matches!(err, GraphQLError::SchemaBuildFailed(_)));
    }

    #[test]
    fn test_introspection_can_be_disabled() {
        let config = SchemaConfig {
            introspection: false,
            ..Default::default()
        };
        let result = SchemaAssembler::new(config).build();
        assert!(result.is_ok());
    }
}
