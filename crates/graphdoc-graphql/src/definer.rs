//! Dual-schema type definer.
//!
//! [`TypeDefiner::define`] turns one [`TypeConfig`] into two artifacts that
//! can never disagree on field semantics, because both come from a single
//! evaluation of the field-descriptor map:
//!
//! - an API object type for the query engine ([`DefinedType::into_object`]),
//! - a storage schema/model pair for the document layer, exposed through a
//!   two-phase accessor ([`DefinedType::storage`]).
//!
//! Evaluation is deferred until schema-finalization time and runs at most
//! once. The storage pair is published through a write-once cell, so the
//! accessor (and the type-membership predicate) observe "absent" before
//! evaluation and stable instances after.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};

use async_graphql::Value;
use async_graphql::dynamic::{Field, FieldFuture, InputValue, Object, TypeRef};
use tracing::{debug, trace, warn};

use graphdoc_model::{Document, DocumentSchema, Model, ModelRegistry};

use crate::error::GraphQLError;
use crate::fields::{ApiField, FieldSpec, Fields, Resolution, ResolverFn, StoreSpec, TypeConfig};
use crate::resolvers;

/// The finalized storage side of a defined type.
#[derive(Debug, Clone)]
pub struct StorageTypes {
    /// The derived document schema.
    pub schema: Arc<DocumentSchema>,
    /// The model registered under the type name.
    pub model: Arc<Model>,
}

/// Two-phase accessor for the storage side of a defined type.
///
/// Before the field map has been evaluated, [`get`](Self::get) returns
/// `None`. Afterwards it returns the same schema/model instances on every
/// call. Handles are cheap to clone and all clones observe the same cell.
#[derive(Debug, Clone)]
pub struct StorageHandle {
    type_name: Arc<str>,
    cell: Arc<OnceLock<StorageTypes>>,
}

impl StorageHandle {
    /// Returns the finalized storage pair, or `None` if the field map has
    /// not been evaluated yet.
    #[must_use]
    pub fn get(&self) -> Option<StorageTypes> {
        self.cell.get().cloned()
    }

    /// Returns the derived schema, if materialized.
    #[must_use]
    pub fn schema(&self) -> Option<Arc<DocumentSchema>> {
        self.cell.get().map(|t| Arc::clone(&t.schema))
    }

    /// Returns the registered model, if materialized.
    #[must_use]
    pub fn model(&self) -> Option<Arc<Model>> {
        self.cell.get().map(|t| Arc::clone(&t.model))
    }

    /// Returns `true` once the storage pair has been materialized.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the type name the handle belongs to.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// Defines API types backed by models in an injected registry.
///
/// The definer enforces the configuration contract at definition time: a
/// type name must be non-empty, a valid GraphQL name, and unique both in
/// the registry and among the definer's earlier definitions.
#[derive(Debug, Clone)]
pub struct TypeDefiner {
    registry: ModelRegistry,
    reserved: Arc<Mutex<HashSet<String>>>,
}

impl TypeDefiner {
    /// Creates a definer over the given model registry.
    #[must_use]
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            reserved: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Returns the injected model registry.
    #[must_use]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Defines a type.
    ///
    /// Nothing is evaluated yet: the field map (direct or deferred) is held
    /// until [`DefinedType::evaluate`] or [`DefinedType::into_object`] runs,
    /// but the name is validated and reserved immediately.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQLError::InvalidTypeName`] for an empty or
    /// GraphQL-invalid name, and [`GraphQLError::DuplicateType`] when the
    /// name is already taken.
    pub fn define(&self, config: TypeConfig) -> Result<DefinedType, GraphQLError> {
        let TypeConfig {
            name,
            description,
            fields,
        } = config;

        if name.is_empty() {
            return Err(GraphQLError::InvalidTypeName(
                "type name must not be empty".into(),
            ));
        }
        if !is_valid_graphql_name(&name) {
            return Err(GraphQLError::InvalidTypeName(name));
        }
        if self.registry.contains(&name) {
            return Err(GraphQLError::DuplicateType(name));
        }
        {
            let mut reserved = self.reserved.lock().expect("reserved name lock poisoned");
            if !reserved.insert(name.clone()) {
                return Err(GraphQLError::DuplicateType(name));
            }
        }

        debug!(type_name = %name, "Defined type");
        Ok(DefinedType {
            name: Arc::from(name.as_str()),
            description,
            registry: self.registry.clone(),
            state: Mutex::new(EvalState::Pending(fields)),
            cell: Arc::new(OnceLock::new()),
        })
    }
}

/// The cached result of partitioning one field descriptor.
struct FieldPlan {
    name: String,
    api: ApiField,
    kind: ResolveKind,
}

/// How the API field produced from a plan resolves.
enum ResolveKind {
    Lookup,
    Reference { target: String },
    Computed,
    Custom(ResolverFn),
}

/// Single-shot evaluation slot for the field map.
enum EvalState {
    Pending(Fields),
    Ready(Arc<Vec<FieldPlan>>),
    Failed(String),
}

/// A defined type: the API object type plus the storage accessor.
pub struct DefinedType {
    name: Arc<str>,
    description: Option<String>,
    registry: ModelRegistry,
    state: Mutex<EvalState>,
    cell: Arc<OnceLock<StorageTypes>>,
}

impl std::fmt::Debug for DefinedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinedType")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl DefinedType {
    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the storage accessor for this type.
    #[must_use]
    pub fn storage(&self) -> StorageHandle {
        StorageHandle {
            type_name: Arc::clone(&self.name),
            cell: Arc::clone(&self.cell),
        }
    }

    /// Returns `true` if the document belongs to this type's underlying
    /// storage model.
    ///
    /// Always `false` before the model has been materialized.
    #[must_use]
    pub fn is_instance(&self, doc: &Document) -> bool {
        self.cell
            .get()
            .is_some_and(|types| types.model.is_instance(doc))
    }

    /// Returns the type-membership predicate as an owned closure, for
    /// polymorphic dispatch by the query engine.
    ///
    /// The closure captures the storage cell, not the model: it starts
    /// answering `true` once the model materializes, without being rebuilt.
    #[must_use]
    pub fn membership(&self) -> impl Fn(&Document) -> bool + Send + Sync + Clone + 'static {
        let cell = Arc::clone(&self.cell);
        move |doc| {
            cell.get()
                .is_some_and(|types| types.model.is_instance(doc))
        }
    }

    /// Evaluates the field map if it has not been evaluated yet.
    ///
    /// This is the single point where both derived shapes are computed: the
    /// descriptors are partitioned, the document schema is built, the model
    /// is registered, and the storage cell is published. Calling it again
    /// (or triggering it again through [`into_object`](Self::into_object))
    /// reuses the cached result.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQLError::SchemaBuildFailed`] if a field name is not a
    /// valid GraphQL name, or the registration error from the model layer.
    pub fn evaluate(&self) -> Result<(), GraphQLError> {
        self.plans().map(|_| ())
    }

    fn plans(&self) -> Result<Arc<Vec<FieldPlan>>, GraphQLError> {
        let mut state = self.state.lock().expect("evaluation slot lock poisoned");
        match &*state {
            EvalState::Ready(plans) => return Ok(Arc::clone(plans)),
            EvalState::Failed(msg) => {
                return Err(GraphQLError::SchemaBuildFailed(msg.clone()));
            }
            EvalState::Pending(_) => {}
        }

        let EvalState::Pending(fields) =
            std::mem::replace(&mut *state, EvalState::Failed("evaluation in progress".into()))
        else {
            unreachable!("evaluation slot checked above");
        };

        match self.partition(fields) {
            Ok(plans) => {
                let plans = Arc::new(plans);
                *state = EvalState::Ready(Arc::clone(&plans));
                Ok(plans)
            }
            Err(err) => {
                *state = EvalState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Partitions the descriptors and materializes the storage side.
    fn partition(&self, fields: Fields) -> Result<Vec<FieldPlan>, GraphQLError> {
        trace!(type_name = %self.name, "Evaluating field map");
        let specs = fields.resolve();

        let mut plans = Vec::new();
        let mut schema = DocumentSchema::new();

        for (field_name, spec) in specs {
            let FieldSpec {
                api,
                resolution,
                store,
            } = spec;

            match &store {
                StoreSpec::None => {}
                StoreSpec::Persisted(def) => schema.add_field(field_name.clone(), def.clone()),
                StoreSpec::Computed(f) => schema.add_method(field_name.clone(), Arc::clone(f)),
            }

            let Some(api) = api else {
                continue;
            };
            if !is_valid_graphql_name(&field_name) {
                return Err(GraphQLError::SchemaBuildFailed(format!(
                    "invalid field name on {}: {field_name}",
                    self.name
                )));
            }

            let kind = match (store, resolution) {
                (StoreSpec::Computed(_), _) => ResolveKind::Computed,
                (_, Resolution::Custom(f)) => ResolveKind::Custom(f),
                (StoreSpec::Persisted(def), Resolution::Lookup) => match def.ref_target() {
                    Some(target) => ResolveKind::Reference {
                        target: target.to_string(),
                    },
                    None => ResolveKind::Lookup,
                },
                (_, Resolution::Lookup) => ResolveKind::Lookup,
            };
            plans.push(FieldPlan {
                name: field_name,
                api,
                kind,
            });
        }

        if schema.is_empty() {
            warn!(type_name = %self.name, "No storage definitions found for type");
        }

        let schema = Arc::new(schema);
        let model = self
            .registry
            .register(self.name.as_ref(), Arc::clone(&schema))?;
        debug!(
            type_name = %self.name,
            fields = schema.len(),
            methods = schema.method_names().len(),
            "Materialized storage types"
        );

        // The evaluation slot guarantees a single writer.
        let _ = self.cell.set(StorageTypes { schema, model });
        Ok(plans)
    }

    /// Evaluates the field map (if needed) and assembles the API object
    /// type with its per-field resolvers.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors; see [`evaluate`](Self::evaluate).
    pub fn into_object(self) -> Result<Object, GraphQLError> {
        let plans = self.plans()?;

        let mut obj = Object::new(self.name.as_ref());
        if let Some(description) = &self.description {
            obj = obj.description(description);
        }

        // GraphQL requires at least one field per object type.
        if plans.is_empty() {
            let placeholder = Field::new("_placeholder", TypeRef::named(TypeRef::STRING), |_ctx| {
                FieldFuture::new(async { Ok(None::<Value>) })
            })
            .description("Placeholder field - type exposes no API fields");
            return Ok(obj.field(placeholder));
        }

        for plan in plans.iter() {
            let mut field = match &plan.kind {
                ResolveKind::Lookup => resolvers::lookup_field(&plan.name, plan.api.ty.clone()),
                ResolveKind::Reference { target } => resolvers::reference_field(
                    &plan.name,
                    plan.api.ty.clone(),
                    target,
                    self.registry.clone(),
                ),
                ResolveKind::Computed => {
                    resolvers::computed_field(&plan.name, plan.api.ty.clone(), self.storage())
                }
                ResolveKind::Custom(f) => {
                    let f = Arc::clone(f);
                    Field::new(plan.name.clone(), plan.api.ty.clone(), move |ctx| f(ctx))
                }
            };

            for arg in &plan.api.args {
                let mut input = InputValue::new(&arg.name, arg.ty.clone());
                if let Some(description) = &arg.description {
                    input = input.description(description);
                }
                if let Some(default) = &arg.default {
                    input = input.default_value(default.clone());
                }
                field = field.argument(input);
            }
            if let Some(description) = &plan.api.description {
                field = field.description(description);
            }
            obj = obj.field(field);
        }

        Ok(obj)
    }
}

/// Checks if a name is valid for GraphQL.
///
/// GraphQL names must match the pattern `[_a-zA-Z][_a-zA-Z0-9]*`.
fn is_valid_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
