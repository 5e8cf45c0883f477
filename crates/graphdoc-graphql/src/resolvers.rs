//! Field resolvers.
//!
//! Resolvers produced here close over owned handles (registry, storage
//! handle, field name) so the assembled schema is self-contained. Parent
//! values travel through the engine as JSON objects carrying the document
//! envelope (identifier plus model discriminator), the same way documents
//! serialize.

use async_graphql::dynamic::{Field, FieldFuture, InputValue, ResolverContext, TypeRef};
use async_graphql::{Name, Value};
use tracing::{debug, trace};

use graphdoc_model::{ID_FIELD, MethodArgs, ModelRegistry};

use crate::definer::StorageHandle;

/// Converts a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(
                    async_graphql::Number::from_f64(f)
                        .unwrap_or_else(|| async_graphql::Number::from(0)),
                )
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let map: async_graphql::indexmap::IndexMap<Name, Value> = obj
                .into_iter()
                .map(|(k, v)| (Name::new(k), json_to_graphql_value(v)))
                .collect();
            Value::Object(map)
        }
    }
}

/// Converts an argument accessor to a serde_json::Value using the typed
/// accessors.
fn accessor_to_json(value: &async_graphql::dynamic::ValueAccessor<'_>) -> serde_json::Value {
    if value.is_null() {
        serde_json::Value::Null
    } else if let Ok(b) = value.boolean() {
        serde_json::Value::Bool(b)
    } else if let Ok(i) = value.i64() {
        serde_json::Value::from(i)
    } else if let Ok(u) = value.u64() {
        serde_json::Value::from(u)
    } else if let Ok(f) = value.f64() {
        serde_json::Value::from(f)
    } else if let Ok(s) = value.string() {
        serde_json::Value::String(s.to_string())
    } else if let Ok(list) = value.list() {
        serde_json::Value::Array(list.iter().map(|v| accessor_to_json(&v)).collect())
    } else if let Ok(obj) = value.object() {
        serde_json::Value::Object(
            obj.iter()
                .map(|(k, v)| (k.to_string(), accessor_to_json(&v)))
                .collect(),
        )
    } else {
        serde_json::Value::Null
    }
}

/// Collects the coerced call arguments of the current resolution into a
/// plain JSON map.
pub(crate) fn args_to_json(ctx: &ResolverContext<'_>) -> MethodArgs {
    ctx.args
        .iter()
        .map(|(name, value)| (name.to_string(), accessor_to_json(&value)))
        .collect()
}

/// Creates a field that reads a value from the parent JSON object by name.
pub(crate) fn lookup_field(field_name: &str, type_ref: TypeRef) -> Field {
    let json_field_name = field_name.to_string();

    Field::new(field_name, type_ref, move |ctx| {
        let field_name = json_field_name.clone();
        FieldFuture::new(async move {
            if let Some(parent) = ctx.parent_value.as_value()
                && let Value::Object(obj) = parent
                && let Some(value) = obj.get(&Name::new(&field_name))
            {
                return Ok(Some(value.clone()));
            }
            Ok(None::<Value>)
        })
    })
}

/// Creates a field that resolves a stored identifier to the referenced
/// document of the target model.
pub(crate) fn reference_field(
    field_name: &str,
    type_ref: TypeRef,
    target: &str,
    registry: ModelRegistry,
) -> Field {
    let json_field_name = field_name.to_string();
    let target = target.to_string();

    Field::new(field_name, type_ref, move |ctx| {
        let field_name = json_field_name.clone();
        let target = target.clone();
        let registry = registry.clone();
        FieldFuture::new(async move {
            let Some(Value::Object(obj)) = ctx.parent_value.as_value() else {
                return Ok(None);
            };
            let Some(Value::String(id)) = obj.get(&Name::new(&field_name)) else {
                return Ok(None);
            };

            let model = registry
                .require(&target)
                .map_err(|e| async_graphql::Error::new(e.to_string()))?;
            match model.get(id) {
                Some(doc) => Ok(Some(json_to_graphql_value(doc.to_json()))),
                None => {
                    trace!(model = %target, id = %id, "Referenced document not found");
                    Ok(None)
                }
            }
        })
    })
}

/// Creates a field that invokes the record's computed method of the same
/// name, bound to the record, with the coerced call arguments.
///
/// The record is looked up through the storage handle; the schema is never
/// re-derived here.
pub(crate) fn computed_field(
    field_name: &str,
    type_ref: TypeRef,
    storage: StorageHandle,
) -> Field {
    let method_name = field_name.to_string();

    Field::new(field_name, type_ref, move |ctx| {
        let method_name = method_name.clone();
        let storage = storage.clone();
        FieldFuture::new(async move {
            let args = args_to_json(&ctx);

            let Some(Value::Object(obj)) = ctx.parent_value.as_value() else {
                return Ok(None);
            };
            let Some(Value::String(id)) = obj.get(&Name::new(ID_FIELD)) else {
                return Ok(None);
            };

            let types = storage.get().ok_or_else(|| {
                async_graphql::Error::new(format!(
                    "Storage for {} is not materialized",
                    storage.type_name()
                ))
            })?;
            let doc = types.model.get(id).ok_or_else(|| {
                async_graphql::Error::new(format!(
                    "Document not found: {}/{id}",
                    storage.type_name()
                ))
            })?;

            let value = doc
                .invoke(&method_name, &args)
                .map_err(|e| async_graphql::Error::new(e.to_string()))?;
            Ok(Some(json_to_graphql_value(value)))
        })
    })
}

/// Creates a root-level field reading a single document by identifier,
/// e.g. `user(id: ID!): User`.
///
/// The document is fetched from the registry's model for `type_name` and
/// returned in its serialized envelope form; a missing document resolves to
/// null per the GraphQL spec.
#[must_use]
pub fn read_field(field_name: &str, type_name: &str, registry: &ModelRegistry) -> Field {
    let type_name_owned = type_name.to_string();
    let registry = registry.clone();

    Field::new(field_name, TypeRef::named(type_name), move |ctx| {
        let type_name = type_name_owned.clone();
        let registry = registry.clone();
        FieldFuture::new(async move {
            let id = ctx
                .args
                .get("id")
                .and_then(|v| v.string().ok().map(str::to_string))
                .ok_or_else(|| async_graphql::Error::new("Missing required argument 'id'"))?;

            debug!(type_name = %type_name, id = %id, "Resolving single document read");

            let model = registry
                .require(&type_name)
                .map_err(|e| async_graphql::Error::new(e.to_string()))?;
            match model.get(&id) {
                Some(doc) => Ok(Some(json_to_graphql_value(doc.to_json()))),
                None => {
                    debug!(type_name = %type_name, id = %id, "Document not found");
                    Ok(None)
                }
            }
        })
    })
    .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
}
