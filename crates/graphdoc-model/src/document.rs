//! Document instances.
//!
//! A [`Document`] is one record created through a [`Model`](crate::Model):
//! an identifier, the owning model's identity, a shared reference to the
//! model's schema, and the persisted field values. Documents are plain
//! values; clones share the schema reference.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::schema::{DocumentSchema, MethodArgs};

/// Envelope field carrying the document identifier in serialized form.
pub const ID_FIELD: &str = "id";

/// Envelope field carrying the owning model name in serialized form.
pub const TYPE_FIELD: &str = "_type";

/// A single record belonging to a model.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    model_name: String,
    model_uid: Uuid,
    schema: Arc<DocumentSchema>,
    values: IndexMap<String, Value>,
}

impl Document {
    pub(crate) fn new(
        id: String,
        model_name: String,
        model_uid: Uuid,
        schema: Arc<DocumentSchema>,
        values: IndexMap<String, Value>,
    ) -> Self {
        Self {
            id,
            model_name,
            model_uid,
            schema,
            values,
        }
    }

    /// Returns the document identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name of the owning model.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the unique identity of the owning model.
    #[must_use]
    pub fn model_uid(&self) -> Uuid {
        self.model_uid
    }

    /// Returns a persisted field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns the stored-identifier value used when another document
    /// references this one.
    #[must_use]
    pub fn to_ref(&self) -> Value {
        Value::String(self.id.clone())
    }

    /// Serializes the document to a JSON object: identifier, model
    /// discriminator, then the persisted fields in declaration order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        map.insert(
            TYPE_FIELD.to_string(),
            Value::String(self.model_name.clone()),
        );
        for (k, v) in &self.values {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }

    /// Invokes a schema method bound to this document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownMethod`] if the schema does not define
    /// the method; otherwise propagates the method's own error.
    pub fn invoke(&self, method: &str, args: &MethodArgs) -> Result<Value, StoreError> {
        let f = self
            .schema
            .get_method(method)
            .ok_or_else(|| StoreError::unknown_method(&self.model_name, method))?;
        f(self, args)
    }
}
