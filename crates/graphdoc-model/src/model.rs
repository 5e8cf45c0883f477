//! Models: a schema plus an in-memory collection of documents.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::document::{Document, ID_FIELD, TYPE_FIELD};
use crate::error::StoreError;
use crate::schema::DocumentSchema;

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A named model: the unit of registration in a
/// [`ModelRegistry`](crate::ModelRegistry).
///
/// A model owns its schema and an in-memory collection of the documents
/// created through it. Documents are looked up by identifier, which is also
/// how reference fields between models are resolved.
#[derive(Debug)]
pub struct Model {
    name: String,
    uid: Uuid,
    schema: Arc<DocumentSchema>,
    documents: RwLock<HashMap<String, Document>>,
}

impl Model {
    /// Creates a model from a schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReservedField`] if the schema declares a field
    /// name used by the document envelope (`id`, `_type`).
    pub fn new(name: impl Into<String>, schema: Arc<DocumentSchema>) -> Result<Self, StoreError> {
        for (field, _) in schema.fields() {
            if field == ID_FIELD || field == TYPE_FIELD {
                return Err(StoreError::reserved_field(field));
            }
        }
        Ok(Self {
            name: name.into(),
            uid: Uuid::new_v4(),
            schema,
            documents: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique identity of this model.
    ///
    /// Distinct from the name: two isolated registries may both hold a
    /// model named `Food`, but their identities differ.
    #[must_use]
    pub fn uid(&self) -> Uuid {
        self.uid
    }

    /// Returns the model's schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<DocumentSchema> {
        &self.schema
    }

    /// Creates a document from a plain field-value mapping, stores it in the
    /// collection, and returns it.
    ///
    /// Reference fields take the referenced document's stored identifier
    /// (see [`Document::to_ref`]).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidValue`] if `values` is not a JSON object
    /// or a value does not match its field definition, and
    /// [`StoreError::UnknownField`] for fields the schema does not define.
    pub fn create(&self, values: Value) -> Result<Document, StoreError> {
        let Value::Object(values) = values else {
            return Err(StoreError::invalid_value("document", "object"));
        };

        let mut stored = IndexMap::new();
        for (field, value) in values {
            let def = self
                .schema
                .field_def(&field)
                .ok_or_else(|| StoreError::unknown_field(&self.name, &field))?;
            if !def.accepts(&value) {
                return Err(StoreError::invalid_value(&field, def.type_name()));
            }
            stored.insert(field, value);
        }

        let id = generate_id();
        let doc = Document::new(
            id.clone(),
            self.name.clone(),
            self.uid,
            Arc::clone(&self.schema),
            stored,
        );

        debug!(model = %self.name, id = %id, "Created document");
        self.documents
            .write()
            .expect("document collection lock poisoned")
            .insert(id, doc.clone());
        Ok(doc)
    }

    /// Looks up a document by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents
            .read()
            .expect("document collection lock poisoned")
            .get(id)
            .cloned()
    }

    /// Returns `true` if the document was created through this model.
    #[must_use]
    pub fn is_instance(&self, doc: &Document) -> bool {
        doc.model_uid() == self.uid
    }

    /// Returns the number of documents in the collection.
    #[must_use]
    pub fn count(&self) -> usize {
        self.documents
            .read()
            .expect("document collection lock poisoned")
            .len()
    }
}
