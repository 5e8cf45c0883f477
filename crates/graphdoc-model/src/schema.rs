//! Document schemas.
//!
//! A [`DocumentSchema`] is the storage-facing description of a model: an
//! ordered map of persisted field definitions plus named instance methods.
//! Methods receive the owning document and the coerced call arguments, and
//! compute a value instead of reading a persisted one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::Document;
use crate::error::StoreError;
use crate::field::FieldDef;

/// Coerced call arguments passed to a schema method.
pub type MethodArgs = serde_json::Map<String, Value>;

/// An instance method registered on a schema.
///
/// The first argument is the document the method is bound to.
pub type MethodFn = Arc<dyn Fn(&Document, &MethodArgs) -> Result<Value, StoreError> + Send + Sync>;

/// Storage-facing schema for one model.
#[derive(Default, Clone)]
pub struct DocumentSchema {
    fields: IndexMap<String, FieldDef>,
    methods: HashMap<String, MethodFn>,
}

impl DocumentSchema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a persisted field definition.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Registers an instance method under the given name.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Document, &MethodArgs) -> Result<Value, StoreError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Registers an already-shared instance method under the given name.
    pub fn add_method(&mut self, name: impl Into<String>, f: MethodFn) {
        self.methods.insert(name.into(), f);
    }

    /// Adds a persisted field definition in place.
    pub fn add_field(&mut self, name: impl Into<String>, def: FieldDef) {
        self.fields.insert(name.into(), def);
    }

    /// Looks up a persisted field definition.
    #[must_use]
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Iterates persisted field definitions in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up an instance method.
    #[must_use]
    pub fn get_method(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    /// Returns the registered method names (unordered).
    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    /// Returns the number of persisted fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has neither persisted fields nor methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.methods.is_empty()
    }
}

impl fmt::Debug for DocumentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSchema")
            .field("fields", &self.fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let schema = DocumentSchema::new()
            .field("name", FieldDef::String)
            .field("servings", FieldDef::Int)
            .method("describe", |_doc, _args| Ok(json!("ok")));

        assert_eq!(schema.len(), 2);
        assert!(!schema.is_empty());
        assert_eq!(schema.field_def("name"), Some(&FieldDef::String));
        assert!(schema.field_def("missing").is_none());
        assert!(schema.get_method("describe").is_some());
        assert!(schema.get_method("missing").is_none());
    }

    #[test]
    fn test_field_order_is_declaration_order() {
        let schema = DocumentSchema::new()
            .field("b", FieldDef::String)
            .field("a", FieldDef::String)
            .field("c", FieldDef::Int);

        let names: Vec<&str> = schema.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_schema() {
        let schema = DocumentSchema::new();
        assert!(schema.is_empty());
        assert_eq!(schema.len(), 0);

        // A schema with only methods is not degenerate.
        let schema = DocumentSchema::new().method("m", |_d, _a| Ok(Value::Null));
        assert!(!schema.is_empty());
        assert_eq!(schema.len(), 0);
        assert_eq!(schema.method_names(), vec!["m"]);
    }

    #[test]
    fn test_debug_lists_method_names() {
        let schema = DocumentSchema::new()
            .field("name", FieldDef::String)
            .method("describe", |_d, _a| Ok(Value::Null));
        let debug = format!("{schema:?}");
        assert!(debug.contains("name"));
        assert!(debug.contains("describe"));
    }
}
