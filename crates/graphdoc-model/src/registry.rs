//! Model registry.
//!
//! The registry is the name-to-model table the persistence side keys on.
//! It is an explicit, injectable object rather than process-global state,
//! so callers (and tests) can construct isolated registries.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::StoreError;
use crate::model::Model;
use crate::schema::DocumentSchema;

/// Cloneable handle to a shared name-to-model table.
///
/// Clones share the same underlying table.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Arc<RwLock<HashMap<String, Arc<Model>>>>,
}

impl ModelRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from the schema and registers it under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateModel`] if the name is taken, or the
    /// model construction error if the schema is invalid.
    pub fn register(
        &self,
        name: impl Into<String>,
        schema: Arc<DocumentSchema>,
    ) -> Result<Arc<Model>, StoreError> {
        let name = name.into();
        let mut models = self.models.write().expect("model registry lock poisoned");
        if models.contains_key(&name) {
            return Err(StoreError::duplicate_model(name));
        }
        let model = Arc::new(Model::new(name.clone(), schema)?);
        debug!(model = %name, "Registered model");
        models.insert(name, Arc::clone(&model));
        Ok(model)
    }

    /// Looks up a model by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Model>> {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .get(name)
            .cloned()
    }

    /// Looks up a model by name, erroring when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownModel`] if no model is registered under
    /// the name.
    pub fn require(&self, name: &str) -> Result<Arc<Model>, StoreError> {
        self.get(name)
            .ok_or_else(|| StoreError::unknown_model(name))
    }

    /// Returns `true` if a model is registered under the name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .contains_key(name)
    }

    /// Returns the registered model names (unordered).
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Returns the number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .len()
    }

    /// Returns `true` if no models are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDef;

    fn food_schema() -> Arc<DocumentSchema> {
        Arc::new(DocumentSchema::new().field("name", FieldDef::String))
    }

    #[test]
    fn test_register_and_get() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());

        let model = registry.register("Food", food_schema()).unwrap();
        assert_eq!(model.name(), "Food");
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("Food"));

        let fetched = registry.get("Food").unwrap();
        assert!(Arc::ptr_eq(&model, &fetched));
        assert!(registry.get("User").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let registry = ModelRegistry::new();
        registry.register("Food", food_schema()).unwrap();

        let err = registry.register("Food", food_schema()).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require() {
        let registry = ModelRegistry::new();
        assert!(matches!(
            registry.require("Food").unwrap_err(),
            StoreError::UnknownModel { .. }
        ));

        registry.register("Food", food_schema()).unwrap();
        assert!(registry.require("Food").is_ok());
    }

    #[test]
    fn test_clones_share_the_table() {
        let registry = ModelRegistry::new();
        let clone = registry.clone();

        registry.register("Food", food_schema()).unwrap();
        assert!(clone.contains("Food"));
    }

    #[test]
    fn test_isolated_registries() {
        let a = ModelRegistry::new();
        let b = ModelRegistry::new();

        a.register("Food", food_schema()).unwrap();
        assert!(!b.contains("Food"));
        b.register("Food", food_schema()).unwrap();
        assert_eq!(b.len(), 1);
    }
}
