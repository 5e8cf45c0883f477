//! Field descriptors.
//!
//! A [`FieldSpec`] is the unified per-field descriptor both derived shapes
//! are computed from: the API shape (GraphQL type, arguments, resolution)
//! and the storage shape (declarative persisted definition or a computed
//! method). The storage side is an explicit sum type ([`StoreSpec`]) rather
//! than something inferred at runtime.

use std::fmt;
use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext, TypeRef};
use indexmap::IndexMap;

use graphdoc_model::{Document, FieldDef, MethodArgs, MethodFn, StoreError};

/// A resolver function attached to a field descriptor.
pub type ResolverFn = Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

/// An ordered field-name-to-descriptor map.
pub type FieldSpecMap = IndexMap<String, FieldSpec>;

/// How the API side produces a value for a field.
#[derive(Default, Clone)]
pub enum Resolution {
    /// Storage-backed lookup of the field by name on the parent value.
    #[default]
    Lookup,
    /// Caller-supplied resolver.
    Custom(ResolverFn),
}

/// Storage shape of a field: absent, a declarative persisted definition,
/// or a computed method on the record.
#[derive(Default, Clone)]
pub enum StoreSpec {
    /// API-only, not persisted.
    #[default]
    None,
    /// Declarative persisted-field definition.
    Persisted(FieldDef),
    /// Computed method bound to the record at resolution time.
    Computed(MethodFn),
}

impl StoreSpec {
    /// Returns `true` if the field carries no storage shape.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for StoreSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Persisted(def) => f.debug_tuple("Persisted").field(def).finish(),
            Self::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// One argument of an API field.
#[derive(Debug, Clone)]
pub struct Argument {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) default: Option<Value>,
    pub(crate) description: Option<String>,
}

impl Argument {
    /// Creates an argument with the given name and GraphQL type.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: None,
            description: None,
        }
    }

    /// Sets the default value used when the caller omits the argument.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the argument description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// API shape of a field: the exposed GraphQL type plus arguments.
#[derive(Debug, Clone)]
pub struct ApiField {
    pub(crate) ty: TypeRef,
    pub(crate) args: Vec<Argument>,
    pub(crate) description: Option<String>,
}

/// Unified per-field descriptor.
#[derive(Default)]
pub struct FieldSpec {
    pub(crate) api: Option<ApiField>,
    pub(crate) resolution: Resolution,
    pub(crate) store: StoreSpec,
}

impl FieldSpec {
    /// Creates a descriptor exposed to API consumers with the given
    /// GraphQL type.
    #[must_use]
    pub fn api(ty: impl Into<TypeRef>) -> Self {
        Self {
            api: Some(ApiField {
                ty: ty.into(),
                args: Vec::new(),
                description: None,
            }),
            resolution: Resolution::Lookup,
            store: StoreSpec::None,
        }
    }

    /// Creates a descriptor with no API shape: persisted (or computed) on
    /// the storage side only.
    #[must_use]
    pub fn storage_only() -> Self {
        Self::default()
    }

    /// Adds an argument to the API shape.
    ///
    /// Has no effect on a descriptor without an API shape.
    #[must_use]
    pub fn argument(mut self, arg: Argument) -> Self {
        if let Some(api) = &mut self.api {
            api.args.push(arg);
        }
        self
    }

    /// Sets the API field description.
    ///
    /// Has no effect on a descriptor without an API shape.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        if let Some(api) = &mut self.api {
            api.description = Some(description.into());
        }
        self
    }

    /// Declares the field persisted with the given storage definition.
    #[must_use]
    pub fn persisted(mut self, def: FieldDef) -> Self {
        self.store = StoreSpec::Persisted(def);
        self
    }

    /// Declares the field computed by a method on the record.
    ///
    /// The API-side resolution of a computed field always goes through the
    /// record's bound method, superseding any custom resolver.
    #[must_use]
    pub fn computed(
        mut self,
        f: impl Fn(&Document, &MethodArgs) -> Result<serde_json::Value, StoreError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.store = StoreSpec::Computed(Arc::new(f));
        self
    }

    /// Attaches a caller-supplied resolver instead of the storage-backed
    /// lookup.
    #[must_use]
    pub fn resolve_with(
        mut self,
        f: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) -> Self {
        self.resolution = Resolution::Custom(Arc::new(f));
        self
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("api", &self.api)
            .field("store", &self.store)
            .finish()
    }
}

/// The field-descriptor map of a type definition: supplied directly, or as
/// a deferred zero-argument supplier to allow forward references between
/// definitions. A deferred map is resolved exactly once.
pub enum Fields {
    /// Map supplied directly.
    Direct(FieldSpecMap),
    /// Map produced on first demand.
    Deferred(Box<dyn FnOnce() -> FieldSpecMap + Send>),
}

impl Fields {
    /// Creates a deferred field map.
    #[must_use]
    pub fn deferred(f: impl FnOnce() -> FieldSpecMap + Send + 'static) -> Self {
        Self::Deferred(Box::new(f))
    }

    pub(crate) fn resolve(self) -> FieldSpecMap {
        match self {
            Self::Direct(map) => map,
            Self::Deferred(f) => f(),
        }
    }
}

impl From<FieldSpecMap> for Fields {
    fn from(map: FieldSpecMap) -> Self {
        Self::Direct(map)
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(map) => f.debug_tuple("Direct").field(&map.len()).finish(),
            Self::Deferred(_) => write!(f, "Deferred(..)"),
        }
    }
}

/// A type definition: the unique name plus its field-descriptor map.
#[derive(Debug)]
pub struct TypeConfig {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: Fields,
}

impl TypeConfig {
    /// Creates a type definition.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: impl Into<Fields>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: fields.into(),
        }
    }

    /// Creates a type definition with a deferred field map.
    #[must_use]
    pub fn deferred(
        name: impl Into<String>,
        f: impl FnOnce() -> FieldSpecMap + Send + 'static,
    ) -> Self {
        Self::new(name, Fields::deferred(f))
    }

    /// Sets the type description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_descriptor() {
        let spec = FieldSpec::api(TypeRef::named(TypeRef::STRING))
            .argument(Argument::new("isYummy", TypeRef::named(TypeRef::BOOLEAN)).default_value(true));

        let api = spec.api.as_ref().unwrap();
        assert_eq!(api.args.len(), 1);
        assert_eq!(api.args[0].name, "isYummy");
        assert_eq!(api.args[0].default, Some(Value::Boolean(true)));
        assert!(spec.store.is_none());
    }

    #[test]
    fn test_storage_only_descriptor() {
        let spec = FieldSpec::storage_only().persisted(FieldDef::String);
        assert!(spec.api.is_none());
        assert!(matches!(spec.store, StoreSpec::Persisted(FieldDef::String)));
    }

    #[test]
    fn test_argument_without_api_shape_is_ignored() {
        let spec = FieldSpec::storage_only()
            .argument(Argument::new("unused", TypeRef::named(TypeRef::INT)));
        assert!(spec.api.is_none());
    }

    #[test]
    fn test_computed_descriptor() {
        let spec = FieldSpec::api(TypeRef::named(TypeRef::STRING))
            .computed(|_doc, _args| Ok(json!("computed")));
        assert!(matches!(spec.store, StoreSpec::Computed(_)));
    }

    #[test]
    fn test_deferred_fields_resolve() {
        let fields = Fields::deferred(|| {
            FieldSpecMap::from([(
                "name".to_string(),
                FieldSpec::api(TypeRef::named(TypeRef::STRING)).persisted(FieldDef::String),
            )])
        });
        let map = fields.resolve();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("name"));
    }

    #[test]
    fn test_type_config() {
        let config = TypeConfig::new("Food", FieldSpecMap::new()).description("A food");
        assert_eq!(config.name, "Food");
        assert_eq!(config.description.as_deref(), Some("A food"));
    }
}
