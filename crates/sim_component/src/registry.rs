//! Component registry — explicit-instance registration of component types.
//!
//! The registry is constructed explicitly and shared via `Arc`, never held
//! as process-global state, so several simulations can register disjoint
//! type sets in one process. The map is a `DashMap`, letting registration
//! and lookup work through `&self` from behind the shared handle.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::descriptor::{ComponentDescriptor, ComponentError, ComponentFactory};

/// Registry of component types, keyed by their unique ids.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    types: DashMap<String, Arc<ComponentDescriptor>>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
        }
    }

    /// Register a component type.
    ///
    /// Returns a [`ComponentFactory`] producing default-filled instances of
    /// the type.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::DuplicateComponentType`] if a type with the
    /// same id is already registered; the existing descriptor is unaffected.
    pub fn register(&self, descriptor: ComponentDescriptor) -> Result<ComponentFactory, ComponentError> {
        match self.types.entry(descriptor.id().to_string()) {
            Entry::Occupied(_) => Err(ComponentError::DuplicateComponentType(
                descriptor.id().to_string(),
            )),
            Entry::Vacant(entry) => {
                let descriptor = Arc::new(descriptor);
                entry.insert(Arc::clone(&descriptor));
                Ok(ComponentFactory::new(descriptor))
            }
        }
    }

    /// Look up a descriptor by type id.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::UnknownComponentType`] if the id is not
    /// registered.
    pub fn get(&self, id: &str) -> Result<Arc<ComponentDescriptor>, ComponentError> {
        self.types
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ComponentError::UnknownComponentType(id.to_string()))
    }

    /// Returns a factory for a registered type id.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::UnknownComponentType`] if the id is not
    /// registered.
    pub fn factory(&self, id: &str) -> Result<ComponentFactory, ComponentError> {
        self.get(id).map(ComponentFactory::new)
    }

    /// Returns `true` if a type with this id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// Returns the number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no component types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::descriptor::FieldSpec;

    use super::*;

    fn health_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::new("health")
            .field("current", FieldSpec::new("current hit points", json!(100)))
            .field("max", FieldSpec::new("maximum hit points", json!(100)))
    }

    #[test]
    fn test_register_and_get() {
        let registry = ComponentRegistry::new();
        registry.register(health_descriptor()).unwrap();
        let descriptor = registry.get("health").unwrap();
        assert_eq!(descriptor.id(), "health");
        assert!(registry.contains("health"));
    }

    #[test]
    fn test_duplicate_registration_fails_and_preserves_original() {
        let registry = ComponentRegistry::new();
        registry.register(health_descriptor()).unwrap();

        let conflicting = ComponentDescriptor::new("health")
            .field("hp", FieldSpec::new("different schema", json!(1)));
        let err = registry.register(conflicting).unwrap_err();
        assert!(matches!(err, ComponentError::DuplicateComponentType(_)));

        // First registration's descriptor is unaffected.
        let descriptor = registry.get("health").unwrap();
        assert!(descriptor.schema().contains_key("current"));
        assert!(!descriptor.schema().contains_key("hp"));
    }

    #[test]
    fn test_get_unknown_type_fails() {
        let registry = ComponentRegistry::new();
        let err = registry.get("ghost").unwrap_err();
        assert!(matches!(err, ComponentError::UnknownComponentType(_)));
    }

    #[test]
    fn test_registration_returns_working_factory() {
        let registry = ComponentRegistry::new();
        let factory = registry.register(health_descriptor()).unwrap();
        assert_eq!(
            factory.instantiate(None).unwrap(),
            json!({"current": 100, "max": 100})
        );
    }

    #[test]
    fn test_registries_are_isolated() {
        let a = ComponentRegistry::new();
        let b = ComponentRegistry::new();
        a.register(health_descriptor()).unwrap();
        assert!(a.contains("health"));
        assert!(!b.contains("health"));
    }
}
