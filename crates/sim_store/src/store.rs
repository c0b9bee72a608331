//! Entity store — the single owner of all live entity and component data.
//!
//! All mutation paths (operations, systems) go through the store; all
//! observation paths (frames, acknowledgements) read from it. Entity ids are
//! allocated monotonically and never reused, and component removal cascades
//! with entity removal so no component data can outlive its entity.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use sim_component::{ComponentError, ComponentRegistry, Entity, EntityAllocator};

/// Errors raised by entity store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity is not in the live set.
    #[error("unknown entity: {0}")]
    UnknownEntity(Entity),

    /// Registration, lookup, or validation failure from the component layer.
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// The entity store: live entities and their component data, validated
/// against an explicitly supplied [`ComponentRegistry`].
#[derive(Debug)]
pub struct EntityStore {
    registry: Arc<ComponentRegistry>,
    allocator: EntityAllocator,
    entities: HashMap<Entity, BTreeMap<String, Value>>,
}

impl EntityStore {
    /// Create an empty store validating against `registry`.
    #[must_use]
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self {
            registry,
            allocator: EntityAllocator::new(),
            entities: HashMap::new(),
        }
    }

    /// The registry this store validates component data against.
    #[must_use]
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    // -- Entity lifecycle --

    /// Create a new entity with no components. Never fails; ids are unique
    /// for the lifetime of the process.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity, BTreeMap::new());
        entity
    }

    /// Remove an entity and detach all of its components.
    ///
    /// Idempotent: removing an entity that is not live is a no-op. Returns
    /// `true` if the entity was live.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        self.entities.remove(&entity).is_some()
    }

    /// Returns `true` if the entity is in the live set.
    #[must_use]
    pub fn has_entity(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Returns a defensive copy of the live entity id set, in ascending id
    /// order. Callers never observe mutations made after the call.
    #[must_use]
    pub fn all_entities(&self) -> Vec<Entity> {
        let mut ids: Vec<Entity> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the count of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // -- Component operations --

    /// Attach component data to an entity, overwriting any existing instance
    /// of that type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntity`] if the entity is not live,
    /// [`ComponentError::UnknownComponentType`] if the type id is not
    /// registered, or [`ComponentError::SchemaViolation`] if the data fails
    /// the type's validation rule. On error the entity's component set is
    /// unchanged.
    pub fn attach_component(
        &mut self,
        entity: Entity,
        type_id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        if !self.entities.contains_key(&entity) {
            return Err(StoreError::UnknownEntity(entity));
        }
        let descriptor = self.registry.get(type_id)?;
        descriptor.validate(&data)?;
        // contains_key above makes this lookup infallible
        if let Some(components) = self.entities.get_mut(&entity) {
            components.insert(type_id.to_string(), data);
        }
        Ok(())
    }

    /// Read component data from an entity. `None` if the entity carries no
    /// instance of that type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntity`] if the entity is not live.
    pub fn get_component(&self, entity: Entity, type_id: &str) -> Result<Option<&Value>, StoreError> {
        let components = self
            .entities
            .get(&entity)
            .ok_or(StoreError::UnknownEntity(entity))?;
        Ok(components.get(type_id))
    }

    /// Mutable access to component data for in-place mutation by systems and
    /// operations. Validated writes go through [`EntityStore::attach_component`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntity`] if the entity is not live.
    pub fn get_component_mut(
        &mut self,
        entity: Entity,
        type_id: &str,
    ) -> Result<Option<&mut Value>, StoreError> {
        let components = self
            .entities
            .get_mut(&entity)
            .ok_or(StoreError::UnknownEntity(entity))?;
        Ok(components.get_mut(type_id))
    }

    /// Detach a component from an entity.
    ///
    /// Idempotent: detaching an absent component, or from an entity that is
    /// not live, is a no-op. Returns `true` if an instance was removed.
    pub fn remove_component(&mut self, entity: Entity, type_id: &str) -> bool {
        self.entities
            .get_mut(&entity)
            .is_some_and(|components| components.remove(type_id).is_some())
    }

    /// All components attached to an entity, keyed by type id in ascending
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntity`] if the entity is not live.
    pub fn entity_snapshot(&self, entity: Entity) -> Result<&BTreeMap<String, Value>, StoreError> {
        self.entities
            .get(&entity)
            .ok_or(StoreError::UnknownEntity(entity))
    }
}
