//! Frame construction and filtering.
//!
//! After each successful tick the store is snapshotted into an immutable
//! [`Frame`]: every live entity, every attached component, deep value-copies
//! throughout. Mutating the store afterwards never changes a published
//! frame.

use std::collections::HashSet;

use sim_proto::{ComponentSnapshot, EntitySnapshot, Frame};
use sim_store::EntityStore;

/// Build a frame observing the store after tick `tick`.
///
/// Entities appear in ascending id order, components in ascending type-id
/// order, so identical store states serialise identically.
#[must_use]
pub fn build_frame(tick: u64, store: &EntityStore) -> Frame {
    let mut entities = Vec::with_capacity(store.entity_count());
    for entity in store.all_entities() {
        // all_entities only returns live ids, so the snapshot cannot fail
        let Ok(components) = store.entity_snapshot(entity) else {
            continue;
        };
        entities.push(EntitySnapshot {
            id: entity,
            components: components
                .iter()
                .map(|(kind, data)| ComponentSnapshot {
                    kind: kind.clone(),
                    data: data.clone(),
                })
                .collect(),
        });
    }
    Frame { tick, entities }
}

/// Drops blocked component types out of outgoing frames.
///
/// An empty filter passes frames through untouched.
#[derive(Debug, Clone, Default)]
pub struct FrameFilter {
    blocked: HashSet<String>,
}

impl FrameFilter {
    /// Create a filter blocking the given component type ids.
    pub fn new<I, S>(blocked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocked: blocked.into_iter().map(Into::into).collect(),
        }
    }

    /// Apply the filter to a frame.
    #[must_use]
    pub fn apply(&self, mut frame: Frame) -> Frame {
        if self.blocked.is_empty() {
            return frame;
        }
        for entity in &mut frame.entities {
            entity
                .components
                .retain(|component| !self.blocked.contains(&component.kind));
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use sim_component::{ComponentDescriptor, ComponentRegistry, FieldSpec};

    use super::*;

    fn make_store() -> EntityStore {
        let registry = ComponentRegistry::new();
        registry
            .register(
                ComponentDescriptor::new("time")
                    .field("ticks", FieldSpec::new("elapsed ticks", json!(0))),
            )
            .unwrap();
        registry
            .register(
                ComponentDescriptor::new("secret")
                    .field("value", FieldSpec::new("hidden state", json!(""))),
            )
            .unwrap();
        EntityStore::new(Arc::new(registry))
    }

    #[test]
    fn test_frame_contains_entities_and_components() {
        let mut store = make_store();
        let e = store.create_entity();
        store.attach_component(e, "time", json!({"ticks": 3})).unwrap();

        let frame = build_frame(5, &store);
        assert_eq!(frame.tick, 5);
        assert_eq!(frame.entities.len(), 1);
        assert_eq!(frame.entities[0].id, e);
        assert_eq!(frame.entities[0].components[0].kind, "time");
        assert_eq!(frame.entities[0].components[0].data, json!({"ticks": 3}));
    }

    #[test]
    fn test_frame_is_isolated_from_later_mutation() {
        let mut store = make_store();
        let e = store.create_entity();
        store.attach_component(e, "time", json!({"ticks": 3})).unwrap();

        let frame = build_frame(0, &store);
        store.attach_component(e, "time", json!({"ticks": 99})).unwrap();
        store.create_entity();

        assert_eq!(frame.entities.len(), 1);
        assert_eq!(frame.entities[0].components[0].data, json!({"ticks": 3}));
    }

    #[test]
    fn test_entities_ordered_by_id() {
        let mut store = make_store();
        let e1 = store.create_entity();
        let e2 = store.create_entity();
        let e3 = store.create_entity();
        store.remove_entity(e2);

        let frame = build_frame(0, &store);
        let ids: Vec<_> = frame.entities.iter().map(|entity| entity.id).collect();
        assert_eq!(ids, vec![e1, e3]);
    }

    #[test]
    fn test_filter_blocks_component_types() {
        let mut store = make_store();
        let e = store.create_entity();
        store.attach_component(e, "time", json!({"ticks": 1})).unwrap();
        store.attach_component(e, "secret", json!({"value": "s"})).unwrap();

        let filter = FrameFilter::new(["secret"]);
        let frame = filter.apply(build_frame(0, &store));
        let kinds: Vec<_> = frame.entities[0]
            .components
            .iter()
            .map(|component| component.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["time"]);
    }
}
