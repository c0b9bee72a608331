//! Per-tick frame snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sim_component::Entity;

/// One component instance inside a frame: the type id and a deep value-copy
/// of the instance data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    /// Component type id.
    #[serde(rename = "type")]
    pub kind: String,
    /// Copied instance data; never aliases live store data.
    pub data: Value,
}

/// One entity inside a frame, with its components in type-id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// The entity's id.
    pub id: Entity,
    /// All components attached to the entity at snapshot time.
    pub components: Vec<ComponentSnapshot>,
}

/// An immutable value-copy snapshot of the entity store after one tick.
///
/// Entities are ordered by ascending id so identical store states always
/// serialise identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 0-based index of the tick this frame observed.
    pub tick: u64,
    /// Every live entity with its components.
    pub entities: Vec<EntitySnapshot>,
}
