//! Built-in time system: one entity carrying a tick counter.

use serde_json::{Value, json};

use sim_component::{ComponentDescriptor, Entity, FieldSpec};
use sim_scheduler::{System, SystemFault, TickContext};

/// Type id of the time component.
pub const TIME_COMPONENT: &str = "time";

/// Descriptor for the `time` component: a single `ticks` field constrained
/// to non-negative integers.
#[must_use]
pub fn time_component() -> ComponentDescriptor {
    ComponentDescriptor::new(TIME_COMPONENT)
        .field("ticks", FieldSpec::new("ticks elapsed since the time entity was created", json!(0)))
        .with_validator(|data| match data.get("ticks").and_then(Value::as_u64) {
            Some(_) => Ok(()),
            None => Err("ticks must be a non-negative integer".to_string()),
        })
}

/// Advances simulation time by incrementing its counter once per update.
///
/// On init the system creates a dedicated entity carrying a default `time`
/// component; on teardown it removes that entity again.
#[derive(Debug, Default)]
pub struct TimeSystem {
    entity: Option<Entity>,
}

impl TimeSystem {
    /// Create a time system that has not yet claimed its entity.
    #[must_use]
    pub fn new() -> Self {
        Self { entity: None }
    }

    /// The entity carrying the tick counter, once init has run.
    #[must_use]
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }
}

impl System for TimeSystem {
    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<(), SystemFault> {
        let entity = ctx.store.create_entity();
        let data = ctx.store.registry().factory(TIME_COMPONENT)?.instantiate(None)?;
        ctx.store.attach_component(entity, TIME_COMPONENT, data)?;
        self.entity = Some(entity);
        Ok(())
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<(), SystemFault> {
        let entity = self
            .entity
            .ok_or_else(|| SystemFault::new("time entity was never created"))?;
        let data = ctx
            .store
            .get_component_mut(entity, TIME_COMPONENT)?
            .ok_or_else(|| SystemFault::new("time component is missing"))?;
        let ticks = data
            .get("ticks")
            .and_then(Value::as_u64)
            .ok_or_else(|| SystemFault::new("time component carries no tick counter"))?;
        data["ticks"] = json!(ticks + 1);
        Ok(())
    }

    fn teardown(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(entity) = self.entity.take() {
            ctx.store.remove_entity(entity);
        }
    }
}
