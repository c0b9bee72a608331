//! Built-in operations: playback control, entity injection, system
//! injection/ejection.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::RuntimeError;
use crate::operation::{Operation, OperationContext, OperationRegistry};

/// Command type names handled by the built-in operations.
pub mod types {
    /// Begin or resume playback.
    pub const START: &str = "start";
    /// Suspend playback.
    pub const PAUSE: &str = "pause";
    /// End playback.
    pub const STOP: &str = "stop";
    /// Construct an entity plus component set from a blueprint.
    pub const INJECT_ENTITY: &str = "inject-entity";
    /// Register a system from a blueprint.
    pub const INJECT_SYSTEM: &str = "inject-system";
    /// Remove a system by id.
    pub const EJECT_SYSTEM: &str = "eject-system";
}

/// Register all built-in operations.
///
/// # Errors
///
/// Returns [`RuntimeError::DuplicateOperation`] if any built-in name is
/// already taken.
pub fn register_builtins(registry: &mut OperationRegistry) -> Result<(), RuntimeError> {
    registry.register(types::START, Box::new(StartOperation))?;
    registry.register(types::PAUSE, Box::new(PauseOperation))?;
    registry.register(types::STOP, Box::new(StopOperation))?;
    registry.register(types::INJECT_ENTITY, Box::new(InjectEntityOperation))?;
    registry.register(types::INJECT_SYSTEM, Box::new(InjectSystemOperation))?;
    registry.register(types::EJECT_SYSTEM, Box::new(EjectSystemOperation))?;
    Ok(())
}

fn bad_payload(err: serde_json::Error) -> RuntimeError {
    RuntimeError::OperationFault(format!("invalid payload: {err}"))
}

// ── Playback ────────────────────────────────────────────────────────────────

/// `start` — Stopped|Paused → Running.
pub struct StartOperation;

impl Operation for StartOperation {
    fn execute(
        &self,
        ctx: &mut OperationContext<'_>,
        _payload: Value,
    ) -> Result<Option<Value>, RuntimeError> {
        let state = ctx.playback.start()?;
        Ok(Some(json!({"state": state})))
    }
}

/// `pause` — Running → Paused.
pub struct PauseOperation;

impl Operation for PauseOperation {
    fn execute(
        &self,
        ctx: &mut OperationContext<'_>,
        _payload: Value,
    ) -> Result<Option<Value>, RuntimeError> {
        let state = ctx.playback.pause()?;
        Ok(Some(json!({"state": state})))
    }
}

/// `stop` — Running|Paused → Stopped.
pub struct StopOperation;

impl Operation for StopOperation {
    fn execute(
        &self,
        ctx: &mut OperationContext<'_>,
        _payload: Value,
    ) -> Result<Option<Value>, RuntimeError> {
        let state = ctx.playback.stop()?;
        Ok(Some(json!({"state": state})))
    }
}

// ── Entity injection ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ComponentBlueprint {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// `inject-entity` — payload is a list of `{type, data}` blueprints. The
/// entity is created only after every blueprint resolves and validates, so a
/// bad blueprint mutates nothing. Returns the new entity id.
pub struct InjectEntityOperation;

impl Operation for InjectEntityOperation {
    fn execute(
        &self,
        ctx: &mut OperationContext<'_>,
        payload: Value,
    ) -> Result<Option<Value>, RuntimeError> {
        let blueprints: Vec<ComponentBlueprint> =
            serde_json::from_value(payload).map_err(bad_payload)?;

        let mut instances = Vec::with_capacity(blueprints.len());
        for blueprint in &blueprints {
            let factory = ctx.registry.factory(&blueprint.kind)?;
            let overrides = match &blueprint.data {
                Value::Null => None,
                Value::Object(map) => Some(map),
                _ => {
                    return Err(RuntimeError::OperationFault(format!(
                        "component '{}' data must be an object",
                        blueprint.kind
                    )));
                }
            };
            instances.push((blueprint.kind.clone(), factory.instantiate(overrides)?));
        }

        let entity = ctx.store.create_entity();
        for (kind, data) in instances {
            ctx.store.attach_component(entity, &kind, data)?;
        }
        Ok(Some(json!({"entity": entity})))
    }
}

// ── System injection / ejection ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SystemBlueprint {
    #[serde(default)]
    id: String,
    system: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    index: Option<usize>,
}

/// `inject-system` — payload `{id, system, params?, index?}`; `system` names
/// a blueprint factory registered in the catalog.
pub struct InjectSystemOperation;

impl Operation for InjectSystemOperation {
    fn execute(
        &self,
        ctx: &mut OperationContext<'_>,
        payload: Value,
    ) -> Result<Option<Value>, RuntimeError> {
        let blueprint: SystemBlueprint = serde_json::from_value(payload).map_err(bad_payload)?;
        if blueprint.id.is_empty() {
            return Err(RuntimeError::OperationFault(
                "system id is required".to_string(),
            ));
        }
        let system = ctx.catalog.create(&blueprint.system, &blueprint.params)?;
        ctx.scheduler.add_system(blueprint.id, system, blueprint.index)?;
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct EjectSystemPayload {
    #[serde(default)]
    id: String,
}

/// `eject-system` — payload `{id}`; a missing or empty id is a validation
/// fault.
pub struct EjectSystemOperation;

impl Operation for EjectSystemOperation {
    fn execute(
        &self,
        ctx: &mut OperationContext<'_>,
        payload: Value,
    ) -> Result<Option<Value>, RuntimeError> {
        let payload: EjectSystemPayload = serde_json::from_value(payload).map_err(bad_payload)?;
        if payload.id.is_empty() {
            return Err(RuntimeError::OperationFault(
                "system id is required".to_string(),
            ));
        }
        ctx.scheduler.remove_system(&payload.id, ctx.store)?;
        Ok(None)
    }
}
