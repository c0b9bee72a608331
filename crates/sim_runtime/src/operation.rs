//! Operation registry and dispatcher.
//!
//! An operation is a handler bound to an inbound command type. The
//! dispatcher resolves the envelope's type, runs the handler against the
//! simulation state, and converts the outcome into the envelope's single
//! acknowledgement. Faults stop at this boundary; they never propagate out
//! of dispatch.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use sim_component::ComponentRegistry;
use sim_proto::{Acknowledgement, InboundEnvelope};
use sim_scheduler::{SystemCatalog, SystemScheduler};
use sim_store::EntityStore;

use crate::error::RuntimeError;
use crate::playback::Playback;

/// Simulation state handed to an operation for the duration of one call.
///
/// Operations must not retain these references past the call's return.
pub struct OperationContext<'a> {
    /// Component type registry, for schema lookups and factories.
    pub registry: &'a ComponentRegistry,
    /// The entity store all mutations go through.
    pub store: &'a mut EntityStore,
    /// The system scheduler, for dynamic system injection/removal.
    pub scheduler: &'a mut SystemScheduler,
    /// System blueprint factories.
    pub catalog: &'a SystemCatalog,
    /// The playback state machine.
    pub playback: &'a mut Playback,
}

/// A handler bound to one inbound command type.
pub trait Operation: Send + Sync {
    /// Run the operation against the simulation state.
    ///
    /// Returns the acknowledgement payload, or `None` for operations with no
    /// result.
    ///
    /// # Errors
    ///
    /// Any error is converted into an error acknowledgement by the
    /// dispatcher.
    fn execute(
        &self,
        ctx: &mut OperationContext<'_>,
        payload: Value,
    ) -> Result<Option<Value>, RuntimeError>;
}

/// Maps inbound command type names to operations.
#[derive(Default)]
pub struct OperationRegistry {
    operations: HashMap<String, Box<dyn Operation>>,
}

impl OperationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Register an operation under a command type name.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::DuplicateOperation`] on a repeated name.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        operation: Box<dyn Operation>,
    ) -> Result<(), RuntimeError> {
        let kind = kind.into();
        if self.operations.contains_key(&kind) {
            return Err(RuntimeError::DuplicateOperation(kind));
        }
        self.operations.insert(kind, operation);
        Ok(())
    }

    /// Returns `true` if an operation is registered under this name.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.operations.contains_key(kind)
    }

    /// Dispatch an envelope: resolve the operation, run it, and wrap the
    /// outcome in the envelope's acknowledgement.
    ///
    /// Exactly one acknowledgement is produced per call. An unresolvable
    /// type or a fault inside the operation yields an error acknowledgement
    /// with the envelope's correlation id.
    pub fn dispatch(
        &self,
        envelope: &InboundEnvelope,
        ctx: &mut OperationContext<'_>,
    ) -> Acknowledgement {
        debug!(id = ?envelope.id, kind = %envelope.kind, "dispatching command");
        let Some(operation) = self.operations.get(&envelope.kind) else {
            let err = RuntimeError::UnknownOperation(envelope.kind.clone());
            return Acknowledgement::error(envelope.id.clone(), err.to_string());
        };
        match operation.execute(ctx, envelope.payload.clone()) {
            Ok(payload) => Acknowledgement::success(envelope.id.clone(), payload),
            Err(err) => Acknowledgement::error(envelope.id.clone(), err.to_string()),
        }
    }
}
