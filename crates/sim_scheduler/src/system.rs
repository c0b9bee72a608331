//! The [`System`] trait and per-tick execution context.

use thiserror::Error;

use sim_component::ComponentError;
use sim_store::{EntityStore, StoreError};

/// A fault raised from inside a system's lifecycle hooks.
///
/// Faults are caught at the scheduler boundary: the faulting system is
/// benched and the remaining systems in the tick still run.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SystemFault(String);

impl SystemFault {
    /// Create a fault with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<StoreError> for SystemFault {
    fn from(err: StoreError) -> Self {
        Self(err.to_string())
    }
}

impl From<ComponentError> for SystemFault {
    fn from(err: ComponentError) -> Self {
        Self(err.to_string())
    }
}

/// Lifecycle state of a scheduled system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Registered but not yet run; `init` fires before the first update.
    Uninitialized,
    /// Initialized and updating every tick.
    Running,
    /// A hook faulted; the system is skipped until it is re-added.
    Faulted,
    /// Torn down; any further update is a programming error.
    Destroyed,
}

/// Context handed to a system for the duration of a single hook call.
///
/// Systems must not retain the store reference past the call's return; the
/// store remains exclusively owned by the simulation instance.
#[derive(Debug)]
pub struct TickContext<'a> {
    /// Seconds since the previous tick.
    pub delta_time: f64,
    /// Seconds accumulated across all ticks, starting at 0.
    pub elapsed_time: f64,
    /// The entity store this simulation instance runs against.
    pub store: &'a mut EntityStore,
}

/// A unit of simulation behaviour run once per tick.
///
/// `update` is required; `init` and `teardown` default to no-ops, so a
/// system opts into lifecycle hooks simply by overriding them.
pub trait System: Send {
    /// Runs exactly once, before the system's first update.
    fn init(&mut self, _ctx: &mut TickContext<'_>) -> Result<(), SystemFault> {
        Ok(())
    }

    /// Runs once per tick while the system is scheduled.
    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<(), SystemFault>;

    /// Runs exactly once, on removal or scheduler shutdown.
    fn teardown(&mut self, _ctx: &mut TickContext<'_>) {}
}
