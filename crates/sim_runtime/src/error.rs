//! Runtime-layer error types.

use thiserror::Error;

use sim_component::ComponentError;
use sim_scheduler::{CatalogError, SchedulerError};
use sim_store::StoreError;

use crate::playback::PlaybackState;

/// Errors raised while dispatching commands and running the player.
///
/// Dispatch-time errors are caught at the dispatcher boundary and turned
/// into error acknowledgements; they never crash the player.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Component registration, lookup, or validation failure.
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// Entity store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Scheduler registration or ticking failure.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// System blueprint resolution failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No operation is registered for the envelope's type.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// An operation with this type name is already registered.
    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),

    /// A playback command was issued from a state that does not allow it.
    #[error("invalid playback transition: cannot {command} while {state}")]
    InvalidPlaybackTransition {
        /// The command that was rejected.
        command: &'static str,
        /// The playback state at the time of the command.
        state: PlaybackState,
    },

    /// The outbound bus already has its single allowed subscriber.
    #[error("outbound bus already has a listener")]
    ListenerAlreadyRegistered,

    /// Catch-all for faults raised inside operation logic.
    #[error("operation fault: {0}")]
    OperationFault(String),
}
