//! The simulation player — one simulation instance end to end.
//!
//! The player owns the registry, store, scheduler, operations, playback
//! machine, and outbound bus. Inbound commands and scheduler ticks drain
//! through a single ordered loop, so every command lands on a consistent,
//! fully-materialized store and an acknowledgement is never emitted before
//! its effect is visible to the next tick. Independent player instances
//! share no state and may run fully in parallel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use sim_component::ComponentRegistry;
use sim_proto::{Acknowledgement, Frame, InboundEnvelope, OutboundMessage};
use sim_scheduler::{SystemCatalog, SystemScheduler};
use sim_store::EntityStore;

use crate::bus::OutboundBus;
use crate::error::RuntimeError;
use crate::operation::{OperationContext, OperationRegistry};
use crate::ops;
use crate::playback::{Playback, PlaybackState};
use crate::snapshot::{self, FrameFilter};

/// Player configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Milliseconds between scheduler ticks while running.
    pub tick_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

/// One message-driven simulation instance.
pub struct SimulationPlayer {
    registry: Arc<ComponentRegistry>,
    store: EntityStore,
    scheduler: SystemScheduler,
    catalog: SystemCatalog,
    operations: OperationRegistry,
    playback: Playback,
    filter: FrameFilter,
    outbound: Arc<OutboundBus<OutboundMessage>>,
    config: RuntimeConfig,
}

impl SimulationPlayer {
    /// Create a player over the given component registry and system catalog,
    /// with the built-in operations registered.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::DuplicateOperation`] if built-in registration
    /// collides, which indicates a bug.
    pub fn new(
        registry: Arc<ComponentRegistry>,
        catalog: SystemCatalog,
        config: RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        let store = EntityStore::new(Arc::clone(&registry));
        let mut operations = OperationRegistry::new();
        ops::register_builtins(&mut operations)?;
        Ok(Self {
            registry,
            store,
            scheduler: SystemScheduler::new(),
            catalog,
            operations,
            playback: Playback::new(),
            filter: FrameFilter::default(),
            outbound: Arc::new(OutboundBus::new()),
            config,
        })
    }

    /// Replace the outgoing frame filter.
    #[must_use]
    pub fn with_frame_filter(mut self, filter: FrameFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Attach the single outbound subscriber, receiving every
    /// acknowledgement and frame the player publishes.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ListenerAlreadyRegistered`] while another
    /// subscriber is attached.
    pub fn subscribe_outbound(
        &self,
    ) -> Result<mpsc::UnboundedReceiver<OutboundMessage>, RuntimeError> {
        self.outbound.subscribe()
    }

    /// The component registry this player validates against.
    #[must_use]
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Read access to the entity store.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable access to the scheduler, for bootstrap-time system setup.
    pub fn scheduler_mut(&mut self) -> &mut SystemScheduler {
        &mut self.scheduler
    }

    /// Mutable access to the operation registry, for registering custom
    /// operations beyond the built-ins.
    pub fn operations_mut(&mut self) -> &mut OperationRegistry {
        &mut self.operations
    }

    /// The current playback state.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Dispatch one inbound envelope and publish its acknowledgement.
    ///
    /// The returned acknowledgement is the same one published on the
    /// outbound bus.
    pub fn handle_envelope(&mut self, envelope: InboundEnvelope) -> Acknowledgement {
        let mut ctx = OperationContext {
            registry: &self.registry,
            store: &mut self.store,
            scheduler: &mut self.scheduler,
            catalog: &self.catalog,
            playback: &mut self.playback,
        };
        let ack = self.operations.dispatch(&envelope, &mut ctx);
        self.outbound
            .publish(OutboundMessage::Acknowledgement(ack.clone()));
        ack
    }

    /// Advance the simulation by one tick if playback is running, then
    /// snapshot and publish a frame.
    ///
    /// Returns the published frame, or `None` when playback is not running.
    ///
    /// # Errors
    ///
    /// Propagates scheduler fail-fast errors; these indicate programming
    /// errors, not recoverable faults.
    pub fn advance(&mut self, dt: f64) -> Result<Option<Frame>, RuntimeError> {
        if !self.playback.is_running() {
            return Ok(None);
        }
        let report = self.scheduler.tick(dt, &mut self.store)?;
        let frame = self
            .filter
            .apply(snapshot::build_frame(report.tick, &self.store));
        self.outbound.publish(OutboundMessage::Frame(frame.clone()));
        Ok(Some(frame))
    }

    /// Drain commands and ticks until the inbound channel closes.
    ///
    /// One loop serializes both: a command is fully applied, and its
    /// acknowledgement published, before the next tick can observe the
    /// store. On shutdown all systems are torn down in order.
    ///
    /// # Errors
    ///
    /// Propagates scheduler fail-fast errors from [`SimulationPlayer::advance`].
    pub async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<InboundEnvelope>,
    ) -> Result<(), RuntimeError> {
        let interval = Duration::from_millis(self.config.tick_interval_ms.max(1));
        let dt = interval.as_secs_f64();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(tick_interval_ms = self.config.tick_interval_ms, "player loop starting");

        loop {
            tokio::select! {
                envelope = inbound.recv() => {
                    match envelope {
                        Some(envelope) => {
                            let ack = self.handle_envelope(envelope);
                            if !ack.is_success() {
                                if let Some(message) = &ack.error {
                                    error!(message_id = ?ack.message_id, %message, "command failed");
                                }
                            }
                        }
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    self.advance(dt)?;
                }
            }
        }

        info!("inbound channel closed, shutting down");
        self.scheduler.clear(&mut self.store);
        Ok(())
    }
}
