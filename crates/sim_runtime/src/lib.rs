//! # sim_runtime
//!
//! The message-driven simulation player.
//!
//! A [`SimulationPlayer`] couples an entity store, a system scheduler, and a
//! command protocol: lifecycle and content changes arrive as typed inbound
//! envelopes, every envelope is answered with exactly one acknowledgement,
//! and each tick exports a frame snapshot on the outbound bus. Commands and
//! ticks drain through one ordered queue, so an acknowledgement is never
//! emitted before its effect is visible to the next scheduled tick.
//!
//! This crate provides:
//!
//! - [`Playback`] — the Stopped/Running/Paused state machine behind the
//!   `start`/`pause`/`stop` commands.
//! - [`Operation`] / [`OperationRegistry`] — command handlers keyed by
//!   envelope type, dispatched at the acknowledgement boundary.
//! - [`OutboundBus`] — single-consumer, fire-and-forget outbound messaging.
//! - [`FrameFilter`] and the frame snapshot builder.
//! - [`TimeSystem`] — the built-in tick-counting system.
//! - [`SimulationPlayer`] — ties the pieces together and runs the async
//!   command/tick loop.

pub mod bus;
pub mod error;
pub mod operation;
pub mod ops;
pub mod playback;
pub mod player;
pub mod snapshot;
pub mod time;

pub use bus::OutboundBus;
pub use error::RuntimeError;
pub use operation::{Operation, OperationContext, OperationRegistry};
pub use playback::{Playback, PlaybackState};
pub use player::{RuntimeConfig, SimulationPlayer};
pub use snapshot::{FrameFilter, build_frame};
pub use time::{TIME_COMPONENT, TimeSystem, time_component};
