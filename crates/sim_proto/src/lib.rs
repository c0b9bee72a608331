//! # sim_proto
//!
//! Wire contracts between the simulation core and its transport.
//!
//! All message types are JSON-compatible: the transport delivers inbound
//! [`InboundEnvelope`]s and carries outbound [`Acknowledgement`]s and
//! [`Frame`]s. This crate provides:
//!
//! - [`envelope`] — the inbound command envelope.
//! - [`ack`] — per-command acknowledgements.
//! - [`frame`] — per-tick entity/component snapshots.
//! - [`codec`] — JSON serialisation/deserialisation helpers.

pub mod ack;
pub mod codec;
pub mod envelope;
pub mod frame;

use serde::{Deserialize, Serialize};

pub use ack::{AckStatus, Acknowledgement};
pub use codec::{CodecError, decode, encode};
pub use envelope::InboundEnvelope;
pub use frame::{ComponentSnapshot, EntitySnapshot, Frame};

/// Any message the core pushes onto the outbound bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// A per-tick snapshot of the entity store.
    Frame(Frame),
    /// A reply to one inbound envelope.
    Acknowledgement(Acknowledgement),
}
