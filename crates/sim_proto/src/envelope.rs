//! Inbound command envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A transport-delivered command, immutable once received.
///
/// `id` is the correlation key echoed back in the acknowledgement; a client
/// that omits it still gets an acknowledgement, just an uncorrelated one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEnvelope {
    /// Correlation key for the acknowledgement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Operation name resolved by the dispatcher.
    #[serde(rename = "type")]
    pub kind: String,
    /// Operation-specific payload, passed through opaquely.
    #[serde(default)]
    pub payload: Value,
}
