//! Per-command acknowledgements.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether the acknowledged command succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    /// The operation ran to completion.
    Success,
    /// The operation failed; `error` carries the reason.
    Error,
}

/// The reply to one inbound envelope, correlated by the envelope's id.
///
/// Exactly one acknowledgement is emitted per envelope that reaches the
/// dispatcher. `error` is present iff the status is `error`; `payload` is
/// present iff the status is `success` and the operation returned a result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Correlation key copied from the envelope, if the envelope carried one.
    #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Success or error.
    pub status: AckStatus,
    /// Human-readable failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Operation result, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Acknowledgement {
    /// Build a success acknowledgement, optionally carrying a result.
    #[must_use]
    pub fn success(message_id: Option<String>, payload: Option<Value>) -> Self {
        Self {
            message_id,
            status: AckStatus::Success,
            error: None,
            payload,
        }
    }

    /// Build an error acknowledgement carrying a human-readable message.
    #[must_use]
    pub fn error(message_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            message_id,
            status: AckStatus::Error,
            error: Some(error.into()),
            payload: None,
        }
    }

    /// Returns `true` if the command succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == AckStatus::Success
    }
}
