//! NATS subject hierarchy.
//!
//! All simulation subjects live under a configurable prefix so several
//! simulation instances can share one NATS cluster.

/// Default subject prefix.
pub const DEFAULT_PREFIX: &str = "sim";

/// Build the subject carrying inbound command envelopes. Clients → server.
#[must_use]
pub fn inbound(prefix: &str) -> String {
    format!("{prefix}.inbound")
}

/// Build the subject carrying per-tick frame snapshots. Server → clients.
#[must_use]
pub fn frames(prefix: &str) -> String {
    format!("{prefix}.frames")
}

/// Build the subject carrying command acknowledgements. Server → clients.
#[must_use]
pub fn acks(prefix: &str) -> String {
    format!("{prefix}.acks")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_subject() {
        assert_eq!(inbound("sim"), "sim.inbound");
    }

    #[test]
    fn test_frames_subject() {
        assert_eq!(frames("sim"), "sim.frames");
    }

    #[test]
    fn test_acks_subject() {
        assert_eq!(acks("lab7"), "lab7.acks");
    }
}
