//! Playback state machine behind the `start`/`pause`/`stop` commands.
//!
//! Invalid transitions fail with
//! [`RuntimeError::InvalidPlaybackTransition`] rather than silently
//! no-opping, so a client always learns that its command had no effect.

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// Where the simulation is in its playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not ticking; the initial state.
    Stopped,
    /// Ticking every interval.
    Running,
    /// Ticking suspended, resumable via `start`.
    Paused,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// The playback state machine. Valid transitions:
/// `start`: Stopped|Paused → Running; `pause`: Running → Paused;
/// `stop`: Running|Paused → Stopped.
#[derive(Debug)]
pub struct Playback {
    state: PlaybackState,
}

impl Playback {
    /// Create a machine in the Stopped state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns `true` while the simulation should tick.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Begin or resume playback.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::InvalidPlaybackTransition`] if already
    /// running.
    pub fn start(&mut self) -> Result<PlaybackState, RuntimeError> {
        self.transition("start", matches!(
            self.state,
            PlaybackState::Stopped | PlaybackState::Paused
        ), PlaybackState::Running)
    }

    /// Suspend playback.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::InvalidPlaybackTransition`] unless running.
    pub fn pause(&mut self) -> Result<PlaybackState, RuntimeError> {
        self.transition(
            "pause",
            self.state == PlaybackState::Running,
            PlaybackState::Paused,
        )
    }

    /// End playback.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::InvalidPlaybackTransition`] if already
    /// stopped.
    pub fn stop(&mut self) -> Result<PlaybackState, RuntimeError> {
        self.transition("stop", matches!(
            self.state,
            PlaybackState::Running | PlaybackState::Paused
        ), PlaybackState::Stopped)
    }

    fn transition(
        &mut self,
        command: &'static str,
        valid: bool,
        next: PlaybackState,
    ) -> Result<PlaybackState, RuntimeError> {
        if !valid {
            return Err(RuntimeError::InvalidPlaybackTransition {
                command,
                state: self.state,
            });
        }
        self.state = next;
        Ok(self.state)
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_valid_sequence() {
        let mut playback = Playback::new();
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert_eq!(playback.start().unwrap(), PlaybackState::Running);
        assert_eq!(playback.pause().unwrap(), PlaybackState::Paused);
        assert_eq!(playback.start().unwrap(), PlaybackState::Running);
        assert_eq!(playback.stop().unwrap(), PlaybackState::Stopped);
    }

    #[test]
    fn test_pause_while_stopped_fails() {
        let mut playback = Playback::new();
        let err = playback.pause().unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidPlaybackTransition { .. }));
        assert_eq!(playback.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_start_while_running_fails() {
        let mut playback = Playback::new();
        playback.start().unwrap();
        assert!(playback.start().is_err());
        assert_eq!(playback.state(), PlaybackState::Running);
    }

    #[test]
    fn test_stop_while_stopped_fails() {
        let mut playback = Playback::new();
        assert!(playback.stop().is_err());
    }

    #[test]
    fn test_stop_from_paused_is_valid() {
        let mut playback = Playback::new();
        playback.start().unwrap();
        playback.pause().unwrap();
        assert_eq!(playback.stop().unwrap(), PlaybackState::Stopped);
    }

    #[test]
    fn test_state_serialises_lowercase() {
        assert_eq!(
            serde_json::to_value(PlaybackState::Running).unwrap(),
            serde_json::json!("running")
        );
    }
}
