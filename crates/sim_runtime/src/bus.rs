//! Single-consumer outbound message bus.
//!
//! The bus holds at most one active subscriber. Publication is
//! fire-and-forget: with no subscriber attached the message is dropped, with
//! no buffering and no replay. A subscriber that goes away (drops its
//! receiver) vacates the slot, after which a new subscriber may attach.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::error::RuntimeError;

/// A fire-and-forget bus delivering messages to a single subscriber.
#[derive(Debug, Default)]
pub struct OutboundBus<T> {
    subscriber: Mutex<Option<mpsc::UnboundedSender<T>>>,
}

impl<T> OutboundBus<T> {
    /// Create a bus with no subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriber: Mutex::new(None),
        }
    }

    /// Attach the single allowed subscriber and return its receiving end.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ListenerAlreadyRegistered`] while a live
    /// subscriber holds the slot.
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<T>, RuntimeError> {
        let mut slot = self.subscriber.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|sender| !sender.is_closed()) {
            return Err(RuntimeError::ListenerAlreadyRegistered);
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        *slot = Some(sender);
        Ok(receiver)
    }

    /// Publish a message to the subscriber, if one is attached.
    ///
    /// Returns `true` if the message was delivered. A failed send means the
    /// subscriber went away; the slot is vacated and the message dropped.
    pub fn publish(&self, message: T) -> bool {
        let mut slot = self.subscriber.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some(sender) => match sender.send(message) {
                Ok(()) => true,
                Err(_) => {
                    *slot = None;
                    false
                }
            },
            None => false,
        }
    }

    /// Returns `true` while a live subscriber is attached.
    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        self.subscriber
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }
}
