//! Event bus broadcasting progress events to subscribers.

use super::types::ProgressEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Default broadcast channel capacity
const DEFAULT_CAPACITY: usize = 1024;

/// Distributes `ProgressEvent`s via `tokio::sync::broadcast`.
///
/// Fire-and-forget: emitting never blocks, never panics. If no
/// subscribers are connected, events are silently dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ProgressEvent>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers (fire-and-forget).
    pub fn emit(&self, event: ProgressEvent) {
        let kind = format!("{:?}", event.kind);
        match self.sender.send(event) {
            Ok(n) => {
                debug!(kind = %kind, subscribers = n, "progress event emitted");
            }
            Err(_) => {
                // No subscribers — expected and fine
            }
        }
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
