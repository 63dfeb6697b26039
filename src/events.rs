use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Name of the event published when a token exchange succeeds.
pub const GOT_TOKEN_EVENT: &str = "Metry:GotToken";

/// Default capacity of the token event bus.
pub const EVENT_BUS_CAPACITY: usize = 100;

/// Event published on the bus when the connector obtains a token.
///
/// Mirrors the shape of a DOM `CustomEvent`: a fixed name, an opaque JSON
/// `detail` payload, and the bubbling/cancelable flags, so host pages ported
/// from the browser version can keep their subscriber logic unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEvent {
    /// Event name, e.g. `Metry:GotToken`.
    pub name: String,
    /// Parsed token response, passed through verbatim from the endpoint.
    pub detail: serde_json::Value,
    /// Whether the event bubbles.
    pub bubbles: bool,
    /// Whether the event is cancelable.
    pub cancelable: bool,
}

impl TokenEvent {
    /// Create a `Metry:GotToken` event carrying the parsed token response.
    pub fn got_token(detail: serde_json::Value) -> Self {
        Self {
            name: GOT_TOKEN_EVENT.to_string(),
            detail,
            bubbles: true,
            cancelable: true,
        }
    }
}

/// Broadcast bus distributing token events to any number of subscribers.
///
/// Stands in for the document-level `CustomEvent` dispatch of the browser
/// version: parts of a host application can react to a successful exchange
/// without a direct callback wire-up to the connector.
pub struct EventBus {
    sender: broadcast::Sender<TokenEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Get a receiver to subscribe to token events.
    pub fn subscribe(&self) -> broadcast::Receiver<TokenEvent> {
        trace!("New subscriber registered to event bus");
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers, returning the receiver count.
    ///
    /// An event with no receivers is dropped and logged, not an error, so the
    /// connector can dispatch unconditionally.
    pub fn publish(&self, event: TokenEvent) -> usize {
        let name = event.name.clone();
        match self.sender.send(event) {
            Ok(receivers) => {
                trace!(event = %name, receivers, "Event published");
                receivers
            }
            Err(_) => {
                warn!(event = %name, "No receivers for event, message dropped");
                0
            }
        }
    }

    /// Get the configured capacity of the event bus.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the current number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }
}
