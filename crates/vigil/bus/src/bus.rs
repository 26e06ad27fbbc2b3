//! Event publication and subscription

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use vigil_types::{EngineEvent, EventKind};

/// Capacity of the broadcast channel backing [`EventBus::watch`]
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Error a handler may return; logged by the bus, never propagated
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for event handlers
pub type HandlerResult = Result<(), HandlerError>;

type Handler = Arc<dyn Fn(&EngineEvent) -> HandlerResult + Send + Sync>;

/// In-process publish/subscribe channel for domain events
///
/// Synchronous handlers registered per [`EventKind`] run in subscription
/// order on the emitter's task. Async consumers can take a broadcast
/// receiver via [`watch`](Self::watch) instead.
pub struct EventBus {
    /// Synchronous handlers by subscription key
    handlers: RwLock<HashMap<EventKind, Vec<Handler>>>,
    /// Emission counters by kind
    emitted: RwLock<HashMap<EventKind, u64>>,
    /// Broadcast channel for async observers
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Create a new bus with no subscribers
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            handlers: RwLock::new(HashMap::new()),
            emitted: RwLock::new(HashMap::new()),
            sender,
        }
    }

    /// Register a handler for one event kind
    pub fn subscribe<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&EngineEvent) -> HandlerResult + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.entry(kind).or_default().push(Arc::new(handler));
    }

    /// Register one handler for every event kind
    pub fn subscribe_all<F>(&self, handler: F)
    where
        F: Fn(&EngineEvent) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        for kind in EventKind::ALL {
            handlers.entry(kind).or_default().push(handler.clone());
        }
    }

    /// Deliver an event to every subscriber of its kind
    ///
    /// Handlers run synchronously, in the order they subscribed. A
    /// handler error is logged and delivery continues with the next
    /// handler. Broadcast receivers get a copy regardless.
    pub fn emit(&self, event: EngineEvent) {
        let kind = event.kind();

        // Snapshot the handler list so handlers may themselves subscribe
        // without deadlocking
        let snapshot: Vec<Handler> = {
            let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            handlers.get(&kind).cloned().unwrap_or_default()
        };

        for handler in &snapshot {
            if let Err(error) = handler(&event) {
                tracing::warn!(event = %kind, error = %error, "Event handler failed");
            }
        }

        {
            let mut emitted = self.emitted.write().unwrap_or_else(|e| e.into_inner());
            *emitted.entry(kind).or_insert(0) += 1;
        }

        // Ignore errors when no receiver is listening
        let _ = self.sender.send(event);
    }

    /// Take a broadcast receiver for async observation
    pub fn watch(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Number of events emitted under a kind
    pub fn emitted_count(&self, kind: EventKind) -> u64 {
        let emitted = self.emitted.read().unwrap_or_else(|e| e.into_inner());
        emitted.get(&kind).copied().unwrap_or(0)
    }

    /// Snapshot of bus activity
    pub fn stats(&self) -> EventBusStats {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let emitted = self.emitted.read().unwrap_or_else(|e| e.into_inner());
        EventBusStats {
            total_emitted: emitted.values().sum(),
            emitted_by_kind: emitted.clone(),
            handler_count: handlers.values().map(Vec::len).sum(),
            watcher_count: self.sender.receiver_count(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("EventBus")
            .field("handlers", &stats.handler_count)
            .field("emitted", &stats.total_emitted)
            .finish()
    }
}

/// Bus activity counters
#[derive(Clone, Debug)]
pub struct EventBusStats {
    /// Events emitted across all kinds
    pub total_emitted: u64,
    /// Events emitted per kind
    pub emitted_by_kind: HashMap<EventKind, u64>,
    /// Registered synchronous handlers
    pub handler_count: usize,
    /// Active broadcast receivers
    pub watcher_count: usize,
}
