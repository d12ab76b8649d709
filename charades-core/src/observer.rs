use charades_types::SessionEvent;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Receives session notifications on the session's own execution context.
pub trait SessionObserver: Send {
    fn handle_event(&mut self, event: SessionEvent);
}

impl SessionObserver for mpsc::UnboundedSender<SessionEvent> {
    fn handle_event(&mut self, event: SessionEvent) {
        if self.send(event).is_err() {
            trace!("Observer channel closed, dropping event");
        }
    }
}

/// Writes every notification to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventLog;

impl SessionObserver for EventLog {
    fn handle_event(&mut self, event: SessionEvent) {
        debug!(kind = event.kind(), "Session event: {:?}", event);
    }
}

/// Fans one session's notifications out to several consumers, in order.
pub struct EventFanout {
    handlers: Vec<Box<dyn SessionObserver>>,
}

impl EventFanout {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn SessionObserver>) {
        self.handlers.push(handler);
    }

    pub fn with_handler(mut self, handler: Box<dyn SessionObserver>) -> Self {
        self.add_handler(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl SessionObserver for EventFanout {
    fn handle_event(&mut self, event: SessionEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for EventFanout {
    fn default() -> Self {
        Self::new()
    }
}
