//! Where services publish their domain events.

use std::sync::{Arc, Mutex};

use super::DomainEvent;

/// Receiver of the events that budget, category and expense writes produce.
///
/// `emit` is called after the write has committed and must return quickly;
/// implementations hand the event to a background consumer. A lost event only
/// delays alert evaluation, so emitting never fails the write.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);

    fn emit_batch(&self, events: Vec<DomainEvent>) {
        events.into_iter().for_each(|event| self.emit(event));
    }
}

/// Records emitted events so service tests can assert on them.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    recorded: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.recorded
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.clear();
        }
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(event);
        }
    }
}
