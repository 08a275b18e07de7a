//! Web domain event sink implementation.
//!
//! Receives domain events and sends them to a background queue worker
//! for debounced processing.

use std::sync::{Arc, Mutex};

use spendwise_core::{
    events::{DomainEvent, DomainEventSink},
    notifications::BudgetAlertServiceTrait,
};
use tokio::sync::mpsc;

use super::queue_worker::event_queue_worker;

/// Domain event sink for the web server runtime.
///
/// # Two-Phase Initialization
///
/// Services need the sink at construction time while the worker needs the
/// alert service built from the same repositories:
///
/// 1. Create the sink with `new()`, which only creates the channel
/// 2. Call `start_worker()` once the alert service exists
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WebDomainEventSink {
    /// Events emitted before `start_worker()` are buffered in the channel.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Spawns the background worker. Later calls are ignored.
    pub fn start_worker(&self, alert_service: Arc<dyn BudgetAlertServiceTrait>) {
        let rx = match self.rx.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        match rx {
            Some(rx) => {
                tokio::spawn(event_queue_worker(rx, alert_service));
            }
            None => tracing::warn!("Domain event worker already started"),
        }
    }

    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Best-effort: a closed channel only loses alert evaluation.
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendwise_core::expenses::ExpenseCategory;

    #[test]
    fn test_sink_sends_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = WebDomainEventSink::with_sender(tx);

        sink.emit(DomainEvent::budget_changed("u1", "b1"));

        match rx.try_recv().unwrap() {
            DomainEvent::BudgetChanged { owner, budget_id } => {
                assert_eq!(owner, "u1");
                assert_eq!(budget_id, "b1");
            }
            other => panic!("Expected BudgetChanged event, got {:?}", other),
        }
    }

    #[test]
    fn test_sink_batch_sends_all_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = WebDomainEventSink::with_sender(tx);

        sink.emit_batch(vec![
            DomainEvent::expenses_changed("u1", vec![ExpenseCategory::Food], vec![]),
            DomainEvent::budget_changed("u1", "b1"),
        ]);

        assert!(matches!(
            rx.try_recv().unwrap(),
            DomainEvent::ExpensesChanged { .. }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            DomainEvent::BudgetChanged { .. }
        ));
    }
}
