//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, debounces them with a short window,
//! then evaluates budget alerts for the batch.

use std::sync::Arc;
use std::time::Duration;

use spendwise_core::events::DomainEvent;
use spendwise_core::notifications::BudgetAlertServiceTrait;
use tokio::sync::mpsc;

use super::planner::plan_alert_jobs;

/// Debounce window for collecting events before processing.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(200);

/// Runs the event queue worker until every sender is dropped.
///
/// Batches are processed inline, so a new batch never starts before the
/// previous one finished.
pub async fn event_queue_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    alert_service: Arc<dyn BudgetAlertServiceTrait>,
) {
    tracing::info!("Domain event queue worker started");

    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if pending_events.is_empty() {
            match rx.recv().await {
                Some(event) => pending_events.push(event),
                None => break,
            }
            continue;
        }

        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(event) => pending_events.push(event),
                    None => {
                        let batch = std::mem::take(&mut pending_events);
                        process_event_batch(&batch, alert_service.as_ref()).await;
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(DEBOUNCE_DURATION) => {
                let batch = std::mem::take(&mut pending_events);
                process_event_batch(&batch, alert_service.as_ref()).await;
            }
        }
    }

    tracing::info!("Domain event queue worker shutting down");
}

/// Processes a batch of domain events. Failures are logged and do not stop the worker.
async fn process_event_batch(
    events: &[DomainEvent],
    alert_service: &dyn BudgetAlertServiceTrait,
) {
    let plan = plan_alert_jobs(events);
    if plan.is_empty() {
        return;
    }
    tracing::debug!("Processing batch of {} domain event(s)", events.len());

    let mut created = 0;
    for (owner, job) in &plan.expense_jobs {
        match alert_service
            .evaluate_expense_change(owner, &job.categories, &job.dates)
            .await
        {
            Ok(notifications) => created += notifications.len(),
            Err(e) => tracing::warn!("Alert evaluation failed for {}: {}", owner, e),
        }
    }
    for (owner, budget_id) in &plan.budget_jobs {
        match alert_service.evaluate_budget(owner, budget_id).await {
            Ok(notifications) => created += notifications.len(),
            Err(e) => tracing::warn!("Alert evaluation failed for budget {}: {}", budget_id, e),
        }
    }

    if created > 0 {
        tracing::info!("Created {} budget notification(s)", created);
    }
}
