//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via DomainEventSink, debounces them, and runs
//! budget alert evaluation for the affected categories and budgets.

mod planner;
mod queue_worker;
mod sink;

pub use sink::WebDomainEventSink;
