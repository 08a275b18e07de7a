use std::sync::Arc;

use crate::{config::Config, domain_events::WebDomainEventSink};
use spendwise_core::{
    budgets::{BudgetService, BudgetServiceTrait},
    events::DomainEventSink,
    expenses::{ExpenseService, ExpenseServiceTrait},
    income::{IncomeService, IncomeServiceTrait},
    notifications::{
        BudgetAlertService, BudgetAlertServiceTrait, NotificationService,
        NotificationServiceTrait,
    },
};
use spendwise_storage_sqlite::{
    db, BudgetRepository, ExpenseRepository, IncomeRepository, NotificationRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub expense_service: Arc<dyn ExpenseServiceTrait>,
    pub income_service: Arc<dyn IncomeServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SW_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("text") {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    } else {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    // Phase 1: the sink buffers events until the worker starts
    let domain_event_sink = Arc::new(WebDomainEventSink::new());
    let event_sink: Arc<dyn DomainEventSink> = domain_event_sink.clone();

    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let expense_repository = Arc::new(ExpenseRepository::new(pool.clone(), writer.clone()));
    let income_repository = Arc::new(IncomeRepository::new(pool.clone(), writer.clone()));
    let notification_repository =
        Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));

    let budget_service: Arc<dyn BudgetServiceTrait> = Arc::new(BudgetService::new(
        budget_repository.clone(),
        expense_repository.clone(),
        event_sink.clone(),
    ));
    let expense_service: Arc<dyn ExpenseServiceTrait> = Arc::new(ExpenseService::new(
        expense_repository.clone(),
        event_sink.clone(),
    ));
    let income_service: Arc<dyn IncomeServiceTrait> =
        Arc::new(IncomeService::new(income_repository));
    let notification_service: Arc<dyn NotificationServiceTrait> =
        Arc::new(NotificationService::new(notification_repository.clone()));

    let alert_service: Arc<dyn BudgetAlertServiceTrait> = Arc::new(BudgetAlertService::new(
        budget_repository,
        expense_repository,
        notification_repository,
    ));

    // Phase 2: start the worker now that the alert service is ready
    domain_event_sink.start_worker(alert_service);

    Ok(Arc::new(AppState {
        budget_service,
        expense_service,
        income_service,
        notification_service,
    }))
}
