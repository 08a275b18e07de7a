#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use crate::errors::{Error, ValidationError};
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::expenses::{
        ExpenseCategory, ExpenseFilter, ExpenseService, ExpenseServiceTrait, NewExpense,
        PaymentMethod,
    };
    use crate::test_support::InMemoryStore;
    use crate::utils::time_utils::{sub_days, today};

    const OWNER: &str = "user-1";

    fn setup() -> (Arc<InMemoryStore>, MockDomainEventSink, ExpenseService) {
        let store = Arc::new(InMemoryStore::new());
        let sink = MockDomainEventSink::new();
        let service = ExpenseService::new(store.clone(), Arc::new(sink.clone()));
        (store, sink, service)
    }

    fn groceries(days_ago: u64) -> NewExpense {
        NewExpense {
            amount: dec!(42.50),
            category: ExpenseCategory::Food,
            description: Some("Weekly groceries".to_string()),
            date: sub_days(today(), days_ago).unwrap(),
            payment_method: PaymentMethod::DebitCard,
        }
    }

    #[tokio::test]
    async fn create_emits_expenses_changed() {
        let (_, sink, service) = setup();
        let expense = service.create_expense(OWNER, groceries(1)).await.unwrap();

        assert_eq!(expense.owner, OWNER);
        assert_eq!(
            sink.events(),
            vec![DomainEvent::expenses_changed(
                OWNER,
                vec![ExpenseCategory::Food],
                vec![expense.date]
            )]
        );
    }

    #[tokio::test]
    async fn create_rejects_future_dates() {
        let (_, sink, service) = setup();
        let mut expense = groceries(0);
        expense.date = today().succ_opt().unwrap();

        let err = service.create_expense(OWNER, expense).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::FutureDate(_))
        ));
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn update_reports_old_and_new_category() {
        let (_, sink, service) = setup();
        let expense = service.create_expense(OWNER, groceries(3)).await.unwrap();
        sink.clear();

        let mut update = groceries(1);
        update.category = ExpenseCategory::Entertainment;
        service
            .update_expense(OWNER, &expense.id, update.clone())
            .await
            .unwrap();

        match &sink.events()[0] {
            DomainEvent::ExpensesChanged {
                categories, dates, ..
            } => {
                assert_eq!(
                    categories,
                    &vec![ExpenseCategory::Food, ExpenseCategory::Entertainment]
                );
                assert_eq!(dates, &vec![expense.date, update.date]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn foreign_expense_is_not_found() {
        let (_, _, service) = setup();
        let expense = service.create_expense(OWNER, groceries(1)).await.unwrap();

        assert!(matches!(
            service.get_expense("user-2", &expense.id),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.delete_expense("user-2", &expense.id).await,
            Err(Error::NotFound(_))
        ));
        assert!(service.get_expense(OWNER, &expense.id).is_ok());
    }

    #[tokio::test]
    async fn past_week_filter_excludes_older_expenses() {
        let (_, _, service) = setup();
        service.create_expense(OWNER, groceries(2)).await.unwrap();
        service.create_expense(OWNER, groceries(7)).await.unwrap();
        service.create_expense(OWNER, groceries(8)).await.unwrap();
        service.create_expense(OWNER, groceries(40)).await.unwrap();

        let week = service
            .list_expenses(OWNER, Some(ExpenseFilter::PastWeek))
            .unwrap();
        assert_eq!(week.len(), 2);

        let all = service.list_expenses(OWNER, None).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[tokio::test]
    async fn custom_filter_is_inclusive() {
        let (_, _, service) = setup();
        let a = service.create_expense(OWNER, groceries(10)).await.unwrap();
        let b = service.create_expense(OWNER, groceries(5)).await.unwrap();
        service.create_expense(OWNER, groceries(1)).await.unwrap();

        let listed = service
            .list_expenses(
                OWNER,
                Some(ExpenseFilter::Custom {
                    start: a.date,
                    end: b.date,
                }),
            )
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn delete_emits_event_for_removed_expense() {
        let (_, sink, service) = setup();
        let expense = service.create_expense(OWNER, groceries(1)).await.unwrap();
        sink.clear();

        service.delete_expense(OWNER, &expense.id).await.unwrap();
        assert_eq!(sink.events().len(), 1);
        assert!(service.get_expense(OWNER, &expense.id).is_err());
    }
}
