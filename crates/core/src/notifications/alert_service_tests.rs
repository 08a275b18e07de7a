#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::budgets::{
        BudgetPeriod, BudgetRepositoryTrait, BudgetWithCategories, NewBudget, NewBudgetCategory,
    };
    use crate::errors::Error;
    use crate::expenses::{ExpenseCategory, ExpenseRepositoryTrait};
    use crate::notifications::{
        BudgetAlertService, BudgetAlertServiceTrait, NotificationService,
        NotificationServiceTrait, NotificationType,
    };
    use crate::test_support::InMemoryStore;

    const OWNER: &str = "user-1";

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn alerts(store: &Arc<InMemoryStore>) -> BudgetAlertService {
        BudgetAlertService::new(store.clone(), store.clone(), store.clone())
    }

    async fn seed_budget(store: &InMemoryStore, notification_enabled: bool) -> BudgetWithCategories {
        let mut food = NewBudgetCategory::new(ExpenseCategory::Food, dec!(300));
        food.notification_enabled = notification_enabled;
        store
            .insert_budget(
                OWNER.to_string(),
                NewBudget {
                    name: "Household".to_string(),
                    period: BudgetPeriod::Monthly,
                    start_date: d(2024, 1, 15),
                    total_limit: dec!(1000),
                    rollover_enabled: true,
                    categories: vec![food],
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn threshold_crossing_creates_one_notification() {
        let store = Arc::new(InMemoryStore::new());
        let service = alerts(&store);
        let budget = seed_budget(&store, true).await;

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(250), d(2024, 1, 20));
        let created = service
            .evaluate_expense_change(OWNER, &[ExpenseCategory::Food], &[d(2024, 1, 20)])
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].notification_type, NotificationType::ThresholdReached);
        assert_eq!(created[0].budget_category_id, budget.categories[0].id);

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(10), d(2024, 1, 21));
        let again = service
            .evaluate_expense_change(OWNER, &[ExpenseCategory::Food], &[d(2024, 1, 21)])
            .await
            .unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn exceeding_limit_adds_limit_exceeded() {
        let store = Arc::new(InMemoryStore::new());
        let service = alerts(&store);
        seed_budget(&store, true).await;

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(320), d(2024, 1, 20));
        let created = service
            .evaluate_expense_change(OWNER, &[ExpenseCategory::Food], &[d(2024, 1, 20)])
            .await
            .unwrap();
        let mut types: Vec<&str> = created.iter().map(|n| n.notification_type.as_str()).collect();
        types.sort();
        assert_eq!(types, vec!["LIMIT_EXCEEDED", "THRESHOLD_REACHED"]);
    }

    #[tokio::test]
    async fn rounding_to_100_percent_does_not_exceed_the_limit() {
        let store = Arc::new(InMemoryStore::new());
        let service = alerts(&store);
        seed_budget(&store, true).await;

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(299.99), d(2024, 1, 20));
        let created = service
            .evaluate_expense_change(OWNER, &[ExpenseCategory::Food], &[d(2024, 1, 20)])
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].notification_type, NotificationType::ThresholdReached);
    }

    #[tokio::test]
    async fn threshold_alert_rearms_after_spend_drops() {
        let store = Arc::new(InMemoryStore::new());
        let service = alerts(&store);
        let budget = seed_budget(&store, true).await;
        let food = [ExpenseCategory::Food];

        let expense = store.seed_expense(OWNER, ExpenseCategory::Food, dec!(250), d(2024, 1, 20));
        let created = service
            .evaluate_expense_change(OWNER, &food, &[d(2024, 1, 20)])
            .await
            .unwrap();
        assert_eq!(created.len(), 1);

        store.delete_expense(OWNER.to_string(), expense.id).await.unwrap();
        let below = service
            .evaluate_budget(OWNER, &budget.budget.id)
            .await
            .unwrap();
        assert!(below.is_empty());

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(260), d(2024, 1, 22));
        let recrossed = service
            .evaluate_expense_change(OWNER, &food, &[d(2024, 1, 22)])
            .await
            .unwrap();
        assert_eq!(recrossed.len(), 1);
        assert_eq!(recrossed[0].notification_type, NotificationType::ThresholdReached);

        let all = NotificationService::new(store.clone())
            .list_notifications(OWNER, false)
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn staying_above_threshold_does_not_rearm() {
        let store = Arc::new(InMemoryStore::new());
        let service = alerts(&store);
        seed_budget(&store, true).await;
        let food = [ExpenseCategory::Food];

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(320), d(2024, 1, 20));
        assert_eq!(
            service
                .evaluate_expense_change(OWNER, &food, &[d(2024, 1, 20)])
                .await
                .unwrap()
                .len(),
            2
        );

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(5), d(2024, 1, 21));
        let again = service
            .evaluate_expense_change(OWNER, &food, &[d(2024, 1, 21)])
            .await
            .unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn disabled_notifications_stay_silent() {
        let store = Arc::new(InMemoryStore::new());
        let service = alerts(&store);
        let budget = seed_budget(&store, false).await;

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(500), d(2024, 1, 20));
        let created = service
            .evaluate_budget(OWNER, &budget.budget.id)
            .await
            .unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn expenses_outside_the_window_are_ignored() {
        let store = Arc::new(InMemoryStore::new());
        let service = alerts(&store);
        seed_budget(&store, true).await;

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(500), d(2024, 2, 20));
        let created = service
            .evaluate_expense_change(OWNER, &[ExpenseCategory::Food], &[d(2024, 2, 20)])
            .await
            .unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn read_state_round_trip() {
        let store = Arc::new(InMemoryStore::new());
        let alert_service = alerts(&store);
        let notifications = NotificationService::new(store.clone());
        seed_budget(&store, true).await;

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(320), d(2024, 1, 20));
        alert_service
            .evaluate_expense_change(OWNER, &[ExpenseCategory::Food], &[d(2024, 1, 20)])
            .await
            .unwrap();

        let unread = notifications.list_notifications(OWNER, true).unwrap();
        assert_eq!(unread.len(), 2);

        notifications.mark_read(OWNER, &unread[0].id).await.unwrap();
        assert_eq!(notifications.list_notifications(OWNER, true).unwrap().len(), 1);

        notifications.mark_unread(OWNER, &unread[0].id).await.unwrap();
        assert_eq!(notifications.list_notifications(OWNER, true).unwrap().len(), 2);

        assert_eq!(notifications.mark_all_read(OWNER).await.unwrap(), 2);
        assert!(notifications.list_notifications(OWNER, true).unwrap().is_empty());
        assert_eq!(notifications.list_notifications(OWNER, false).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn foreign_notifications_are_hidden() {
        let store = Arc::new(InMemoryStore::new());
        let alert_service = alerts(&store);
        let notifications = NotificationService::new(store.clone());
        seed_budget(&store, true).await;

        store.seed_expense(OWNER, ExpenseCategory::Food, dec!(250), d(2024, 1, 20));
        let created = alert_service
            .evaluate_expense_change(OWNER, &[ExpenseCategory::Food], &[d(2024, 1, 20)])
            .await
            .unwrap();

        assert!(notifications.list_notifications("user-2", false).unwrap().is_empty());
        assert!(matches!(
            notifications.mark_read("user-2", &created[0].id).await,
            Err(Error::NotFound(_))
        ));
    }
}
