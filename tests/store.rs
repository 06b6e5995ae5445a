mod common;

use chrono::{Duration, NaiveDate, Utc};
use common::{d, harness};
use finance_dashboard::database::models::{
    BudgetCategoryPatch, InvestmentType, NewBadHabit, NewBudgetCategory, NewInvestment, NewSavingsGoal,
    NewTransaction, ProfilePatch, SavingsGoalPatch, SummaryPatch, TransactionPatch, TransactionType,
};
use finance_dashboard::database::db::queries::summaries;
use finance_dashboard::error::AppError;
use finance_dashboard::finance::Month;
use finance_dashboard::realtime::{ChangeKind, Table};
use finance_dashboard::store::validate::MAX_AMOUNT;

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn expense(amount: &str, category: &str, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        amount: d(amount),
        kind: TransactionType::Expense,
        category: category.into(),
        date: on,
        description: None,
    }
}

fn income(amount: &str, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        kind: TransactionType::Income,
        ..expense(amount, "salary", on)
    }
}

#[tokio::test]
async fn transactions_are_newest_first_and_owner_scoped() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let bob = h.user("bob@example.com").await;

    h.store.add_transaction(alice.id, expense("10", "food", date(2024, 3, 1))).await.unwrap();
    let later = h
        .store
        .add_transaction(alice.id, expense("20", "transport", date(2024, 3, 5)))
        .await
        .unwrap();
    let same_day = h
        .store
        .add_transaction(alice.id, income("900", date(2024, 3, 5)))
        .await
        .unwrap();

    let list = h.store.list_transactions(alice.id).await.unwrap();
    let ids: Vec<_> = list.iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], same_day.id);
    assert_eq!(ids[1], later.id);
    assert_eq!(list[2].date, date(2024, 3, 1));

    assert!(h.store.list_transactions(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn foreign_rows_look_missing() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let bob = h.user("bob@example.com").await;

    let t = h
        .store
        .add_transaction(alice.id, expense("10", "food", date(2024, 3, 1)))
        .await
        .unwrap();

    let patch = TransactionPatch {
        amount: Some(d("99")),
        ..Default::default()
    };
    assert!(matches!(
        h.store.update_transaction(bob.id, t.id, patch).await,
        Err(AppError::NotFound("transaction"))
    ));
    assert!(matches!(
        h.store.delete_transaction(bob.id, t.id).await,
        Err(AppError::NotFound(_))
    ));

    let still_there = h.store.list_transactions(alice.id).await.unwrap();
    assert_eq!(still_there[0].amount, d("10"));
}

#[tokio::test]
async fn update_merges_patch_and_validates() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let t = h
        .store
        .add_transaction(alice.id, expense("10", "food", date(2024, 3, 1)))
        .await
        .unwrap();

    let updated = h
        .store
        .update_transaction(
            alice.id,
            t.id,
            TransactionPatch {
                category: Some(" groceries ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category, "groceries");
    assert_eq!(updated.amount, d("10"));
    assert!(updated.updated_at >= t.updated_at);

    let negative = TransactionPatch {
        amount: Some(d("-5")),
        ..Default::default()
    };
    assert!(matches!(
        h.store.update_transaction(alice.id, t.id, negative).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        h.store.add_transaction(alice.id, expense("-1", "food", date(2024, 3, 1))).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn summary_totals_follow_writes() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let today = Utc::now().date_naive();
    let last_year = today - Duration::days(400);

    h.store
        .update_summary(
            alice.id,
            SummaryPatch {
                current_balance: Some(d("250")),
                monthly_income: Some(d("3000")),
            },
        )
        .await
        .unwrap();

    let groceries = h.store.add_transaction(alice.id, expense("100", "food", today)).await.unwrap();
    h.store.add_transaction(alice.id, expense("50", "food", last_year)).await.unwrap();
    h.store.add_transaction(alice.id, income("1000", today)).await.unwrap();
    let stocks = h
        .store
        .add_investment(
            alice.id,
            NewInvestment {
                name: "Index fund".into(),
                amount: d("500"),
                kind: InvestmentType::Stocks,
                description: None,
            },
        )
        .await
        .unwrap();

    let summary = h.store.summary(alice.id).await.unwrap();
    assert_eq!(summary.total_expenses, d("100"));
    assert_eq!(summary.total_investments, d("500"));
    assert_eq!(summary.current_balance, d("250"));
    assert_eq!(summary.monthly_income, d("3000"));

    h.store.delete_transaction(alice.id, groceries.id).await.unwrap();
    h.store.delete_investment(alice.id, stocks.id).await.unwrap();
    let summary = h.store.summary(alice.id).await.unwrap();
    assert_eq!(summary.total_expenses, d("0"));
    assert_eq!(summary.total_investments, d("0"));
    assert_eq!(summary.current_balance, d("250"));
}

#[tokio::test]
async fn stale_totals_write_keeps_the_users_balance() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;

    // A recompute that read the row before the user edited their balance.
    let mut stale = summaries::get_by_user(h.store.pool(), alice.id).await.unwrap().unwrap();

    h.store
        .update_summary(
            alice.id,
            SummaryPatch {
                current_balance: Some(d("500")),
                monthly_income: Some(d("2000")),
            },
        )
        .await
        .unwrap();

    stale.total_investments = d("75");
    stale.updated_at = Utc::now();
    assert!(summaries::set_totals(h.store.pool(), &stale).await.unwrap());

    let summary = h.store.summary(alice.id).await.unwrap();
    assert_eq!(summary.current_balance, d("500"));
    assert_eq!(summary.monthly_income, d("2000"));
    assert_eq!(summary.total_investments, d("75"));
}

#[tokio::test]
async fn oversized_amounts_are_rejected_before_they_are_stored() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let huge = d("50000000000000000000000000000");

    for _ in 0..2 {
        let result = h
            .store
            .add_investment(
                alice.id,
                NewInvestment {
                    name: "Moonshot".into(),
                    amount: huge,
                    kind: InvestmentType::Crypto,
                    description: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
    assert!(h.store.list_investments(alice.id).await.unwrap().is_empty());

    assert!(matches!(
        h.store
            .update_summary(
                alice.id,
                SummaryPatch {
                    current_balance: Some(-huge),
                    monthly_income: None,
                },
            )
            .await,
        Err(AppError::Validation(_))
    ));

    // The largest accepted amounts still aggregate without trouble.
    let today = Utc::now().date_naive();
    h.store
        .add_budget_category(
            alice.id,
            NewBudgetCategory {
                name: "food".into(),
                monthly_limit: d("0.01"),
            },
        )
        .await
        .unwrap();
    for _ in 0..2 {
        h.store
            .add_transaction(alice.id, expense(&MAX_AMOUNT.to_string(), "food", today))
            .await
            .unwrap();
    }
    let dashboard = h.store.dashboard(alice.id, Month::of(today), today).await.unwrap();
    assert_eq!(dashboard.budget.percentage, 100);
    assert_eq!(dashboard.categories[0].progress.spent, MAX_AMOUNT * d("2"));
    assert_eq!(dashboard.summary.total_expenses, MAX_AMOUNT * d("2"));
}

#[tokio::test]
async fn negative_balance_is_allowed_but_not_negative_income() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;

    let s = h
        .store
        .update_summary(
            alice.id,
            SummaryPatch {
                current_balance: Some(d("-120.75")),
                monthly_income: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(s.current_balance, d("-120.75"));

    assert!(matches!(
        h.store
            .update_summary(
                alice.id,
                SummaryPatch {
                    current_balance: None,
                    monthly_income: Some(d("-1")),
                },
            )
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn missing_summary_is_created_on_read() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;

    sqlx::query("DELETE FROM financial_summaries WHERE user_id = ?")
        .bind(alice.id.to_string())
        .execute(h.store.pool())
        .await
        .unwrap();

    let mut changes = h.store.subscribe(alice.id, Some(Table::FinancialSummaries));
    let first = h.store.summary(alice.id).await.unwrap();
    assert_eq!(first.current_balance, d("0"));
    assert_eq!(changes.try_next().map(|e| e.kind), Some(ChangeKind::Insert));

    let second = h.store.summary(alice.id).await.unwrap();
    assert_eq!(first.id, second.id);
    assert!(changes.try_next().is_none());
}

#[tokio::test]
async fn schema_rejects_rows_that_bypass_validation() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let now = Utc::now().to_rfc3339();
    let insert = |amount: &'static str, kind: &'static str| {
        sqlx::query(
            "INSERT INTO investments (id, user_id, name, amount, type, created_at, updated_at) \
             VALUES (?, ?, 'Fund', ?, ?, ?, ?)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(alice.id.to_string())
        .bind(amount)
        .bind(kind)
        .bind(now.clone())
        .bind(now.clone())
    };

    assert!(insert("10", "stocks").execute(h.store.pool()).await.is_ok());
    assert!(insert("10", "lottery").execute(h.store.pool()).await.is_err());
    assert!(insert("-10", "bonds").execute(h.store.pool()).await.is_err());

    let result = sqlx::query("UPDATE financial_summaries SET monthly_income = '-1' WHERE user_id = ?")
        .bind(alice.id.to_string())
        .execute(h.store.pool())
        .await;
    assert!(result.is_err());
    assert_eq!(h.store.list_investments(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn writes_publish_change_events() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let bob = h.user("bob@example.com").await;
    let mut changes = h.store.subscribe(alice.id, None);
    let mut bobs = h.store.subscribe(bob.id, None);

    let t = h
        .store
        .add_transaction(alice.id, expense("10", "food", date(2024, 3, 1)))
        .await
        .unwrap();

    let first = changes.try_next().unwrap();
    assert_eq!((first.table, first.kind, first.row_id), (Table::Transactions, ChangeKind::Insert, t.id));
    let second = changes.try_next().unwrap();
    assert_eq!((second.table, second.kind), (Table::FinancialSummaries, ChangeKind::Update));
    assert!(changes.try_next().is_none());

    h.store.delete_transaction(alice.id, t.id).await.unwrap();
    assert_eq!(changes.try_next().map(|e| e.kind), Some(ChangeKind::Delete));
    assert!(changes.drain());

    assert!(!bobs.drain());
}

#[tokio::test]
async fn goal_bounds_hold_on_insert_and_update() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;

    let goal = h
        .store
        .add_goal(
            alice.id,
            NewSavingsGoal {
                name: "Holiday".into(),
                target_amount: d("2000"),
                current_amount: None,
                deadline: Some(date(2030, 6, 1)),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(goal.current_amount, d("0"));

    let over = NewSavingsGoal {
        name: "Laptop".into(),
        target_amount: d("1000"),
        current_amount: Some(d("1500")),
        deadline: None,
        description: None,
    };
    assert!(matches!(h.store.add_goal(alice.id, over).await, Err(AppError::Validation(_))));

    let saved = h
        .store
        .update_goal(
            alice.id,
            goal.id,
            SavingsGoalPatch {
                current_amount: Some(d("800")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(saved.current_amount, d("800"));

    let shrink = SavingsGoalPatch {
        target_amount: Some(d("500")),
        ..Default::default()
    };
    assert!(matches!(
        h.store.update_goal(alice.id, goal.id, shrink).await,
        Err(AppError::Validation(_))
    ));

    let goals = h.store.list_goals(alice.id).await.unwrap();
    assert_eq!(goals[0].target_amount, d("2000"));
    assert_eq!(goals[0].deadline, Some(date(2030, 6, 1)));
}

#[tokio::test]
async fn budget_categories_sorted_and_unique() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let bob = h.user("bob@example.com").await;

    for (name, limit) in [("Transport", "100"), ("Food", "400"), ("Entertainment", "50")] {
        h.store
            .add_budget_category(
                alice.id,
                NewBudgetCategory {
                    name: name.into(),
                    monthly_limit: d(limit),
                },
            )
            .await
            .unwrap();
    }

    let names: Vec<String> = h
        .store
        .list_budget_categories(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Entertainment", "Food", "Transport"]);

    let dup = NewBudgetCategory {
        name: "Food".into(),
        monthly_limit: d("1"),
    };
    assert!(matches!(
        h.store.add_budget_category(alice.id, dup.clone()).await,
        Err(AppError::Conflict(_))
    ));
    h.store.add_budget_category(bob.id, dup).await.unwrap();

    let blank = NewBudgetCategory {
        name: "   ".into(),
        monthly_limit: d("1"),
    };
    assert!(matches!(
        h.store.add_budget_category(alice.id, blank).await,
        Err(AppError::Validation(_))
    ));

    let food = h.store.list_budget_categories(alice.id).await.unwrap().remove(1);
    let rename_clash = BudgetCategoryPatch {
        name: Some("Transport".into()),
        monthly_limit: None,
    };
    assert!(matches!(
        h.store.update_budget_category(alice.id, food.id, rename_clash).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn habit_tracking_streaks_and_savings() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let habit = h
        .store
        .add_habit(
            alice.id,
            NewBadHabit {
                title: "Takeaway coffee".into(),
                description: None,
                cost_per_occurrence: d("4.50"),
            },
        )
        .await
        .unwrap();
    let today = Utc::now().date_naive();

    for days_ago in 1..=3 {
        h.store
            .track_habit(alice.id, habit.id, today - Duration::days(days_ago), true)
            .await
            .unwrap();
    }
    assert_eq!(h.store.habit_streak(alice.id, habit.id, today).await.unwrap(), 3);

    let mut changes = h.store.subscribe(alice.id, Some(Table::HabitTracking));
    let first = h.store.track_habit(alice.id, habit.id, today, true).await.unwrap();
    assert_eq!(changes.try_next().map(|e| e.kind), Some(ChangeKind::Insert));
    assert_eq!(h.store.habit_streak(alice.id, habit.id, today).await.unwrap(), 4);

    // Same day again overwrites the answer.
    let again = h.store.track_habit(alice.id, habit.id, today, false).await.unwrap();
    assert_eq!(again.id, first.id);
    assert_eq!(changes.try_next().map(|e| e.kind), Some(ChangeKind::Update));
    assert!(!again.avoided);
    assert_eq!(h.store.habit_streak(alice.id, habit.id, today).await.unwrap(), 0);
    assert_eq!(h.store.habit_tracking(alice.id, habit.id).await.unwrap().len(), 4);

    let start = today - Duration::days(10);
    let stats = h.store.habit_statistics(alice.id, habit.id, start, today).await.unwrap();
    assert_eq!(stats.len(), 4);
    assert!(stats.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(stats[3].savings, d("0"));

    let saved = h.store.habit_savings(alice.id, habit.id, start, today).await.unwrap();
    assert_eq!(saved, d("13.50"));
    let total = h.store.total_habit_savings(alice.id, start, today).await.unwrap();
    assert_eq!(total, d("13.50"));

    assert!(matches!(
        h.store.habit_savings(alice.id, habit.id, today, start).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        h.store.habit_statistics(alice.id, habit.id, today, start).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn deleting_a_habit_removes_its_history() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    let bob = h.user("bob@example.com").await;
    let habit = h
        .store
        .add_habit(
            alice.id,
            NewBadHabit {
                title: "Vending machine".into(),
                description: Some("afternoon snacks".into()),
                cost_per_occurrence: d("2"),
            },
        )
        .await
        .unwrap();
    h.store.track_habit(alice.id, habit.id, date(2024, 1, 1), true).await.unwrap();

    assert!(matches!(
        h.store.track_habit(bob.id, habit.id, date(2024, 1, 2), true).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(h.store.delete_habit(bob.id, habit.id).await, Err(AppError::NotFound(_))));

    h.store.delete_habit(alice.id, habit.id).await.unwrap();
    let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM habit_tracking WHERE habit_id = ?")
        .bind(habit.id.to_string())
        .fetch_one(h.store.pool())
        .await
        .unwrap();
    assert_eq!(left, 0);
    assert!(h.store.list_habits(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_updates() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;
    assert_eq!(alice.currency.as_deref(), Some("TND"));
    let mut changes = h.store.subscribe(alice.id, Some(Table::Users));

    let updated = h
        .store
        .update_profile(
            alice.id,
            ProfilePatch {
                full_name: Some("Alice Liddell".into()),
                currency: Some("eur".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.currency.as_deref(), Some("EUR"));
    assert_eq!(h.store.profile(alice.id).await.unwrap().full_name.as_deref(), Some("Alice Liddell"));
    assert_eq!(changes.try_next().map(|e| e.kind), Some(ChangeKind::Update));

    let bad = ProfilePatch {
        full_name: None,
        currency: Some("euro".into()),
    };
    assert!(matches!(h.store.update_profile(alice.id, bad).await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn dashboard_aggregates_the_month() {
    let h = harness().await;
    let alice = h.user("alice@example.com").await;

    h.store
        .add_budget_category(
            alice.id,
            NewBudgetCategory {
                name: "Food".into(),
                monthly_limit: d("200"),
            },
        )
        .await
        .unwrap();
    h.store.add_transaction(alice.id, expense("150", "food", date(2024, 5, 2))).await.unwrap();
    h.store.add_transaction(alice.id, expense("30", "Transport", date(2024, 5, 3))).await.unwrap();
    h.store.add_transaction(alice.id, expense("500", "food", date(2024, 4, 30))).await.unwrap();

    let dash = h
        .store
        .dashboard(alice.id, Month::new(2024, 5).unwrap(), date(2024, 5, 20))
        .await
        .unwrap();
    assert_eq!(dash.categories[0].progress.spent, d("150"));
    assert_eq!(dash.categories[0].progress.percentage, 75);
    assert_eq!(dash.budget.spent, d("180"));
    assert_eq!(dash.budget.percentage, 90);
    assert_eq!(dash.spending.len(), 2);
    assert_eq!(dash.spending[0].category, "food");
    assert_eq!(dash.recent_transactions.len(), 3);
}
