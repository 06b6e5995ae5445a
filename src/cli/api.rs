//! Session-bound access to the store for the terminal client.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::{Authenticator, Session};
use crate::database::models::{
    BadHabit, BudgetCategory, Investment, NewBadHabit, NewBudgetCategory, NewInvestment, NewSavingsGoal,
    NewTransaction, SavingsGoal, SavingsGoalPatch, SummaryPatch, Transaction, User,
};
use crate::error::{AppError, AppResult};
use crate::finance::dashboard::{self, Dashboard, DashboardInput};
use crate::finance::{habits, Month};
use crate::realtime::Subscription;
use crate::store::Store;

/// A habit with the figures its row shows.
#[derive(Debug, Clone)]
pub struct HabitRow {
    pub habit: BadHabit,
    pub streak: u32,
    pub month_savings: Decimal,
    /// `Some(avoided)` once today has been tracked.
    pub today: Option<bool>,
}

/// Everything the tabs render, fetched in one go.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub dashboard: Dashboard,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<BudgetCategory>,
    pub goals: Vec<SavingsGoal>,
    pub investments: Vec<Investment>,
    pub habits: Vec<HabitRow>,
    pub habit_savings: Decimal,
}

pub struct Client {
    store: Store,
    auth: Authenticator,
    session: Option<Session>,
    changes: Option<Subscription>,
}

impl Client {
    pub fn new(store: Store, auth: Authenticator) -> Self {
        Self {
            store,
            auth,
            session: None,
            changes: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn currency(&self) -> String {
        self.user()
            .and_then(|u| u.currency.clone())
            .unwrap_or_else(|| crate::config::DEFAULT_CURRENCY.to_string())
    }

    fn user_id(&self) -> AppResult<Uuid> {
        self.user()
            .map(|u| u.id)
            .ok_or_else(|| AppError::Unauthorized("not signed in".into()))
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> AppResult<()> {
        let session = self.auth.sign_in(email, password).await?;
        self.changes = Some(self.store.subscribe(session.user.id, None));
        tracing::info!(user = %session.user.id, "signed in");
        self.session = Some(session);
        Ok(())
    }

    pub async fn sign_up(&mut self, email: &str, password: &str, full_name: Option<&str>) -> AppResult<()> {
        self.auth.sign_up(email, password, full_name).await?;
        self.sign_in(email, password).await
    }

    pub async fn sign_out(&mut self) -> AppResult<()> {
        self.changes = None;
        if let Some(session) = self.session.take() {
            self.auth.sign_out(&session.token).await?;
        }
        Ok(())
    }

    /// True when any of the user's rows changed since the last call.
    pub fn poll_changes(&mut self) -> bool {
        self.changes.as_mut().map_or(false, Subscription::drain)
    }

    pub async fn snapshot(&self, month: Month, today: NaiveDate) -> AppResult<Snapshot> {
        let user_id = self.user_id()?;

        let summary = self.store.summary(user_id).await?;
        let transactions = self.store.list_transactions(user_id).await?;
        let categories = self.store.list_budget_categories(user_id).await?;
        let goals = self.store.list_goals(user_id).await?;
        let investments = self.store.list_investments(user_id).await?;

        let mut habit_rows = Vec::new();
        let mut habit_savings = Decimal::ZERO;
        for habit in self.store.list_habits(user_id).await? {
            let entries = self.store.habit_tracking(user_id, habit.id).await?;
            let month_savings = habits::savings(&habit, &entries, month.first_day(), month.last_day());
            habit_savings = habit_savings.saturating_add(month_savings);
            habit_rows.push(HabitRow {
                streak: habits::streak(&entries, today),
                month_savings,
                today: entries.iter().find(|e| e.date == today).map(|e| e.avoided),
                habit,
            });
        }

        let dashboard = dashboard::build(
            DashboardInput {
                summary,
                transactions: &transactions,
                categories: &categories,
                goals: &goals,
                investments: &investments,
            },
            month,
            today,
        );

        Ok(Snapshot {
            dashboard,
            transactions,
            categories,
            goals,
            investments,
            habits: habit_rows,
            habit_savings,
        })
    }

    pub async fn add_transaction(&self, new: NewTransaction) -> AppResult<()> {
        self.store.add_transaction(self.user_id()?, new).await.map(drop)
    }

    pub async fn delete_transaction(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_transaction(self.user_id()?, id).await
    }

    pub async fn add_investment(&self, new: NewInvestment) -> AppResult<()> {
        self.store.add_investment(self.user_id()?, new).await.map(drop)
    }

    pub async fn delete_investment(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_investment(self.user_id()?, id).await
    }

    pub async fn add_goal(&self, new: NewSavingsGoal) -> AppResult<()> {
        self.store.add_goal(self.user_id()?, new).await.map(drop)
    }

    /// Adds `amount` to the goal's saved total.
    pub async fn contribute_to_goal(&self, goal: &SavingsGoal, amount: Decimal) -> AppResult<()> {
        let current = goal
            .current_amount
            .checked_add(amount)
            .ok_or_else(|| AppError::validation("contribution is too large"))?;
        let patch = SavingsGoalPatch {
            current_amount: Some(current),
            ..SavingsGoalPatch::default()
        };
        self.store.update_goal(self.user_id()?, goal.id, patch).await.map(drop)
    }

    pub async fn delete_goal(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_goal(self.user_id()?, id).await
    }

    pub async fn add_budget_category(&self, new: NewBudgetCategory) -> AppResult<()> {
        self.store.add_budget_category(self.user_id()?, new).await.map(drop)
    }

    pub async fn delete_budget_category(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_budget_category(self.user_id()?, id).await
    }

    pub async fn add_habit(&self, new: NewBadHabit) -> AppResult<()> {
        self.store.add_habit(self.user_id()?, new).await.map(drop)
    }

    pub async fn delete_habit(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_habit(self.user_id()?, id).await
    }

    pub async fn track_habit(&self, id: Uuid, date: NaiveDate, avoided: bool) -> AppResult<()> {
        self.store.track_habit(self.user_id()?, id, date, avoided).await.map(drop)
    }

    pub async fn update_summary(&self, patch: SummaryPatch) -> AppResult<()> {
        self.store.update_summary(self.user_id()?, patch).await.map(drop)
    }
}
