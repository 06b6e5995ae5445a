//! Owner-scoped access to every table.
//!
//! Each write validates its input, runs the SQL, then publishes a
//! [`ChangeEvent`] so subscribed clients can refetch. Rows belonging to
//! another user are reported as [`AppError::NotFound`].

mod budget;
mod goals;
mod habits;
mod investments;
mod profile;
mod summary;
mod transactions;
pub mod validate;

use chrono::NaiveDate;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::finance::dashboard::{self, Dashboard, DashboardInput};
use crate::finance::Month;
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeKind, Subscription, Table};

#[derive(Debug, Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
    feed: ChangeFeed,
}

impl Store {
    pub fn new(pool: Pool<Sqlite>, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Change events for one user, optionally limited to one table.
    pub fn subscribe(&self, user_id: Uuid, table: Option<Table>) -> Subscription {
        self.feed.subscribe(user_id, table)
    }

    fn publish(&self, table: Table, kind: ChangeKind, user_id: Uuid, row_id: Uuid) {
        tracing::debug!(%table, ?kind, user = %user_id, row = %row_id, "row written");
        self.feed.publish(ChangeEvent::new(table, kind, user_id, row_id));
    }

    /// Fetches everything the dashboard needs and aggregates it for `month`.
    pub async fn dashboard(&self, user_id: Uuid, month: Month, today: NaiveDate) -> AppResult<Dashboard> {
        let summary = self.summary(user_id).await?;
        let transactions = self.list_transactions(user_id).await?;
        let categories = self.list_budget_categories(user_id).await?;
        let goals = self.list_goals(user_id).await?;
        let investments = self.list_investments(user_id).await?;

        Ok(dashboard::build(
            DashboardInput {
                summary,
                transactions: &transactions,
                categories: &categories,
                goals: &goals,
                investments: &investments,
            },
            month,
            today,
        ))
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::validation(format!(
            "range start {start} is after end {end}"
        )));
    }
    Ok(())
}
