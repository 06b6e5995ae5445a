//! In-process change notifications.
//!
//! Every successful store write publishes a [`ChangeEvent`]. Clients hold a
//! [`Subscription`] filtered to one user (and optionally one table) and
//! refetch when an event arrives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Users,
    Transactions,
    Investments,
    SavingsGoals,
    BudgetCategories,
    FinancialSummaries,
    BadHabits,
    HabitTracking,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Transactions => "transactions",
            Self::Investments => "investments",
            Self::SavingsGoals => "savings_goals",
            Self::BudgetCategories => "budget_categories",
            Self::FinancialSummaries => "financial_summaries",
            Self::BadHabits => "bad_habits",
            Self::HabitTracking => "habit_tracking",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "users" => Ok(Self::Users),
            "transactions" => Ok(Self::Transactions),
            "investments" => Ok(Self::Investments),
            "savings_goals" => Ok(Self::SavingsGoals),
            "budget_categories" => Ok(Self::BudgetCategories),
            "financial_summaries" => Ok(Self::FinancialSummaries),
            "bad_habits" => Ok(Self::BadHabits),
            "habit_tracking" => Ok(Self::HabitTracking),
            other => Err(format!("unknown table {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub user_id: Uuid,
    pub row_id: Uuid,
}

impl ChangeEvent {
    pub fn new(table: Table, kind: ChangeKind, user_id: Uuid, row_id: Uuid) -> Self {
        Self { table, kind, user_id, row_id }
    }
}

/// Broadcast hub shared by the store and all subscribers.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        tracing::trace!(table = %event.table, kind = ?event.kind, row = %event.row_id, "change");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self, user_id: Uuid, table: Option<Table>) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            user_id,
            table,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Receiving side of the feed, filtered to one user.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
    user_id: Uuid,
    table: Option<Table>,
}

impl Subscription {
    fn matches(&self, event: &ChangeEvent) -> bool {
        event.user_id == self.user_id && self.table.map_or(true, |t| t == event.table)
    }

    /// Waits for the next matching event. Returns `None` once the feed is gone.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change subscription lagged; events dropped");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next matching event already queued, without waiting.
    pub fn try_next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change subscription lagged; events dropped");
                    continue;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drains everything queued and reports whether any matching event was seen.
    pub fn drain(&mut self) -> bool {
        let mut seen = false;
        while self.try_next().is_some() {
            seen = true;
        }
        seen
    }
}
