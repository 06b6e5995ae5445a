use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::budget::{self, BudgetProgress, CategoryBudget};
use super::goals::{self, GoalProgress};
use super::portfolio::{portfolio, Portfolio};
use super::spending::{breakdown, CategoryShare};
use super::Month;
use crate::database::models::{BudgetCategory, FinancialSummary, Investment, SavingsGoal, Transaction};

pub const RECENT_TRANSACTIONS: usize = 5;

/// Everything the dashboard page shows for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub month: Month,
    pub summary: FinancialSummary,
    pub budget: BudgetProgress,
    pub categories: Vec<CategoryBudget>,
    pub spending: Vec<CategoryShare>,
    pub goals: Vec<GoalProgress>,
    pub investments: Portfolio,
    pub recent_transactions: Vec<Transaction>,
}

pub struct DashboardInput<'a> {
    pub summary: FinancialSummary,
    /// Newest first, as the store lists them.
    pub transactions: &'a [Transaction],
    pub categories: &'a [BudgetCategory],
    pub goals: &'a [SavingsGoal],
    pub investments: &'a [Investment],
}

pub fn build(input: DashboardInput<'_>, month: Month, today: NaiveDate) -> Dashboard {
    Dashboard {
        month,
        summary: input.summary,
        budget: budget::overall(input.categories, input.transactions, month),
        categories: budget::category_report(input.categories, input.transactions, month),
        spending: breakdown(input.transactions, Some(month)),
        goals: input.goals.iter().map(|g| goals::progress(g, today)).collect(),
        investments: portfolio(input.investments),
        recent_transactions: input
            .transactions
            .iter()
            .take(RECENT_TRANSACTIONS)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::fixtures::{d, date, expense, income};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn builds_month_view() {
        let now = Utc::now();
        let user = Uuid::nil();
        let transactions: Vec<Transaction> = (1..=7)
            .rev()
            .map(|day| expense("10", "food", date(2024, 6, day)))
            .chain(std::iter::once(income("900", "salary", date(2024, 5, 31))))
            .collect();
        let categories = vec![BudgetCategory {
            id: Uuid::new_v4(),
            user_id: user,
            name: "Food".into(),
            monthly_limit: d("100"),
            created_at: now,
        }];

        let dash = build(
            DashboardInput {
                summary: FinancialSummary::zeroed(user, now),
                transactions: &transactions,
                categories: &categories,
                goals: &[],
                investments: &[],
            },
            Month::new(2024, 6).unwrap(),
            date(2024, 6, 15),
        );

        assert_eq!(dash.budget.spent, d("70"));
        assert_eq!(dash.budget.percentage, 70);
        assert_eq!(dash.categories[0].progress.spent, d("70"));
        assert_eq!(dash.spending.len(), 1);
        assert_eq!(dash.recent_transactions.len(), RECENT_TRANSACTIONS);
        assert_eq!(dash.recent_transactions[0].date, date(2024, 6, 7));
        assert!(dash.goals.is_empty());
        assert_eq!(dash.investments.total, d("0"));
    }
}
