use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{category_key, percentage, total, Month};
use crate::database::models::{BudgetCategory, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Healthy,
    Warning,
    Critical,
}

impl BudgetLevel {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            p if p > 90 => Self::Critical,
            p if p > 75 => Self::Warning,
            _ => Self::Healthy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub limit: Decimal,
    pub spent: Decimal,
    /// Negative once the budget is overspent.
    pub remaining: Decimal,
    pub percentage: u8,
    pub level: BudgetLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category_id: Uuid,
    pub name: String,
    pub progress: BudgetProgress,
}

pub fn progress(limit: Decimal, spent: Decimal) -> BudgetProgress {
    let percentage = if limit <= Decimal::ZERO {
        if spent > Decimal::ZERO { 100 } else { 0 }
    } else {
        percentage(spent, limit)
    };

    BudgetProgress {
        limit,
        spent,
        remaining: limit.saturating_sub(spent),
        percentage,
        level: BudgetLevel::from_percentage(percentage),
    }
}

fn expenses_in(transactions: &[Transaction], month: Month) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(move |t| t.is_expense() && month.contains(t.date))
}

/// Spending against each budget category for `month`, in the order the
/// categories were given.
pub fn category_report(
    categories: &[BudgetCategory],
    transactions: &[Transaction],
    month: Month,
) -> Vec<CategoryBudget> {
    categories
        .iter()
        .map(|c| {
            let key = category_key(&c.name);
            let spent = total(
                expenses_in(transactions, month)
                    .filter(|t| category_key(&t.category) == key)
                    .map(|t| t.amount),
            );
            CategoryBudget {
                category_id: c.id,
                name: c.name.clone(),
                progress: progress(c.monthly_limit, spent),
            }
        })
        .collect()
}

/// The monthly budget as a whole: the sum of every category limit against
/// every expense in the month.
pub fn overall(categories: &[BudgetCategory], transactions: &[Transaction], month: Month) -> BudgetProgress {
    let limit = total(categories.iter().map(|c| c.monthly_limit));
    let spent = total(expenses_in(transactions, month).map(|t| t.amount));
    progress(limit, spent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::fixtures::{d, date, expense, income};
    use chrono::Utc;

    fn category(name: &str, limit: &str) -> BudgetCategory {
        BudgetCategory {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.into(),
            monthly_limit: d(limit),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn progress_levels() {
        let p = progress(d("5000"), d("3275"));
        assert_eq!(p.percentage, 66);
        assert_eq!(p.remaining, d("1725"));
        assert_eq!(p.level, BudgetLevel::Healthy);

        assert_eq!(progress(d("100"), d("80")).level, BudgetLevel::Warning);
        assert_eq!(progress(d("100"), d("75")).level, BudgetLevel::Healthy);
        assert_eq!(progress(d("100"), d("91")).level, BudgetLevel::Critical);
        assert_eq!(progress(d("100"), d("90")).level, BudgetLevel::Warning);
    }

    #[test]
    fn overspending_caps_percentage_but_not_remaining() {
        let p = progress(d("200"), d("260.50"));
        assert_eq!(p.percentage, 100);
        assert_eq!(p.remaining, d("-60.50"));
        assert_eq!(p.level, BudgetLevel::Critical);
    }

    #[test]
    fn zero_limit() {
        assert_eq!(progress(d("0"), d("0")).percentage, 0);
        assert_eq!(progress(d("0"), d("1")).percentage, 100);
    }

    #[test]
    fn category_report_matches_names_within_month() {
        let month = Month::new(2024, 5).unwrap();
        let categories = vec![category("Food", "400"), category("Transport", "100")];
        let transactions = vec![
            expense("120", "food", date(2024, 5, 3)),
            expense("30.25", " FOOD ", date(2024, 5, 20)),
            expense("999", "food", date(2024, 4, 30)),
            income("50", "food", date(2024, 5, 4)),
            expense("45", "transport", date(2024, 5, 9)),
            expense("10", "entertainment", date(2024, 5, 9)),
        ];

        let report = category_report(&categories, &transactions, month);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "Food");
        assert_eq!(report[0].progress.spent, d("150.25"));
        assert_eq!(report[0].progress.percentage, 38);
        assert_eq!(report[1].progress.spent, d("45"));
        assert_eq!(report[1].progress.percentage, 45);

        let total = overall(&categories, &transactions, month);
        assert_eq!(total.limit, d("500"));
        assert_eq!(total.spent, d("205.25"));
        assert_eq!(total.percentage, 41);
    }
}
