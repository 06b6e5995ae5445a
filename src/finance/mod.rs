//! Aggregation over rows that have already been fetched: budget usage,
//! spending breakdowns, goal progress, habit streaks and the dashboard view.
//! Nothing in here touches the database.

pub mod budget;
pub mod dashboard;
pub mod goals;
pub mod habits;
pub mod month;
pub mod portfolio;
pub mod spending;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub use month::Month;

/// `part / whole` as a whole percentage clamped to `0..=100`, rounding
/// halves up. A zero or negative `whole` yields 0; a ratio too large to
/// represent yields 100.
pub fn percentage(part: Decimal, whole: Decimal) -> u8 {
    if whole <= Decimal::ZERO || part <= Decimal::ZERO {
        return 0;
    }
    let Some(scaled) = part
        .checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    else {
        return 100;
    };
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(100)
}

/// Sum that saturates at `Decimal::MAX`/`Decimal::MIN` instead of panicking.
pub fn total<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Grouping key for free-text categories.
pub(crate) fn category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::database::models::{Transaction, TransactionType};

    pub fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    pub fn date(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    pub fn txn(kind: TransactionType, amount: &str, category: &str, on: NaiveDate) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            amount: d(amount),
            kind,
            category: category.to_string(),
            date: on,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn expense(amount: &str, category: &str, on: NaiveDate) -> Transaction {
        txn(TransactionType::Expense, amount, category, on)
    }

    pub fn income(amount: &str, category: &str, on: NaiveDate) -> Transaction {
        txn(TransactionType::Income, amount, category, on)
    }
}
