use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user aggregate. `current_balance` and `monthly_income` are entered by
/// the user; the two totals are recomputed from transactions and investments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_balance: Decimal,
    pub monthly_income: Decimal,
    pub total_investments: Decimal,
    pub total_expenses: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancialSummary {
    pub fn zeroed(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            current_balance: Decimal::ZERO,
            monthly_income: Decimal::ZERO,
            total_investments: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryPatch {
    pub current_balance: Option<Decimal>,
    pub monthly_income: Option<Decimal>,
}

impl SummaryPatch {
    pub fn apply(self, s: &mut FinancialSummary) {
        if let Some(balance) = self.current_balance {
            s.current_balance = balance;
        }
        if let Some(income) = self.monthly_income {
            s.monthly_income = income;
        }
    }
}
