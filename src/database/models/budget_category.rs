use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named monthly spending limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub monthly_limit: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudgetCategory {
    pub name: String,
    pub monthly_limit: Decimal,
}

impl NewBudgetCategory {
    pub fn into_row(self, user_id: Uuid, now: DateTime<Utc>) -> BudgetCategory {
        BudgetCategory {
            id: Uuid::new_v4(),
            user_id,
            name: self.name.trim().to_string(),
            monthly_limit: self.monthly_limit,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetCategoryPatch {
    pub name: Option<String>,
    pub monthly_limit: Option<Decimal>,
}

impl BudgetCategoryPatch {
    pub fn apply(self, c: &mut BudgetCategory) {
        if let Some(name) = self.name {
            c.name = name.trim().to_string();
        }
        if let Some(limit) = self.monthly_limit {
            c.monthly_limit = limit;
        }
    }
}
