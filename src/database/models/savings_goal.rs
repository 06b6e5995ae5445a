use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Option<Decimal>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewSavingsGoal {
    pub fn into_row(self, user_id: Uuid, now: DateTime<Utc>) -> SavingsGoal {
        SavingsGoal {
            id: Uuid::new_v4(),
            user_id,
            name: self.name.trim().to_string(),
            target_amount: self.target_amount,
            current_amount: self.current_amount.unwrap_or(Decimal::ZERO),
            deadline: self.deadline,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavingsGoalPatch {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub description: Option<String>,
}

impl SavingsGoalPatch {
    pub fn apply(self, g: &mut SavingsGoal) {
        if let Some(name) = self.name {
            g.name = name.trim().to_string();
        }
        if let Some(target) = self.target_amount {
            g.target_amount = target;
        }
        if let Some(current) = self.current_amount {
            g.current_amount = current;
        }
        if let Some(deadline) = self.deadline {
            g.deadline = Some(deadline);
        }
        if let Some(description) = self.description {
            g.description = Some(description);
        }
    }
}
