use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring behavior that costs money each time it happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadHabit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub cost_per_occurrence: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBadHabit {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cost_per_occurrence: Decimal,
}

impl NewBadHabit {
    pub fn into_row(self, user_id: Uuid, now: DateTime<Utc>) -> BadHabit {
        BadHabit {
            id: Uuid::new_v4(),
            user_id,
            title: self.title.trim().to_string(),
            description: self.description,
            cost_per_occurrence: self.cost_per_occurrence,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BadHabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cost_per_occurrence: Option<Decimal>,
}

impl BadHabitPatch {
    pub fn apply(self, h: &mut BadHabit) {
        if let Some(title) = self.title {
            h.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            h.description = Some(description);
        }
        if let Some(cost) = self.cost_per_occurrence {
            h.cost_per_occurrence = cost;
        }
    }
}

/// One day's record for a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitTracking {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub avoided: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the habit statistics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStatistic {
    pub date: NaiveDate,
    pub avoided: bool,
    pub savings: Decimal,
}
