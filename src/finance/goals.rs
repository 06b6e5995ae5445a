use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::percentage;
use crate::database::models::SavingsGoal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: Uuid,
    pub name: String,
    pub current: Decimal,
    pub target: Decimal,
    pub percentage: u8,
    pub remaining: Decimal,
    pub achieved: bool,
    /// Days until the deadline; negative once it has passed.
    pub days_left: Option<i64>,
}

pub fn progress(goal: &SavingsGoal, today: NaiveDate) -> GoalProgress {
    GoalProgress {
        goal_id: goal.id,
        name: goal.name.clone(),
        current: goal.current_amount,
        target: goal.target_amount,
        percentage: percentage(goal.current_amount, goal.target_amount),
        remaining: goal.target_amount.saturating_sub(goal.current_amount).max(Decimal::ZERO),
        achieved: goal.target_amount > Decimal::ZERO && goal.current_amount >= goal.target_amount,
        days_left: goal.deadline.map(|d| (d - today).num_days()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::fixtures::{d, date};
    use chrono::Utc;

    fn goal(current: &str, target: &str, deadline: Option<NaiveDate>) -> SavingsGoal {
        let now = Utc::now();
        SavingsGoal {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: "Emergency fund".into(),
            target_amount: d(target),
            current_amount: d(current),
            deadline,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn partial_progress() {
        let p = progress(&goal("2500", "10000", Some(date(2024, 12, 31))), date(2024, 12, 1));
        assert_eq!(p.percentage, 25);
        assert_eq!(p.remaining, d("7500"));
        assert!(!p.achieved);
        assert_eq!(p.days_left, Some(30));
    }

    #[test]
    fn achieved_and_overdue() {
        let p = progress(&goal("1200", "1000", Some(date(2024, 1, 1))), date(2024, 1, 11));
        assert_eq!(p.percentage, 100);
        assert_eq!(p.remaining, Decimal::ZERO);
        assert!(p.achieved);
        assert_eq!(p.days_left, Some(-10));
    }

    #[test]
    fn no_deadline() {
        let p = progress(&goal("0", "500", None), date(2024, 1, 1));
        assert_eq!(p.percentage, 0);
        assert_eq!(p.days_left, None);
    }
}
