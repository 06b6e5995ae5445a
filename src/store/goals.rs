use chrono::Utc;
use uuid::Uuid;

use super::{validate, Store};
use crate::database::db::queries::savings_goals;
use crate::database::models::{NewSavingsGoal, SavingsGoal, SavingsGoalPatch};
use crate::error::{AppError, AppResult};
use crate::realtime::{ChangeKind, Table};

impl Store {
    pub async fn list_goals(&self, user_id: Uuid) -> AppResult<Vec<SavingsGoal>> {
        Ok(savings_goals::list_by_user(&self.pool, user_id).await?)
    }

    pub async fn add_goal(&self, user_id: Uuid, new: NewSavingsGoal) -> AppResult<SavingsGoal> {
        let row = new.into_row(user_id, Utc::now());
        validate::savings_goal(&row)?;

        savings_goals::insert(&self.pool, &row).await?;
        self.publish(Table::SavingsGoals, ChangeKind::Insert, user_id, row.id);
        Ok(row)
    }

    pub async fn update_goal(&self, user_id: Uuid, id: Uuid, patch: SavingsGoalPatch) -> AppResult<SavingsGoal> {
        let mut row = savings_goals::get(&self.pool, user_id, id)
            .await?
            .ok_or(AppError::NotFound("savings goal"))?;
        patch.apply(&mut row);
        row.updated_at = Utc::now();
        validate::savings_goal(&row)?;

        if !savings_goals::update(&self.pool, &row).await? {
            return Err(AppError::NotFound("savings goal"));
        }
        self.publish(Table::SavingsGoals, ChangeKind::Update, user_id, id);
        Ok(row)
    }

    pub async fn delete_goal(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if !savings_goals::delete(&self.pool, user_id, id).await? {
            return Err(AppError::NotFound("savings goal"));
        }
        self.publish(Table::SavingsGoals, ChangeKind::Delete, user_id, id);
        Ok(())
    }
}
