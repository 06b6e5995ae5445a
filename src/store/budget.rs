use chrono::Utc;
use uuid::Uuid;

use super::{validate, Store};
use crate::database::db::queries::budget_categories;
use crate::database::models::{BudgetCategory, BudgetCategoryPatch, NewBudgetCategory};
use crate::error::{AppError, AppResult};
use crate::realtime::{ChangeKind, Table};

fn duplicate_name(err: AppError, name: &str) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::Conflict(format!("budget category {name:?} already exists")),
        other => other,
    }
}

impl Store {
    /// Alphabetical by name.
    pub async fn list_budget_categories(&self, user_id: Uuid) -> AppResult<Vec<BudgetCategory>> {
        Ok(budget_categories::list_by_user(&self.pool, user_id).await?)
    }

    pub async fn add_budget_category(&self, user_id: Uuid, new: NewBudgetCategory) -> AppResult<BudgetCategory> {
        let row = new.into_row(user_id, Utc::now());
        validate::budget_category(&row)?;

        budget_categories::insert(&self.pool, &row)
            .await
            .map_err(|e| duplicate_name(e.into(), &row.name))?;
        self.publish(Table::BudgetCategories, ChangeKind::Insert, user_id, row.id);
        Ok(row)
    }

    pub async fn update_budget_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: BudgetCategoryPatch,
    ) -> AppResult<BudgetCategory> {
        let mut row = budget_categories::get(&self.pool, user_id, id)
            .await?
            .ok_or(AppError::NotFound("budget category"))?;
        patch.apply(&mut row);
        validate::budget_category(&row)?;

        let updated = budget_categories::update(&self.pool, &row)
            .await
            .map_err(|e| duplicate_name(e.into(), &row.name))?;
        if !updated {
            return Err(AppError::NotFound("budget category"));
        }
        self.publish(Table::BudgetCategories, ChangeKind::Update, user_id, id);
        Ok(row)
    }

    pub async fn delete_budget_category(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if !budget_categories::delete(&self.pool, user_id, id).await? {
            return Err(AppError::NotFound("budget category"));
        }
        self.publish(Table::BudgetCategories, ChangeKind::Delete, user_id, id);
        Ok(())
    }
}
