use chrono::Utc;
use uuid::Uuid;

use super::{validate, Store};
use crate::database::db::queries::investments;
use crate::database::models::{Investment, InvestmentPatch, NewInvestment};
use crate::error::{AppError, AppResult};
use crate::realtime::{ChangeKind, Table};

impl Store {
    pub async fn list_investments(&self, user_id: Uuid) -> AppResult<Vec<Investment>> {
        Ok(investments::list_by_user(&self.pool, user_id).await?)
    }

    pub async fn add_investment(&self, user_id: Uuid, new: NewInvestment) -> AppResult<Investment> {
        let row = new.into_row(user_id, Utc::now());
        validate::investment(&row)?;

        investments::insert(&self.pool, &row).await?;
        self.publish(Table::Investments, ChangeKind::Insert, user_id, row.id);
        self.refresh_summary(user_id).await?;
        Ok(row)
    }

    pub async fn update_investment(&self, user_id: Uuid, id: Uuid, patch: InvestmentPatch) -> AppResult<Investment> {
        let mut row = investments::get(&self.pool, user_id, id)
            .await?
            .ok_or(AppError::NotFound("investment"))?;
        patch.apply(&mut row);
        row.updated_at = Utc::now();
        validate::investment(&row)?;

        if !investments::update(&self.pool, &row).await? {
            return Err(AppError::NotFound("investment"));
        }
        self.publish(Table::Investments, ChangeKind::Update, user_id, id);
        self.refresh_summary(user_id).await?;
        Ok(row)
    }

    pub async fn delete_investment(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if !investments::delete(&self.pool, user_id, id).await? {
            return Err(AppError::NotFound("investment"));
        }
        self.publish(Table::Investments, ChangeKind::Delete, user_id, id);
        self.refresh_summary(user_id).await?;
        Ok(())
    }
}
