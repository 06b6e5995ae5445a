use chrono::Utc;
use uuid::Uuid;

use super::{validate, Store};
use crate::database::db::queries::transactions;
use crate::database::models::{NewTransaction, Transaction, TransactionPatch};
use crate::error::{AppError, AppResult};
use crate::realtime::{ChangeKind, Table};

impl Store {
    /// Newest first: by date, then by creation time.
    pub async fn list_transactions(&self, user_id: Uuid) -> AppResult<Vec<Transaction>> {
        Ok(transactions::list_by_user(&self.pool, user_id).await?)
    }

    pub async fn add_transaction(&self, user_id: Uuid, new: NewTransaction) -> AppResult<Transaction> {
        let row = new.into_row(user_id, Utc::now());
        validate::transaction(&row)?;

        transactions::insert(&self.pool, &row).await?;
        self.publish(Table::Transactions, ChangeKind::Insert, user_id, row.id);
        self.refresh_summary(user_id).await?;
        Ok(row)
    }

    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: TransactionPatch,
    ) -> AppResult<Transaction> {
        let mut row = transactions::get(&self.pool, user_id, id)
            .await?
            .ok_or(AppError::NotFound("transaction"))?;
        patch.apply(&mut row);
        row.updated_at = Utc::now();
        validate::transaction(&row)?;

        if !transactions::update(&self.pool, &row).await? {
            return Err(AppError::NotFound("transaction"));
        }
        self.publish(Table::Transactions, ChangeKind::Update, user_id, id);
        self.refresh_summary(user_id).await?;
        Ok(row)
    }

    pub async fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if !transactions::delete(&self.pool, user_id, id).await? {
            return Err(AppError::NotFound("transaction"));
        }
        self.publish(Table::Transactions, ChangeKind::Delete, user_id, id);
        self.refresh_summary(user_id).await?;
        Ok(())
    }
}
