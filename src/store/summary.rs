use chrono::Utc;
use uuid::Uuid;

use super::{validate, Store};
use crate::database::db::queries::{investments, summaries, transactions};
use crate::database::models::{FinancialSummary, SummaryPatch};
use crate::error::{AppError, AppResult};
use crate::finance::{total, Month};
use crate::realtime::{ChangeKind, Table};

impl Store {
    /// The user's summary, created zeroed on first access.
    pub async fn summary(&self, user_id: Uuid) -> AppResult<FinancialSummary> {
        if let Some(summary) = summaries::get_by_user(&self.pool, user_id).await? {
            return Ok(summary);
        }

        let fresh = FinancialSummary::zeroed(user_id, Utc::now());
        if summaries::insert(&self.pool, &fresh).await? {
            self.publish(Table::FinancialSummaries, ChangeKind::Insert, user_id, fresh.id);
        }
        // Another writer may have created it first.
        summaries::get_by_user(&self.pool, user_id)
            .await?
            .ok_or(AppError::NotFound("financial summary"))
    }

    /// Sets the user-maintained fields. The derived totals are untouched.
    pub async fn update_summary(&self, user_id: Uuid, patch: SummaryPatch) -> AppResult<FinancialSummary> {
        let mut summary = self.summary(user_id).await?;
        patch.apply(&mut summary);
        summary.updated_at = Utc::now();
        validate::summary(&summary)?;

        if !summaries::set_user_fields(&self.pool, &summary).await? {
            return Err(AppError::NotFound("financial summary"));
        }
        self.summary_written(summary).await
    }

    /// Recomputes `total_investments` from every holding and `total_expenses`
    /// from the expenses dated in the current month.
    pub async fn refresh_summary(&self, user_id: Uuid) -> AppResult<FinancialSummary> {
        let mut summary = self.summary(user_id).await?;

        let month = Month::current();
        let holdings = investments::list_by_user(&self.pool, user_id).await?;
        let total_investments = total(holdings.iter().map(|i| i.amount));
        let this_month =
            transactions::list_between(&self.pool, user_id, month.first_day(), month.last_day()).await?;
        let total_expenses = total(this_month.iter().filter(|t| t.is_expense()).map(|t| t.amount));

        summary.total_investments = total_investments;
        summary.total_expenses = total_expenses;
        summary.updated_at = Utc::now();

        if !summaries::set_totals(&self.pool, &summary).await? {
            return Err(AppError::NotFound("financial summary"));
        }
        self.summary_written(summary).await
    }

    /// Publishes the update and returns the row as stored, so columns written
    /// concurrently by the other path are reported as they are.
    async fn summary_written(&self, written: FinancialSummary) -> AppResult<FinancialSummary> {
        self.publish(Table::FinancialSummaries, ChangeKind::Update, written.user_id, written.id);
        Ok(summaries::get_by_user(&self.pool, written.user_id)
            .await?
            .unwrap_or(written))
    }
}
