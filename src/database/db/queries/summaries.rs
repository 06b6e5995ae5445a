use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::row;
use crate::database::models::FinancialSummary;

fn map_row(r: &SqliteRow) -> Result<FinancialSummary, sqlx::Error> {
    Ok(FinancialSummary {
        id: row::uuid(r, "id")?,
        user_id: row::uuid(r, "user_id")?,
        current_balance: row::decimal(r, "current_balance")?,
        monthly_income: row::decimal(r, "monthly_income")?,
        total_investments: row::decimal(r, "total_investments")?,
        total_expenses: row::decimal(r, "total_expenses")?,
        created_at: row::timestamp(r, "created_at")?,
        updated_at: row::timestamp(r, "updated_at")?,
    })
}

pub async fn get_by_user(pool: &Pool<Sqlite>, user_id: Uuid) -> Result<Option<FinancialSummary>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, current_balance, monthly_income, total_investments, total_expenses,
               created_at, updated_at
        FROM financial_summaries
        WHERE user_id = ?
        "#,
    )
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?
    .as_ref()
    .map(map_row)
    .transpose()
}

/// Inserts the summary unless the user already has one. Returns whether a
/// row was written.
pub async fn insert<'e, E>(executor: E, s: &FinancialSummary) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO financial_summaries
        (id, user_id, current_balance, monthly_income, total_investments, total_expenses, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(s.id.to_string())
    .bind(s.user_id.to_string())
    .bind(s.current_balance.to_string())
    .bind(s.monthly_income.to_string())
    .bind(s.total_investments.to_string())
    .bind(s.total_expenses.to_string())
    .bind(row::ts(&s.created_at))
    .bind(row::ts(&s.updated_at))
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Writes the derived totals. The user-maintained columns are left alone.
pub async fn set_totals(pool: &Pool<Sqlite>, s: &FinancialSummary) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE financial_summaries
        SET total_investments = ?, total_expenses = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(s.total_investments.to_string())
    .bind(s.total_expenses.to_string())
    .bind(row::ts(&s.updated_at))
    .bind(s.id.to_string())
    .bind(s.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Writes the balance and income the user maintains. The totals are left alone.
pub async fn set_user_fields(pool: &Pool<Sqlite>, s: &FinancialSummary) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE financial_summaries
        SET current_balance = ?, monthly_income = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(s.current_balance.to_string())
    .bind(s.monthly_income.to_string())
    .bind(row::ts(&s.updated_at))
    .bind(s.id.to_string())
    .bind(s.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
