use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::row;
use crate::database::models::Transaction;

fn map_row(r: &SqliteRow) -> Result<Transaction, sqlx::Error> {
    use sqlx::Row;

    Ok(Transaction {
        id: row::uuid(r, "id")?,
        user_id: row::uuid(r, "user_id")?,
        amount: row::decimal(r, "amount")?,
        kind: row::parsed(r, "type")?,
        category: r.try_get("category")?,
        date: row::date(r, "date")?,
        description: r.try_get("description")?,
        created_at: row::timestamp(r, "created_at")?,
        updated_at: row::timestamp(r, "updated_at")?,
    })
}

// Newest first; ties on the same day fall back to insertion order.
pub async fn list_by_user(pool: &Pool<Sqlite>, user_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, amount, type, category, date, description, created_at, updated_at
        FROM transactions
        WHERE user_id = ?
        ORDER BY date DESC, created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?
    .iter()
    .map(map_row)
    .collect()
}

/// Transactions dated within `[start, end]`, both inclusive.
pub async fn list_between(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, amount, type, category, date, description, created_at, updated_at
        FROM transactions
        WHERE user_id = ? AND date BETWEEN ? AND ?
        ORDER BY date DESC, created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id.to_string())
    .bind(row::day(&start))
    .bind(row::day(&end))
    .fetch_all(pool)
    .await?
    .iter()
    .map(map_row)
    .collect()
}

pub async fn get(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, amount, type, category, date, description, created_at, updated_at
        FROM transactions
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id.to_string())
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?
    .as_ref()
    .map(map_row)
    .transpose()
}

pub async fn insert(pool: &Pool<Sqlite>, t: &Transaction) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO transactions (id, user_id, amount, type, category, date, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(t.id.to_string())
    .bind(t.user_id.to_string())
    .bind(t.amount.to_string())
    .bind(t.kind.as_str())
    .bind(&t.category)
    .bind(row::day(&t.date))
    .bind(t.description.as_deref())
    .bind(row::ts(&t.created_at))
    .bind(row::ts(&t.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update(pool: &Pool<Sqlite>, t: &Transaction) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE transactions
        SET amount = ?, type = ?, category = ?, date = ?, description = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(t.amount.to_string())
    .bind(t.kind.as_str())
    .bind(&t.category)
    .bind(row::day(&t.date))
    .bind(t.description.as_deref())
    .bind(row::ts(&t.updated_at))
    .bind(t.id.to_string())
    .bind(t.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
