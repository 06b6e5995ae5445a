use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::row;
use crate::database::models::Investment;

fn map_row(r: &SqliteRow) -> Result<Investment, sqlx::Error> {
    use sqlx::Row;

    Ok(Investment {
        id: row::uuid(r, "id")?,
        user_id: row::uuid(r, "user_id")?,
        name: r.try_get("name")?,
        amount: row::decimal(r, "amount")?,
        kind: row::parsed(r, "type")?,
        description: r.try_get("description")?,
        created_at: row::timestamp(r, "created_at")?,
        updated_at: row::timestamp(r, "updated_at")?,
    })
}

pub async fn list_by_user(pool: &Pool<Sqlite>, user_id: Uuid) -> Result<Vec<Investment>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, name, amount, type, description, created_at, updated_at
        FROM investments
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?
    .iter()
    .map(map_row)
    .collect()
}

pub async fn get(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<Option<Investment>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, name, amount, type, description, created_at, updated_at
        FROM investments
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

pub async fn insert(pool: &Pool<Sqlite>, i: &Investment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO investments (id, user_id, name, amount, type, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(i.id.to_string())
    .bind(i.user_id.to_string())
    .bind(&i.name)
    .bind(i.amount.to_string())
    .bind(i.kind.as_str())
    .bind(i.description.as_deref())
    .bind(row::ts(&i.created_at))
    .bind(row::ts(&i.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update(pool: &Pool<Sqlite>, i: &Investment) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE investments
        SET name = ?, amount = ?, type = ?, description = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&i.name)
    .bind(i.amount.to_string())
    .bind(i.kind.as_str())
    .bind(i.description.as_deref())
    .bind(row::ts(&i.updated_at))
    .bind(i.id.to_string())
    .bind(i.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM investments WHERE id = ? AND user_id = ?")
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
