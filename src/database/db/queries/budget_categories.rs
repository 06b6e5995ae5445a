use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::row;
use crate::database::models::BudgetCategory;

fn map_row(r: &SqliteRow) -> Result<BudgetCategory, sqlx::Error> {
    use sqlx::Row;

    Ok(BudgetCategory {
        id: row::uuid(r, "id")?,
        user_id: row::uuid(r, "user_id")?,
        name: r.try_get("name")?,
        monthly_limit: row::decimal(r, "monthly_limit")?,
        created_at: row::timestamp(r, "created_at")?,
    })
}

pub async fn list_by_user(pool: &Pool<Sqlite>, user_id: Uuid) -> Result<Vec<BudgetCategory>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, name, monthly_limit, created_at
        FROM budget_categories
        WHERE user_id = ?
        ORDER BY name ASC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?
    .iter()
    .map(map_row)
    .collect()
}

pub async fn get(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<Option<BudgetCategory>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, name, monthly_limit, created_at
        FROM budget_categories
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

pub async fn insert(pool: &Pool<Sqlite>, c: &BudgetCategory) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO budget_categories (id, user_id, name, monthly_limit, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(c.id.to_string())
    .bind(c.user_id.to_string())
    .bind(&c.name)
    .bind(c.monthly_limit.to_string())
    .bind(row::ts(&c.created_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update(pool: &Pool<Sqlite>, c: &BudgetCategory) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE budget_categories
        SET name = ?, monthly_limit = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&c.name)
    .bind(c.monthly_limit.to_string())
    .bind(c.id.to_string())
    .bind(c.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM budget_categories WHERE id = ? AND user_id = ?")
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
