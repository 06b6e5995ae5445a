use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::row;
use crate::database::models::SavingsGoal;

fn map_row(r: &SqliteRow) -> Result<SavingsGoal, sqlx::Error> {
    use sqlx::Row;

    Ok(SavingsGoal {
        id: row::uuid(r, "id")?,
        user_id: row::uuid(r, "user_id")?,
        name: r.try_get("name")?,
        target_amount: row::decimal(r, "target_amount")?,
        current_amount: row::decimal(r, "current_amount")?,
        deadline: row::opt_date(r, "deadline")?,
        description: r.try_get("description")?,
        created_at: row::timestamp(r, "created_at")?,
        updated_at: row::timestamp(r, "updated_at")?,
    })
}

pub async fn list_by_user(pool: &Pool<Sqlite>, user_id: Uuid) -> Result<Vec<SavingsGoal>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, name, target_amount, current_amount, deadline, description, created_at, updated_at
        FROM savings_goals
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

pub async fn get(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<Option<SavingsGoal>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, name, target_amount, current_amount, deadline, description, created_at, updated_at
        FROM savings_goals
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

pub async fn insert(pool: &Pool<Sqlite>, g: &SavingsGoal) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO savings_goals
        (id, user_id, name, target_amount, current_amount, deadline, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(g.id.to_string())
    .bind(g.user_id.to_string())
    .bind(&g.name)
    .bind(g.target_amount.to_string())
    .bind(g.current_amount.to_string())
    .bind(g.deadline.as_ref().map(row::day))
    .bind(g.description.as_deref())
    .bind(row::ts(&g.created_at))
    .bind(row::ts(&g.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update(pool: &Pool<Sqlite>, g: &SavingsGoal) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE savings_goals
        SET name = ?, target_amount = ?, current_amount = ?, deadline = ?, description = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&g.name)
    .bind(g.target_amount.to_string())
    .bind(g.current_amount.to_string())
    .bind(g.deadline.as_ref().map(row::day))
    .bind(g.description.as_deref())
    .bind(row::ts(&g.updated_at))
    .bind(g.id.to_string())
    .bind(g.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM savings_goals WHERE id = ? AND user_id = ?")
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
