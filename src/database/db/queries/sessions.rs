use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::row;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub async fn insert(pool: &Pool<Sqlite>, s: &SessionRow) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(s.id.to_string())
        .bind(s.user_id.to_string())
        .bind(row::ts(&s.created_at))
        .bind(row::ts(&s.expires_at))
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get(pool: &Pool<Sqlite>, id: Uuid) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query("SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .map(|r| {
            Ok::<_, sqlx::Error>(SessionRow {
                id: row::uuid(&r, "id")?,
                user_id: row::uuid(&r, "user_id")?,
                created_at: row::timestamp(&r, "created_at")?,
                expires_at: row::timestamp(&r, "expires_at")?,
            })
        })
        .transpose()
}

pub async fn delete(pool: &Pool<Sqlite>, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_expired(pool: &Pool<Sqlite>, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(row::ts(&now))
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
