use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::database::db::row;
use crate::database::models::User;

/// Stored password material for a user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub salt: String,
    pub hash: String,
}

fn map_row(r: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row::uuid(r, "id")?,
        email: r.try_get("email")?,
        full_name: r.try_get("full_name")?,
        currency: r.try_get("currency")?,
        created_at: row::timestamp(r, "created_at")?,
        updated_at: row::timestamp(r, "updated_at")?,
    })
}

pub async fn insert<'e, E>(executor: E, user: &User, credentials: &Credentials) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO users (id, email, full_name, currency, password_salt, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(user.full_name.as_deref())
    .bind(user.currency.as_deref())
    .bind(&credentials.salt)
    .bind(&credentials.hash)
    .bind(row::ts(&user.created_at))
    .bind(row::ts(&user.updated_at))
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn get_by_id(pool: &Pool<Sqlite>, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, full_name, currency, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?
    .as_ref()
    .map(map_row)
    .transpose()
}

pub async fn get_with_credentials(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<(User, Credentials)>, sqlx::Error> {
    let found = sqlx::query(
        r#"
        SELECT id, email, full_name, currency, password_salt, password_hash, created_at, updated_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    match found {
        Some(r) => {
            let credentials = Credentials {
                salt: r.try_get("password_salt")?,
                hash: r.try_get("password_hash")?,
            };
            Ok(Some((map_row(&r)?, credentials)))
        }
        None => Ok(None),
    }
}

pub async fn update_profile(pool: &Pool<Sqlite>, user: &User) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET full_name = ?, currency = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(user.full_name.as_deref())
    .bind(user.currency.as_deref())
    .bind(row::ts(&user.updated_at))
    .bind(user.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
