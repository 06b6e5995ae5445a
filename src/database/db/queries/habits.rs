use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::row;
use crate::database::models::{BadHabit, HabitTracking};

/* ==========Bad Habit Queries=========== */

fn map_habit(r: &SqliteRow) -> Result<BadHabit, sqlx::Error> {
    use sqlx::Row;

    Ok(BadHabit {
        id: row::uuid(r, "id")?,
        user_id: row::uuid(r, "user_id")?,
        title: r.try_get("title")?,
        description: r.try_get("description")?,
        cost_per_occurrence: row::decimal(r, "cost_per_occurrence")?,
        created_at: row::timestamp(r, "created_at")?,
        updated_at: row::timestamp(r, "updated_at")?,
    })
}

pub async fn list_by_user(pool: &Pool<Sqlite>, user_id: Uuid) -> Result<Vec<BadHabit>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, title, description, cost_per_occurrence, created_at, updated_at
        FROM bad_habits
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?
    .iter()
    .map(map_habit)
    .collect()
}

pub async fn get(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<Option<BadHabit>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, user_id, title, description, cost_per_occurrence, created_at, updated_at
        FROM bad_habits
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id.to_string())
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?
    .as_ref()
    .map(map_habit)
    .transpose()
}

pub async fn insert(pool: &Pool<Sqlite>, h: &BadHabit) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO bad_habits (id, user_id, title, description, cost_per_occurrence, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(h.id.to_string())
    .bind(h.user_id.to_string())
    .bind(&h.title)
    .bind(h.description.as_deref())
    .bind(h.cost_per_occurrence.to_string())
    .bind(row::ts(&h.created_at))
    .bind(row::ts(&h.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update(pool: &Pool<Sqlite>, h: &BadHabit) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE bad_habits
        SET title = ?, description = ?, cost_per_occurrence = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&h.title)
    .bind(h.description.as_deref())
    .bind(h.cost_per_occurrence.to_string())
    .bind(row::ts(&h.updated_at))
    .bind(h.id.to_string())
    .bind(h.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes the habit together with its tracking history.
pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let habit_result = sqlx::query("DELETE FROM bad_habits WHERE id = ? AND user_id = ?")
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

    if habit_result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM habit_tracking WHERE habit_id = ?")
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(true)
}

/* ==========Habit Tracking Queries=========== */

fn map_tracking(r: &SqliteRow) -> Result<HabitTracking, sqlx::Error> {
    use sqlx::Row;

    Ok(HabitTracking {
        id: row::uuid(r, "id")?,
        habit_id: row::uuid(r, "habit_id")?,
        date: row::date(r, "date")?,
        avoided: r.try_get("avoided")?,
        created_at: row::timestamp(r, "created_at")?,
        updated_at: row::timestamp(r, "updated_at")?,
    })
}

/// Records a day for a habit. A second record for the same day overwrites
/// `avoided` and keeps the original id.
pub async fn upsert_tracking(pool: &Pool<Sqlite>, t: &HabitTracking) -> Result<HabitTracking, sqlx::Error> {
    let r = sqlx::query(
        r#"
        INSERT INTO habit_tracking (id, habit_id, date, avoided, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(habit_id, date) DO UPDATE
            SET avoided = excluded.avoided, updated_at = excluded.updated_at
        RETURNING id, habit_id, date, avoided, created_at, updated_at
        "#,
    )
    .bind(t.id.to_string())
    .bind(t.habit_id.to_string())
    .bind(row::day(&t.date))
    .bind(t.avoided)
    .bind(row::ts(&t.created_at))
    .bind(row::ts(&t.updated_at))
    .fetch_one(pool)
    .await?;

    map_tracking(&r)
}

/// Tracking entries for a habit, oldest first. `range` bounds are inclusive.
pub async fn list_tracking(
    pool: &Pool<Sqlite>,
    habit_id: Uuid,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<HabitTracking>, sqlx::Error> {
    let (start, end) = match range {
        Some((start, end)) => (Some(row::day(&start)), Some(row::day(&end))),
        None => (None, None),
    };

    sqlx::query(
        r#"
        SELECT id, habit_id, date, avoided, created_at, updated_at
        FROM habit_tracking
        WHERE habit_id = ?
          AND (? IS NULL OR date >= ?)
          AND (? IS NULL OR date <= ?)
        ORDER BY date ASC
        "#,
    )
    .bind(habit_id.to_string())
    .bind(start.clone())
    .bind(start)
    .bind(end.clone())
    .bind(end)
    .fetch_all(pool)
    .await?
    .iter()
    .map(map_tracking)
    .collect()
}
