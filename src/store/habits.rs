use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{check_range, validate, Store};
use crate::database::db::queries::habits;
use crate::database::models::{BadHabit, BadHabitPatch, HabitStatistic, HabitTracking, NewBadHabit};
use crate::error::{AppError, AppResult};
use crate::finance::habits as calc;
use crate::realtime::{ChangeKind, Table};

impl Store {
    pub async fn list_habits(&self, user_id: Uuid) -> AppResult<Vec<BadHabit>> {
        Ok(habits::list_by_user(&self.pool, user_id).await?)
    }

    async fn owned_habit(&self, user_id: Uuid, id: Uuid) -> AppResult<BadHabit> {
        habits::get(&self.pool, user_id, id)
            .await?
            .ok_or(AppError::NotFound("bad habit"))
    }

    pub async fn add_habit(&self, user_id: Uuid, new: NewBadHabit) -> AppResult<BadHabit> {
        let row = new.into_row(user_id, Utc::now());
        validate::bad_habit(&row)?;

        habits::insert(&self.pool, &row).await?;
        self.publish(Table::BadHabits, ChangeKind::Insert, user_id, row.id);
        Ok(row)
    }

    pub async fn update_habit(&self, user_id: Uuid, id: Uuid, patch: BadHabitPatch) -> AppResult<BadHabit> {
        let mut row = self.owned_habit(user_id, id).await?;
        patch.apply(&mut row);
        row.updated_at = Utc::now();
        validate::bad_habit(&row)?;

        if !habits::update(&self.pool, &row).await? {
            return Err(AppError::NotFound("bad habit"));
        }
        self.publish(Table::BadHabits, ChangeKind::Update, user_id, id);
        Ok(row)
    }

    /// Removes the habit and its whole tracking history.
    pub async fn delete_habit(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if !habits::delete(&self.pool, user_id, id).await? {
            return Err(AppError::NotFound("bad habit"));
        }
        self.publish(Table::BadHabits, ChangeKind::Delete, user_id, id);
        Ok(())
    }

    /// Records whether the habit was avoided on `date`. Tracking a day twice
    /// overwrites the first answer.
    pub async fn track_habit(
        &self,
        user_id: Uuid,
        habit_id: Uuid,
        date: NaiveDate,
        avoided: bool,
    ) -> AppResult<HabitTracking> {
        self.owned_habit(user_id, habit_id).await?;

        let now = Utc::now();
        let candidate = HabitTracking {
            id: Uuid::new_v4(),
            habit_id,
            date,
            avoided,
            created_at: now,
            updated_at: now,
        };
        let stored = habits::upsert_tracking(&self.pool, &candidate).await?;

        let kind = if stored.id == candidate.id {
            ChangeKind::Insert
        } else {
            ChangeKind::Update
        };
        self.publish(Table::HabitTracking, kind, user_id, stored.id);
        Ok(stored)
    }

    pub async fn habit_tracking(&self, user_id: Uuid, habit_id: Uuid) -> AppResult<Vec<HabitTracking>> {
        self.owned_habit(user_id, habit_id).await?;
        Ok(habits::list_tracking(&self.pool, habit_id, None).await?)
    }

    pub async fn habit_streak(&self, user_id: Uuid, habit_id: Uuid, today: NaiveDate) -> AppResult<u32> {
        let entries = self.habit_tracking(user_id, habit_id).await?;
        Ok(calc::streak(&entries, today))
    }

    pub async fn habit_statistics(
        &self,
        user_id: Uuid,
        habit_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<HabitStatistic>> {
        check_range(start, end)?;
        let habit = self.owned_habit(user_id, habit_id).await?;
        let entries = habits::list_tracking(&self.pool, habit_id, Some((start, end))).await?;
        Ok(calc::statistics(&habit, &entries, start, end))
    }

    pub async fn habit_savings(
        &self,
        user_id: Uuid,
        habit_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Decimal> {
        check_range(start, end)?;
        let habit = self.owned_habit(user_id, habit_id).await?;
        let entries = habits::list_tracking(&self.pool, habit_id, Some((start, end))).await?;
        Ok(calc::savings(&habit, &entries, start, end))
    }

    /// Savings across every habit the user tracks.
    pub async fn total_habit_savings(&self, user_id: Uuid, start: NaiveDate, end: NaiveDate) -> AppResult<Decimal> {
        check_range(start, end)?;
        let mut total = Decimal::ZERO;
        for habit in self.list_habits(user_id).await? {
            let entries = habits::list_tracking(&self.pool, habit.id, Some((start, end))).await?;
            total = total.saturating_add(calc::savings(&habit, &entries, start, end));
        }
        Ok(total)
    }
}
