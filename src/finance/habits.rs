//! Streaks and savings for bad habits.
//!
//! Each tracking entry records whether the habit was avoided on one day.
//! Avoiding it saves `cost_per_occurrence`.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::database::models::{BadHabit, HabitStatistic, HabitTracking};

/// Consecutive avoided days ending today, or ending yesterday while today is
/// still untracked.
pub fn streak(entries: &[HabitTracking], today: NaiveDate) -> u32 {
    let days: HashMap<NaiveDate, bool> = entries.iter().map(|e| (e.date, e.avoided)).collect();

    let mut day = if days.contains_key(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut count = 0;
    while let Some(d) = day {
        if days.get(&d) != Some(&true) {
            break;
        }
        count += 1;
        day = d.pred_opt();
    }
    count
}

fn in_range(entries: &[HabitTracking], start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &HabitTracking> {
    entries.iter().filter(move |e| e.date >= start && e.date <= end)
}

pub fn statistics(
    habit: &BadHabit,
    entries: &[HabitTracking],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<HabitStatistic> {
    let mut stats: Vec<HabitStatistic> = in_range(entries, start, end)
        .map(|e| HabitStatistic {
            date: e.date,
            avoided: e.avoided,
            savings: if e.avoided {
                habit.cost_per_occurrence
            } else {
                Decimal::ZERO
            },
        })
        .collect();
    stats.sort_by_key(|s| s.date);
    stats
}

pub fn savings(habit: &BadHabit, entries: &[HabitTracking], start: NaiveDate, end: NaiveDate) -> Decimal {
    let avoided = in_range(entries, start, end).filter(|e| e.avoided).count();
    habit.cost_per_occurrence.saturating_mul(Decimal::from(avoided))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::fixtures::{d, date};
    use chrono::Utc;
    use uuid::Uuid;

    fn habit(cost: &str) -> BadHabit {
        let now = Utc::now();
        BadHabit {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: "Takeaway coffee".into(),
            description: None,
            cost_per_occurrence: d(cost),
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(on: NaiveDate, avoided: bool) -> HabitTracking {
        let now = Utc::now();
        HabitTracking {
            id: Uuid::new_v4(),
            habit_id: Uuid::nil(),
            date: on,
            avoided,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn streak_counts_back_from_today() {
        let entries = vec![
            entry(date(2024, 3, 10), true),
            entry(date(2024, 3, 9), true),
            entry(date(2024, 3, 8), true),
            entry(date(2024, 3, 7), false),
            entry(date(2024, 3, 6), true),
        ];
        assert_eq!(streak(&entries, date(2024, 3, 10)), 3);
    }

    #[test]
    fn streak_starts_yesterday_when_today_untracked() {
        let entries = vec![entry(date(2024, 3, 9), true), entry(date(2024, 3, 8), true)];
        assert_eq!(streak(&entries, date(2024, 3, 10)), 2);
        assert_eq!(streak(&entries, date(2024, 3, 11)), 0);
    }

    #[test]
    fn slip_today_or_gap_breaks_streak() {
        let slipped = vec![entry(date(2024, 3, 10), false), entry(date(2024, 3, 9), true)];
        assert_eq!(streak(&slipped, date(2024, 3, 10)), 0);

        let gap = vec![entry(date(2024, 3, 10), true), entry(date(2024, 3, 8), true)];
        assert_eq!(streak(&gap, date(2024, 3, 10)), 1);

        assert_eq!(streak(&[], date(2024, 3, 10)), 0);
    }

    #[test]
    fn statistics_and_savings_in_range() {
        let h = habit("4.50");
        let entries = vec![
            entry(date(2024, 3, 3), true),
            entry(date(2024, 3, 1), true),
            entry(date(2024, 3, 2), false),
            entry(date(2024, 2, 28), true),
        ];

        let stats = statistics(&h, &entries, date(2024, 3, 1), date(2024, 3, 31));
        let dates: Vec<NaiveDate> = stats.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]);
        assert_eq!(stats[0].savings, d("4.50"));
        assert_eq!(stats[1].savings, Decimal::ZERO);

        assert_eq!(savings(&h, &entries, date(2024, 3, 1), date(2024, 3, 31)), d("9.00"));
        assert_eq!(savings(&h, &entries, date(2024, 1, 1), date(2024, 12, 31)), d("13.50"));
    }
}
