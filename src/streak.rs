use crate::date_key::day_key;
use crate::models::{Habit, HabitLog};
use chrono::{DateTime, Duration, Local};
use std::collections::{BTreeMap, BTreeSet};

/// Days in the trailing consistency window, including today.
pub const STREAK_WINDOW_DAYS: i64 = 7;

/// Date keys for the trailing 7-day window ending on `today`, oldest first.
pub(crate) fn window_keys(today: DateTime<Local>) -> Vec<String> {
    (0..STREAK_WINDOW_DAYS)
        .map(|offset| day_key(today - Duration::days(STREAK_WINDOW_DAYS - 1 - offset)))
        .collect()
}

/// Per-habit consistency score over the trailing 7 days ending on `today`.
///
/// Walking the window oldest-first: a positive-minute day adds 1, a missed
/// day while the running score is positive subtracts 0.5 (never below 0),
/// and the final score is rounded to the nearest integer. The exact
/// +1 / -0.5 / round-at-the-end arithmetic is the documented contract.
pub fn weekly_streaks(
    habits: &[Habit],
    logs: &[HabitLog],
    today: DateTime<Local>,
) -> BTreeMap<String, u8> {
    if habits.is_empty() {
        return BTreeMap::new();
    }

    let days = window_keys(today);

    let mut active: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for log in logs {
        if log.minutes > 0 {
            active.entry(log.habit_id.as_str()).or_default().insert(log.date.as_str());
        }
    }

    let mut streaks = BTreeMap::new();
    for habit in habits {
        let logged_days = active.get(habit.id.as_str());
        let mut score = 0.0_f64;
        for day in &days {
            let logged = logged_days.is_some_and(|set| set.contains(day.as_str()));
            if logged {
                score += 1.0;
            } else if score > 0.0 {
                score = (score - 0.5).max(0.0);
            }
        }
        streaks.insert(habit.id.clone(), score.round().max(0.0) as u8);
    }
    streaks
}

#[cfg(test)]
mod tests {
    use super::{weekly_streaks, window_keys};
    use crate::models::{Habit, HabitLog};
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};

    fn habit(id: &str) -> Habit {
        Habit {
            id: id.to_string(),
            name: id.to_string(),
            importance: 3,
            target_minutes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 1, 7, 12, 0, 0)
            .single()
            .expect("valid local instant")
    }

    fn logs_for_pattern(habit_id: &str, pattern: [u32; 7]) -> Vec<HabitLog> {
        let days = window_keys(today());
        pattern
            .iter()
            .zip(days)
            .filter(|(minutes, _)| **minutes > 0)
            .map(|(minutes, date)| HabitLog {
                habit_id: habit_id.to_string(),
                date,
                minutes: *minutes,
            })
            .collect()
    }

    #[test]
    fn window_runs_oldest_to_today() {
        let days = window_keys(today());
        assert_eq!(days.first().map(String::as_str), Some("2024-01-01"));
        assert_eq!(days.last().map(String::as_str), Some("2024-01-07"));
        assert_eq!(days.len(), 7);
    }

    #[test]
    fn empty_inputs_yield_empty_mapping() {
        assert!(weekly_streaks(&[], &[], today()).is_empty());
    }

    #[test]
    fn perfect_week_scores_seven() {
        let habits = vec![habit("h1")];
        let logs = logs_for_pattern("h1", [10, 10, 10, 10, 10, 10, 10]);
        assert_eq!(weekly_streaks(&habits, &logs, today())["h1"], 7);
    }

    #[test]
    fn no_activity_scores_zero() {
        let habits = vec![habit("h1")];
        assert_eq!(weekly_streaks(&habits, &[], today())["h1"], 0);
    }

    #[test]
    fn single_missed_day_decays_by_half() {
        // 1, 2, 1.5, 2.5, 3.5, 4.5, 5.5 → rounds to 6
        let habits = vec![habit("h1")];
        let logs = logs_for_pattern("h1", [10, 10, 0, 10, 10, 10, 10]);
        assert_eq!(weekly_streaks(&habits, &logs, today())["h1"], 6);
    }

    #[test]
    fn sparse_activity_scores_below_consecutive_activity() {
        let habits = vec![habit("h1"), habit("h2")];
        let mut logs = logs_for_pattern("h1", [10, 0, 10, 0, 10, 0, 10]);
        logs.extend(logs_for_pattern("h2", [0, 0, 0, 10, 10, 10, 10]));
        let streaks = weekly_streaks(&habits, &logs, today());
        assert!(streaks["h2"] > streaks["h1"]);
    }

    #[test]
    fn leading_misses_leave_score_at_zero() {
        let habits = vec![habit("h1")];
        let logs = logs_for_pattern("h1", [0, 0, 0, 0, 0, 0, 10]);
        assert_eq!(weekly_streaks(&habits, &logs, today())["h1"], 1);
    }

    #[test]
    fn zero_minute_logs_do_not_count_as_activity() {
        let habits = vec![habit("h1")];
        let days = window_keys(today());
        let logs = vec![HabitLog {
            habit_id: "h1".to_string(),
            date: days[6].clone(),
            minutes: 0,
        }];
        assert_eq!(weekly_streaks(&habits, &logs, today())["h1"], 0);
    }

    #[test]
    fn logs_outside_the_window_are_ignored() {
        let habits = vec![habit("h1")];
        let stale = today() - Duration::days(30);
        let logs = vec![HabitLog {
            habit_id: "h1".to_string(),
            date: crate::date_key::day_key(stale),
            minutes: 60,
        }];
        assert_eq!(weekly_streaks(&habits, &logs, today())["h1"], 0);
    }

    #[test]
    fn score_is_always_within_bounds() {
        let habits = vec![habit("h1")];
        for bits in 0u32..128 {
            let mut pattern = [0u32; 7];
            for (day, slot) in pattern.iter_mut().enumerate() {
                if bits & (1 << day) != 0 {
                    *slot = 15;
                }
            }
            let logs = logs_for_pattern("h1", pattern);
            let score = weekly_streaks(&habits, &logs, today())["h1"];
            assert!(score <= 7, "pattern {bits:#b} scored {score}");
        }
    }
}
