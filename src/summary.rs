use crate::date_key::{day_key, in_range};
use crate::models::{Habit, HabitLog, Summary, TopHabit};
use chrono::{DateTime, Local};
use std::collections::{BTreeMap, BTreeSet};

const UNKNOWN_HABIT: &str = "Unknown habit";

/// Per-habit minute totals for logs whose key falls in `[start_key, end_key]`.
/// The BTreeMap keys the grouping by habit id, so downstream stable sorts
/// break ties toward the smaller habit id.
pub(crate) fn minutes_by_habit<'a>(
    logs: &'a [HabitLog],
    start_key: &str,
    end_key: &str,
) -> BTreeMap<&'a str, i64> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for log in logs {
        if in_range(&log.date, start_key, end_key) {
            *totals.entry(log.habit_id.as_str()).or_insert(0) += i64::from(log.minutes);
        }
    }
    totals
}

/// Count of distinct date keys carrying at least one positive-minute log.
pub(crate) fn distinct_active_days(logs: &[HabitLog], start_key: &str, end_key: &str) -> usize {
    let mut days: BTreeSet<&str> = BTreeSet::new();
    for log in logs {
        if log.minutes > 0 && in_range(&log.date, start_key, end_key) {
            days.insert(log.date.as_str());
        }
    }
    days.len()
}

pub(crate) fn habit_name(habits: &[Habit], habit_id: &str) -> String {
    habits
        .iter()
        .find(|habit| habit.id == habit_id)
        .map(|habit| habit.name.clone())
        .unwrap_or_else(|| UNKNOWN_HABIT.to_string())
}

pub fn summarize_range(
    habits: &[Habit],
    logs: &[HabitLog],
    label: &str,
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> Summary {
    let start_key = day_key(start);
    let end_key = day_key(end);

    let totals = minutes_by_habit(logs, &start_key, &end_key);
    let total_minutes: i64 = totals.values().sum();
    let active_days = distinct_active_days(logs, &start_key, &end_key);

    let mut ranked: Vec<(&str, i64)> = totals.iter().map(|(id, total)| (*id, *total)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let top_habit = ranked.first().map(|(habit_id, minutes)| TopHabit {
        name: habit_name(habits, habit_id),
        minutes: *minutes,
    });

    let average_minutes_per_habit = if ranked.is_empty() {
        0.0
    } else {
        round_one_decimal(total_minutes as f64 / ranked.len() as f64)
    };

    let suggested_focus = suggest_focus(habits, &ranked);

    Summary {
        label: label.to_string(),
        date_label: range_label(start, end),
        total_minutes,
        average_minutes_per_habit,
        top_habit,
        active_days,
        suggested_focus,
    }
}

fn suggest_focus(habits: &[Habit], ranked: &[(&str, i64)]) -> String {
    match ranked.len() {
        0 => "No sessions logged yet. Pick one habit and log a few minutes today.".to_string(),
        1 => format!(
            "Great consistency! Keep showing up for \"{}\".",
            habit_name(habits, ranked[0].0)
        ),
        _ => {
            let mut ascending: Vec<(&str, i64)> = ranked.to_vec();
            ascending.sort_by(|a, b| a.1.cmp(&b.1));
            let weakest = ascending
                .iter()
                .map(|(habit_id, _)| habit_name(habits, habit_id))
                .find(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_HABIT.to_string());
            format!(
                "\"{weakest}\" is getting the least attention. A short session there would rebalance your week."
            )
        }
    }
}

fn range_label(start: DateTime<Local>, end: DateTime<Local>) -> String {
    format!("{} → {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
