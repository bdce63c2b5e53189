use crate::date_key::in_range;
use crate::models::{GratitudeEntry, Habit, HabitLog};
use crate::streak::{weekly_streaks, window_keys};
use crate::summary::{distinct_active_days, habit_name, minutes_by_habit};
use chrono::{DateTime, Local};

pub const ONBOARDING_MESSAGE: &str = "Welcome! Create a habit and log your first minutes — once there's a little history, your weekly debrief will appear here.";

const GRATITUDE_STRONG: &str = "that's strong momentum, keep the streak alive.";
const GRATITUDE_ALMOST: &str = "one more reflection would make this a standout week.";
const GRATITUDE_NUDGE: &str = "capturing even one small moment a day builds the habit.";

/// Rule-based weekly debrief over the trailing 7-day window ending `today`.
/// Four sentences in fixed order: standout habit, most important unmet
/// habit, logging consistency, gratitude engagement.
pub fn generate_insight(
    habits: &[Habit],
    logs: &[HabitLog],
    gratitude: &[GratitudeEntry],
    today: DateTime<Local>,
) -> String {
    if habits.is_empty() || logs.is_empty() {
        return ONBOARDING_MESSAGE.to_string();
    }

    // Same trailing window as the streak walk.
    let window = window_keys(today);
    let start_key = window.first().cloned().unwrap_or_default();
    let end_key = window.last().cloned().unwrap_or_default();

    let totals = minutes_by_habit(logs, &start_key, &end_key);
    let streaks = weekly_streaks(habits, logs, today);
    let days_logged = distinct_active_days(logs, &start_key, &end_key);
    let gratitude_count = gratitude
        .iter()
        .filter(|entry| in_range(&entry.date, &start_key, &end_key))
        .filter(|entry| !entry.response.trim().is_empty())
        .count();

    let mut ranked: Vec<(&str, i64)> = totals.iter().map(|(id, total)| (*id, *total)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let standout = match ranked.first() {
        Some((habit_id, minutes)) => {
            let streak = streaks.get(*habit_id).copied().unwrap_or(0);
            format!(
                "Your standout habit this week was \"{}\" with {} minutes logged and a streak score of {}/7.",
                habit_name(habits, habit_id),
                minutes,
                streak
            )
        }
        None => "No habit minutes were logged in the last 7 days.".to_string(),
    };

    let mut by_importance: Vec<&Habit> = habits.iter().collect();
    by_importance.sort_by(|a, b| b.importance.cmp(&a.importance));
    let unmet = by_importance
        .iter()
        .find(|habit| totals.get(habit.id.as_str()).copied().unwrap_or(0) == 0);
    let unmet_sentence = match unmet {
        Some(habit) => format!(
            "\"{}\" is your most important habit without activity this week — even five minutes would count.",
            habit.name
        ),
        None => "All of your high-importance habits saw activity this week.".to_string(),
    };

    let consistency = if days_logged >= 5 {
        format!("You logged habits on {days_logged} of the last 7 days — excellent consistency.")
    } else {
        format!("You logged habits on {days_logged} of the last 7 days; aim for 5 or more to keep momentum.")
    };

    let tier = match gratitude_count {
        count if count >= 5 => GRATITUDE_STRONG,
        3 | 4 => GRATITUDE_ALMOST,
        _ => GRATITUDE_NUDGE,
    };
    let gratitude_sentence =
        format!("You recorded {gratitude_count} gratitude reflections this week — {tier}");

    [standout, unmet_sentence, consistency, gratitude_sentence].join(" ")
}
