use crate::models::{DayHistory, GratitudeEntry, Habit, HabitLog};
use std::collections::BTreeMap;

/// Merged timeline: one record per distinct date, most recent first. A date
/// with only a gratitude entry still yields a record with an empty log list.
/// Logs within a date are ordered by the referenced habit's importance,
/// descending; dangling references rank as importance 0.
pub fn aggregate_history(
    habits: &[Habit],
    logs: &[HabitLog],
    gratitude: &[GratitudeEntry],
) -> Vec<DayHistory> {
    let importance: BTreeMap<&str, u8> = habits
        .iter()
        .map(|habit| (habit.id.as_str(), habit.importance))
        .collect();

    let mut days: BTreeMap<&str, DayHistory> = BTreeMap::new();
    for log in logs {
        days.entry(log.date.as_str())
            .or_insert_with(|| DayHistory {
                date: log.date.clone(),
                logs: Vec::new(),
                gratitude: None,
            })
            .logs
            .push(log.clone());
    }
    for entry in gratitude {
        days.entry(entry.date.as_str())
            .or_insert_with(|| DayHistory {
                date: entry.date.clone(),
                logs: Vec::new(),
                gratitude: None,
            })
            .gratitude = Some(entry.clone());
    }

    let mut timeline: Vec<DayHistory> = days.into_values().collect();
    timeline.reverse();
    for day in &mut timeline {
        day.logs.sort_by(|a, b| {
            let rank_a = importance.get(a.habit_id.as_str()).copied().unwrap_or(0);
            let rank_b = importance.get(b.habit_id.as_str()).copied().unwrap_or(0);
            rank_b.cmp(&rank_a)
        });
    }
    timeline
}

#[cfg(test)]
mod tests {
    use super::aggregate_history;
    use crate::models::{GratitudeEntry, Habit, HabitLog};
    use chrono::Utc;

    fn habit(id: &str, name: &str, importance: u8) -> Habit {
        Habit {
            id: id.to_string(),
            name: name.to_string(),
            importance,
            target_minutes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn log(habit_id: &str, date: &str, minutes: u32) -> HabitLog {
        HabitLog {
            habit_id: habit_id.to_string(),
            date: date.to_string(),
            minutes,
        }
    }

    fn entry(date: &str, response: &str) -> GratitudeEntry {
        GratitudeEntry {
            date: date.to_string(),
            prompt_id: "person".to_string(),
            response: response.to_string(),
        }
    }

    #[test]
    fn empty_inputs_produce_an_empty_timeline() {
        assert!(aggregate_history(&[], &[], &[]).is_empty());
    }

    #[test]
    fn dates_are_strictly_descending_without_duplicates() {
        let logs = vec![
            log("h1", "2024-01-03", 10),
            log("h1", "2024-01-01", 10),
            log("h2", "2024-01-03", 15),
            log("h1", "2024-01-02", 10),
        ];
        let timeline = aggregate_history(&[], &logs, &[]);
        let dates: Vec<&str> = timeline.iter().map(|day| day.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn gratitude_only_day_yields_a_record_with_no_logs() {
        let timeline = aggregate_history(&[], &[], &[entry("2024-01-05", "grateful")]);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].date, "2024-01-05");
        assert!(timeline[0].logs.is_empty());
        assert!(timeline[0].gratitude.is_some());
    }

    #[test]
    fn logs_and_gratitude_for_the_same_day_merge_into_one_record() {
        let logs = vec![log("h1", "2024-01-05", 20)];
        let timeline = aggregate_history(&[], &logs, &[entry("2024-01-05", "grateful")]);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].logs.len(), 1);
        assert!(timeline[0].gratitude.is_some());
    }

    #[test]
    fn logs_within_a_day_are_ordered_by_importance_descending() {
        let habits = vec![
            habit("h1", "Walk", 2),
            habit("h2", "Read", 5),
            habit("h3", "Code", 4),
        ];
        let logs = vec![
            log("h1", "2024-01-05", 10),
            log("h2", "2024-01-05", 10),
            log("h3", "2024-01-05", 10),
        ];
        let timeline = aggregate_history(&habits, &logs, &[]);
        let order: Vec<&str> = timeline[0].logs.iter().map(|l| l.habit_id.as_str()).collect();
        assert_eq!(order, vec!["h2", "h3", "h1"]);
    }

    #[test]
    fn dangling_references_sort_with_importance_zero() {
        let habits = vec![habit("h1", "Walk", 2)];
        let logs = vec![
            log("ghost", "2024-01-05", 10),
            log("h1", "2024-01-05", 10),
        ];
        let timeline = aggregate_history(&habits, &logs, &[]);
        let order: Vec<&str> = timeline[0].logs.iter().map(|l| l.habit_id.as_str()).collect();
        assert_eq!(order, vec!["h1", "ghost"]);
    }

    #[test]
    fn equal_importance_preserves_insertion_order() {
        let habits = vec![habit("h1", "Walk", 3), habit("h2", "Read", 3)];
        let logs = vec![log("h2", "2024-01-05", 10), log("h1", "2024-01-05", 10)];
        let timeline = aggregate_history(&habits, &logs, &[]);
        let order: Vec<&str> = timeline[0].logs.iter().map(|l| l.habit_id.as_str()).collect();
        assert_eq!(order, vec!["h2", "h1"]);
    }
}
