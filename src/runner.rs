use crate::date_key::parse_key;
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use crate::history::aggregate_history;
use crate::insight::generate_insight;
use crate::models::{
    AppSettings, CreateHabitPayload, DayHistory, GratitudePrompt, Habit, Summary,
    UpdateHabitPayload,
};
use crate::prompts::{find_prompt, select_prompt, PROMPT_CATALOG};
use crate::streak::weekly_streaks;
use crate::summary::summarize_range;
use chrono::{DateTime, Datelike, Duration, Local};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

const WEEKLY_LABEL: &str = "Last 7 days";
const MONTHLY_LABEL: &str = "This month";
const YEARLY_LABEL: &str = "This year";

const MIN_IMPORTANCE: u8 = 1;
const MAX_IMPORTANCE: u8 = 5;

/// Application core the presentation layer talks to: store mutations with
/// boundary coercion on one side, engine reads over immutable snapshots on
/// the other. "Now" is always an explicit parameter so every windowed
/// computation is deterministic.
pub struct AppCore {
    db: Database,
}

impl AppCore {
    pub fn new(app_data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let db = Database::new(&app_data_dir.as_ref().join("habitdeck.sqlite"))?;
        Ok(Self { db })
    }

    // ─── Habit Mutations ────────────────────────────────────────────────────

    pub fn create_habit(&self, payload: CreateHabitPayload) -> AppResult<Habit> {
        let name = payload.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("habit name must not be empty".to_string()));
        }
        let default_importance = self.db.get_settings()?.default_importance;
        let importance = payload
            .importance
            .unwrap_or(default_importance)
            .clamp(MIN_IMPORTANCE, MAX_IMPORTANCE);
        let habit_id = Uuid::new_v4().to_string();

        let habit = self
            .db
            .insert_habit(&habit_id, name, importance, payload.target_minutes)?;
        tracing::info!(habit_id = %habit.id, name = %habit.name, "habit created");
        Ok(habit)
    }

    pub fn update_habit(&self, habit_id: &str, mut payload: UpdateHabitPayload) -> AppResult<Habit> {
        if let Some(name) = &payload.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(AppError::Validation("habit name must not be empty".to_string()));
            }
            payload.name = Some(trimmed.to_string());
        }
        if let Some(importance) = payload.importance {
            payload.importance = Some(importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE));
        }

        self.db
            .update_habit(habit_id, &payload)?
            .ok_or_else(|| AppError::NotFound(format!("habit {habit_id}")))
    }

    pub fn delete_habit(&self, habit_id: &str) -> AppResult<bool> {
        let deleted = self.db.delete_habit(habit_id)?;
        if deleted {
            tracing::info!(habit_id = %habit_id, "habit deleted");
        }
        Ok(deleted)
    }

    pub fn list_habits(&self) -> AppResult<Vec<Habit>> {
        self.db.list_habits()
    }

    // ─── Log & Gratitude Mutations ──────────────────────────────────────────

    /// Free-form minute input lands here: non-numeric or negative becomes 0,
    /// anything else rounds to the nearest integer. A coerced 0 deletes the
    /// log, so zero-minute rows never persist.
    pub fn log_minutes(&self, habit_id: &str, date: &str, raw_minutes: f64) -> AppResult<()> {
        if parse_key(date).is_none() {
            return Err(AppError::Validation(format!("invalid date key '{date}'")));
        }
        if self.db.get_habit(habit_id)?.is_none() {
            return Err(AppError::NotFound(format!("habit {habit_id}")));
        }

        let minutes = coerce_minutes(raw_minutes);
        self.db.upsert_log(habit_id, date, minutes)?;
        tracing::debug!(habit_id = %habit_id, date = %date, minutes, "log upserted");
        Ok(())
    }

    pub fn remove_log(&self, habit_id: &str, date: &str) -> AppResult<bool> {
        self.db.delete_log(habit_id, date)
    }

    pub fn save_gratitude(&self, date: &str, prompt_id: &str, response: &str) -> AppResult<()> {
        if parse_key(date).is_none() {
            return Err(AppError::Validation(format!("invalid date key '{date}'")));
        }
        if find_prompt(prompt_id).is_none() {
            return Err(AppError::NotFound(format!("gratitude prompt {prompt_id}")));
        }
        self.db.upsert_gratitude(date, prompt_id, response)?;
        tracing::debug!(date = %date, prompt_id = %prompt_id, "gratitude saved");
        Ok(())
    }

    pub fn remove_gratitude(&self, date: &str) -> AppResult<bool> {
        self.db.delete_gratitude(date)
    }

    // ─── Engine Reads ───────────────────────────────────────────────────────

    pub fn weekly_summary(&self, now: DateTime<Local>) -> AppResult<Summary> {
        self.summary_for(WEEKLY_LABEL, now - Duration::days(6), now)
    }

    pub fn monthly_summary(&self, now: DateTime<Local>) -> AppResult<Summary> {
        let start = now.with_day(1).unwrap_or(now);
        self.summary_for(MONTHLY_LABEL, start, now)
    }

    pub fn yearly_summary(&self, now: DateTime<Local>) -> AppResult<Summary> {
        let start = now.with_day(1).and_then(|d| d.with_month(1)).unwrap_or(now);
        self.summary_for(YEARLY_LABEL, start, now)
    }

    fn summary_for(
        &self,
        label: &str,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> AppResult<Summary> {
        let snapshot = self.db.load()?;
        Ok(summarize_range(&snapshot.habits, &snapshot.logs, label, start, end))
    }

    pub fn streaks(&self, now: DateTime<Local>) -> AppResult<BTreeMap<String, u8>> {
        let snapshot = self.db.load()?;
        Ok(weekly_streaks(&snapshot.habits, &snapshot.logs, now))
    }

    pub fn history(&self) -> AppResult<Vec<DayHistory>> {
        let snapshot = self.db.load()?;
        Ok(aggregate_history(&snapshot.habits, &snapshot.logs, &snapshot.gratitude))
    }

    pub fn daily_prompt(&self, date: &str) -> &'static GratitudePrompt {
        select_prompt(date)
    }

    pub fn prompt_catalog(&self) -> &'static [GratitudePrompt] {
        PROMPT_CATALOG
    }

    /// The debrief is a premium surface: callers get `None` while the
    /// feature flag is off.
    pub fn insight(&self, now: DateTime<Local>) -> AppResult<Option<String>> {
        if !self.db.get_settings()?.insights_enabled {
            return Ok(None);
        }
        let snapshot = self.db.load()?;
        Ok(Some(generate_insight(
            &snapshot.habits,
            &snapshot.logs,
            &snapshot.gratitude,
            now,
        )))
    }

    // ─── Settings ───────────────────────────────────────────────────────────

    pub fn get_settings(&self) -> AppResult<AppSettings> {
        self.db.get_settings()
    }

    pub fn set_insights_enabled(&self, enabled: bool) -> AppResult<AppSettings> {
        let mut settings = self.db.get_settings()?;
        settings.insights_enabled = enabled;
        self.db.save_settings(&settings)?;
        tracing::info!(enabled, "insights flag updated");
        Ok(settings)
    }

    /// Shallow partial merge: known keys in `patch` override the stored
    /// record, unknown keys are ignored.
    pub fn update_settings(&self, patch: serde_json::Value) -> AppResult<AppSettings> {
        let current = self.db.get_settings()?;
        let mut merged = serde_json::to_value(&current)?;
        if let (Some(target), Some(source)) = (merged.as_object_mut(), patch.as_object()) {
            for (key, value) in source {
                if target.contains_key(key) {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        let mut settings: AppSettings =
            serde_json::from_value(merged).unwrap_or_else(|_| current.clone());
        settings.default_importance = settings
            .default_importance
            .clamp(MIN_IMPORTANCE, MAX_IMPORTANCE);
        self.db.save_settings(&settings)?;
        Ok(settings)
    }
}

fn coerce_minutes(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 0.0 {
        return 0;
    }
    raw.round() as u32
}
