use crate::errors::{AppError, AppResult};
use crate::models::{
    AppSettings, GratitudeEntry, Habit, HabitLog, StoreSnapshot, UpdateHabitPayload,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA_SQL: &str = include_str!("schema.sql");
const SETTINGS_KEY: &str = "app";

#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(AppError::from)?;
        conn.execute_batch(SCHEMA_SQL).map_err(AppError::from)?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.ensure_default_settings()?;
        Ok(db)
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))
    }

    // ─── Habits ─────────────────────────────────────────────────────────────

    pub fn insert_habit(
        &self,
        habit_id: &str,
        name: &str,
        importance: u8,
        target_minutes: Option<u32>,
    ) -> AppResult<Habit> {
        let now = Utc::now();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO habits (id, name, importance, target_minutes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit_id,
                name,
                importance,
                target_minutes,
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )?;

        Ok(Habit {
            id: habit_id.to_string(),
            name: name.to_string(),
            importance,
            target_minutes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_habit(&self, habit_id: &str) -> AppResult<Option<Habit>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, name, importance, target_minutes, created_at, updated_at
                 FROM habits WHERE id = ?1",
                [habit_id],
                habit_from_row,
            )
            .optional()?;
        Ok(row)
    }

    pub fn update_habit(
        &self,
        habit_id: &str,
        payload: &UpdateHabitPayload,
    ) -> AppResult<Option<Habit>> {
        let Some(mut habit) = self.get_habit(habit_id)? else {
            return Ok(None);
        };

        if let Some(name) = &payload.name {
            habit.name = name.clone();
        }
        if let Some(importance) = payload.importance {
            habit.importance = importance;
        }
        if let Some(target_minutes) = payload.target_minutes {
            habit.target_minutes = target_minutes;
        }
        habit.updated_at = Utc::now();

        let conn = self.conn()?;
        conn.execute(
            "UPDATE habits SET name = ?1, importance = ?2, target_minutes = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                habit.name,
                habit.importance,
                habit.target_minutes,
                habit.updated_at.to_rfc3339(),
                habit_id
            ],
        )?;
        Ok(Some(habit))
    }

    /// Logs referencing the habit are intentionally retained; aggregation
    /// renders them with the dangling-reference fallbacks.
    pub fn delete_habit(&self, habit_id: &str) -> AppResult<bool> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM habits WHERE id = ?1", [habit_id])?;
        Ok(affected > 0)
    }

    pub fn list_habits(&self) -> AppResult<Vec<Habit>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, name, importance, target_minutes, created_at, updated_at
             FROM habits ORDER BY created_at, id",
        )?;
        let habits = statement
            .query_map([], habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    // ─── Habit Logs ─────────────────────────────────────────────────────────

    /// Upsert on the (habit_id, date) key. A zero-minute upsert deletes the
    /// row: "no minutes" means "no log".
    pub fn upsert_log(&self, habit_id: &str, date: &str, minutes: u32) -> AppResult<()> {
        if minutes == 0 {
            self.delete_log(habit_id, date)?;
            return Ok(());
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO habit_logs (habit_id, date, minutes) VALUES (?1, ?2, ?3)
             ON CONFLICT(habit_id, date) DO UPDATE SET minutes = excluded.minutes",
            params![habit_id, date, minutes],
        )?;
        Ok(())
    }

    pub fn delete_log(&self, habit_id: &str, date: &str) -> AppResult<bool> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM habit_logs WHERE habit_id = ?1 AND date = ?2",
            params![habit_id, date],
        )?;
        Ok(affected > 0)
    }

    pub fn list_logs(&self) -> AppResult<Vec<HabitLog>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT habit_id, date, minutes FROM habit_logs ORDER BY date, habit_id",
        )?;
        let logs = statement
            .query_map([], |row| {
                Ok(HabitLog {
                    habit_id: row.get(0)?,
                    date: row.get(1)?,
                    minutes: row.get::<_, i64>(2)?.max(0) as u32,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    // ─── Gratitude ──────────────────────────────────────────────────────────

    pub fn upsert_gratitude(&self, date: &str, prompt_id: &str, response: &str) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO gratitude_entries (date, prompt_id, response) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET prompt_id = excluded.prompt_id,
                                             response = excluded.response",
            params![date, prompt_id, response],
        )?;
        Ok(())
    }

    pub fn delete_gratitude(&self, date: &str) -> AppResult<bool> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM gratitude_entries WHERE date = ?1", [date])?;
        Ok(affected > 0)
    }

    pub fn list_gratitude(&self) -> AppResult<Vec<GratitudeEntry>> {
        let conn = self.conn()?;
        let mut statement = conn
            .prepare("SELECT date, prompt_id, response FROM gratitude_entries ORDER BY date")?;
        let entries = statement
            .query_map([], |row| {
                Ok(GratitudeEntry {
                    date: row.get(0)?,
                    prompt_id: row.get(1)?,
                    response: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ─── Snapshot & Settings ────────────────────────────────────────────────

    pub fn load(&self) -> AppResult<StoreSnapshot> {
        Ok(StoreSnapshot {
            habits: self.list_habits()?,
            logs: self.list_logs()?,
            gratitude: self.list_gratitude()?,
        })
    }

    pub fn get_settings(&self) -> AppResult<AppSettings> {
        let conn = self.conn()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &AppSettings) -> AppResult<()> {
        let raw = serde_json::to_string(settings)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![SETTINGS_KEY, raw],
        )?;
        Ok(())
    }

    fn ensure_default_settings(&self) -> AppResult<()> {
        let raw = serde_json::to_string(&AppSettings::default())?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![SETTINGS_KEY, raw],
        )?;
        Ok(())
    }
}

fn habit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        importance: row.get::<_, i64>(2)?.clamp(1, 5) as u8,
        target_minutes: row.get::<_, Option<i64>>(3)?.map(|value| value.max(0) as u32),
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH)
}
