use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub importance: u8,
    pub target_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub habit_id: String,
    pub date: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GratitudeEntry {
    pub date: String,
    pub prompt_id: String,
    pub response: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GratitudePrompt {
    pub id: &'static str,
    pub text: &'static str,
}

// ─── Mutation Payloads ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitPayload {
    pub name: String,
    pub importance: Option<u8>,
    pub target_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitPayload {
    pub name: Option<String>,
    pub importance: Option<u8>,
    pub target_minutes: Option<Option<u32>>,
}

// ─── Engine Outputs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopHabit {
    pub name: String,
    pub minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub label: String,
    pub date_label: String,
    pub total_minutes: i64,
    pub average_minutes_per_habit: f64,
    pub top_habit: Option<TopHabit>,
    pub active_days: usize,
    pub suggested_focus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHistory {
    pub date: String,
    pub logs: Vec<HabitLog>,
    pub gratitude: Option<GratitudeEntry>,
}

// ─── Store Snapshot & Settings ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub habits: Vec<Habit>,
    pub logs: Vec<HabitLog>,
    pub gratitude: Vec<GratitudeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub insights_enabled: bool,
    pub default_importance: u8,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            insights_enabled: false,
            default_importance: 3,
        }
    }
}
