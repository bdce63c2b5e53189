pub mod date_key;
pub mod db;
pub mod errors;
pub mod history;
pub mod insight;
pub mod models;
pub mod prompts;
pub mod runner;
pub mod streak;
pub mod summary;

pub use errors::{AppError, AppResult};
pub use runner::AppCore;

use once_cell::sync::OnceCell;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Call once at startup from the embedding shell. Logs roll daily into
/// `<app_data_dir>/logs` as JSON lines.
pub fn init_tracing(app_data_dir: &Path) -> AppResult<()> {
    let log_dir = app_data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| AppError::Io(error.to_string()))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "habitdeck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| AppError::Internal(error.to_string()))
}
