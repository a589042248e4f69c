//! Shared test utilities for `HabitBuddy`.
//!
//! Provides an in-memory database and small builders for sessions and tasks
//! with sensible defaults.

use crate::{
    core::{
        catalog::{Catalog, TaskType},
        merge,
        state::{SessionState, Task},
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes tracing output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Shorthand for a calendar date.
///
/// # Panics
/// Panics on an invalid date; test input only.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A fixed wall-clock instant for generated IDs and timestamps.
///
/// # Panics
/// Never; the instant is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

/// Default session on `day` with every built-in preset.
#[must_use]
pub fn sample_state(day: NaiveDate) -> SessionState {
    merge::defaults(&Catalog::builtin(), day)
}

/// Session on `day` with no tasks at all.
#[must_use]
pub fn empty_state(day: NaiveDate) -> SessionState {
    SessionState {
        tasks: Vec::new(),
        ..sample_state(day)
    }
}

/// Boolean custom task named after its ID.
#[must_use]
pub fn custom_task(id: &str, value: i64, count: u32) -> Task {
    Task {
        id: id.to_string(),
        text: id.to_string(),
        emoji: None,
        color: None,
        value,
        task_type: TaskType::Boolean,
        current_count: count,
        target_count: 1,
        is_custom: true,
    }
}

/// Counter custom task with the given target.
#[must_use]
pub fn counter_task(id: &str, value: i64, target: u32, count: u32) -> Task {
    Task {
        task_type: TaskType::Counter,
        target_count: target,
        ..custom_task(id, value, count)
    }
}
