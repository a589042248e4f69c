//! Stored-state merger - rebuilds a session from a persisted blob.
//!
//! Field precedence when a stored task matches a catalog preset by ID:
//!
//! | field                                   | winner                     |
//! |-----------------------------------------|----------------------------|
//! | `text`, `value`, `type`, `targetCount`  | catalog                    |
//! | `emoji`, `color`                        | stored, catalog if blank   |
//! | `currentCount`                          | stored (legacy flag fallback) |
//! | `isCustom`                              | always `false`             |
//!
//! Stored tasks with no matching preset are custom tasks; their missing
//! fields get defaults. Presets absent from the blob are appended with no
//! progress. The session date comes from the stored `lastLoginDate` and is
//! never rolled over to today here.

use crate::core::{
    catalog::{Catalog, TaskType, palette_color},
    state::{
        DailyRecord, SessionState, SpendingLog, StoredData, StoredRecord, StoredSpendingLog,
        StoredTask, Task, UserStats,
    },
};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Builds the session from whatever the store returned.
///
/// `None` (first run) and malformed blobs both produce the default session.
#[must_use]
pub fn restore(blob: Option<&str>, catalog: &Catalog, today: NaiveDate) -> SessionState {
    let Some(blob) = blob else {
        info!("No saved state found, starting fresh");
        return defaults(catalog, today);
    };

    match StoredData::from_blob(blob) {
        Ok(stored) => merge(stored, catalog, today),
        Err(e) => {
            warn!("Saved state is unreadable, falling back to defaults: {}", e);
            defaults(catalog, today)
        }
    }
}

/// A brand-new session: every preset at zero, empty wallet and history.
#[must_use]
pub fn defaults(catalog: &Catalog, today: NaiveDate) -> SessionState {
    SessionState {
        tasks: catalog.presets().iter().map(Task::from_preset).collect(),
        wallet_balance: 0.0,
        history: Vec::new(),
        stats: UserStats::fresh(today),
        spending_logs: Vec::new(),
        current_date: today,
    }
}

/// Reconciles a parsed blob with the current catalog.
#[must_use]
pub fn merge(stored: StoredData, catalog: &Catalog, today: NaiveDate) -> SessionState {
    let tasks = merge_tasks(stored.tasks, catalog);
    let history = readable_history(stored.history);
    let spending_logs = readable_spending_logs(stored.spending_logs);

    let mut stats = stored.stats.unwrap_or_else(|| UserStats::fresh(today));
    let current_date = stats.last_login_date.unwrap_or(today);
    stats.last_login_date = Some(current_date);

    debug!(
        tasks = tasks.len(),
        history = history.len(),
        %current_date,
        "Merged saved state"
    );

    SessionState {
        tasks,
        wallet_balance: stored.wallet_balance.max(0.0),
        history,
        stats,
        spending_logs,
        current_date,
    }
}

/// Merges stored tasks with the catalog, keeping stored order and appending
/// presets the blob does not know about yet.
#[must_use]
pub fn merge_tasks(stored: Vec<StoredTask>, catalog: &Catalog) -> Vec<Task> {
    let mut tasks: Vec<Task> = stored
        .into_iter()
        .map(|t| match catalog.find(&t.id) {
            Some(preset) => {
                let count = stored_count(&t, preset.target_count);
                Task {
                    id: t.id,
                    text: preset.text.clone(),
                    emoji: non_blank(t.emoji).or_else(|| Some(preset.emoji.clone())),
                    color: non_blank(t.color).or_else(|| Some(preset.color.clone())),
                    value: preset.value,
                    task_type: preset.task_type,
                    current_count: count,
                    target_count: preset.target_count,
                    is_custom: false,
                }
            }
            None => {
                let task_type = t.task_type.unwrap_or(TaskType::Boolean);
                let target_count = t.target_count.filter(|c| *c > 0).unwrap_or(1);
                let count = stored_count(&t, target_count);
                let color =
                    non_blank(t.color).unwrap_or_else(|| palette_color(&t.id).to_string());
                Task {
                    text: t.text.unwrap_or_default(),
                    emoji: non_blank(t.emoji),
                    color: Some(color),
                    value: t.value.unwrap_or(1),
                    task_type,
                    current_count: count,
                    target_count,
                    is_custom: true,
                    id: t.id,
                }
            }
        })
        .collect();

    let known: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let missing: Vec<Task> = catalog
        .presets()
        .iter()
        .filter(|p| !known.contains(p.id.as_str()))
        .map(Task::from_preset)
        .collect();

    if !missing.is_empty() {
        info!(count = missing.len(), "Adding presets introduced since last save");
    }
    tasks.extend(missing);
    tasks
}

/// Treats an empty or whitespace-only string like a missing one.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// History records with a readable date; the rest are dropped.
fn readable_history(stored: Vec<StoredRecord>) -> Vec<DailyRecord> {
    let total = stored.len();
    let history: Vec<DailyRecord> = stored
        .into_iter()
        .filter_map(StoredRecord::into_record)
        .collect();
    if history.len() < total {
        warn!(
            dropped = total - history.len(),
            "Dropping history records without a valid date"
        );
    }
    history
}

/// Spending logs with a readable date; the rest are dropped.
fn readable_spending_logs(stored: Vec<StoredSpendingLog>) -> Vec<SpendingLog> {
    let total = stored.len();
    let logs: Vec<SpendingLog> = stored
        .into_iter()
        .filter_map(StoredSpendingLog::into_log)
        .collect();
    if logs.len() < total {
        warn!(
            dropped = total - logs.len(),
            "Dropping spending logs without a valid date"
        );
    }
    logs
}

/// Progress of a stored task, migrating the pre-counter `isCompleted` flag.
fn stored_count(task: &StoredTask, target_count: u32) -> u32 {
    task.current_count.unwrap_or_else(|| {
        if task.is_completed.unwrap_or(false) {
            target_count
        } else {
            0
        }
    })
}
