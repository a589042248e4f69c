//! Session state and the serialized blob schema.
//!
//! `SessionState` is the single in-memory aggregate every reducer works on.
//! `StoredData` mirrors the persisted JSON blob; its task entries are lenient
//! (`StoredTask`) because saves from older versions may lack fields that the
//! current model requires.

use crate::{
    core::{
        catalog::{PresetTask, TaskType},
        dates::lenient_date,
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A trackable daily item with its progress for the current session day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Preset ID (`t1`...) or `custom-<millis>`
    pub id: String,
    /// Display text
    pub text: String,
    /// Card icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Card background colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Points awarded per increment (may be negative for custom tasks)
    pub value: i64,
    /// Completion mode
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Increments recorded for the current session day
    pub current_count: u32,
    /// Count at which the task is completed
    pub target_count: u32,
    /// Whether the user created this task (only custom tasks can be deleted)
    pub is_custom: bool,
}

impl Task {
    /// Fresh task from a catalog preset, with no progress.
    #[must_use]
    pub fn from_preset(preset: &PresetTask) -> Self {
        Self {
            id: preset.id.clone(),
            text: preset.text.clone(),
            emoji: Some(preset.emoji.clone()),
            color: Some(preset.color.clone()),
            value: preset.value,
            task_type: preset.task_type,
            current_count: 0,
            target_count: preset.target_count,
            is_custom: false,
        }
    }

    /// A task is completed once its count reaches the target.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.current_count >= self.target_count
    }

    /// Points this task has contributed to the live day score.
    #[must_use]
    pub fn score(&self) -> i64 {
        i64::from(self.current_count) * self.value
    }
}

/// Points earned and money spent on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Calendar date this record belongs to (unique within the history)
    pub date: NaiveDate,
    /// Points earned, never below zero
    #[serde(default)]
    pub points_earned: i64,
    /// Amount spent from the wallet
    #[serde(default)]
    pub money_spent: f64,
}

impl DailyRecord {
    /// Empty record for `date`.
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            points_earned: 0,
            money_spent: 0.0,
        }
    }
}

/// Lifetime counters, streak, and unlocked achievements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    /// Lifetime points earned (undo may lower it, never below zero)
    pub total_points_earned: i64,
    /// Lifetime amount spent
    pub total_money_spent: f64,
    /// Consecutive settled days
    pub current_streak: u32,
    /// Session date the state was last saved under
    #[serde(with = "lenient_date")]
    pub last_login_date: Option<NaiveDate>,
    /// Unlocked achievement IDs, in unlock order
    pub unlocked_achievements: Vec<String>,
}

impl UserStats {
    /// Zeroed stats for a brand-new session on `today`.
    #[must_use]
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            last_login_date: Some(today),
            ..Self::default()
        }
    }

    /// Whether the achievement with `id` has been unlocked.
    #[must_use]
    pub fn has_unlocked(&self, id: &str) -> bool {
        self.unlocked_achievements.iter().any(|a| a == id)
    }
}

/// One reward purchase, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingLog {
    /// Unique ID (epoch milliseconds of creation)
    pub id: String,
    /// Session date the spend was booked against
    pub date: NaiveDate,
    /// Wall-clock time of the spend
    pub timestamp: DateTime<Utc>,
    /// Amount taken from the wallet
    pub amount: f64,
    /// What the points were spent on
    pub reason: String,
}

/// The whole mutable session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Tasks in display order
    pub tasks: Vec<Task>,
    /// Spendable points, never below zero
    pub wallet_balance: f64,
    /// Per-date records, one per date
    pub history: Vec<DailyRecord>,
    /// Lifetime aggregates
    pub stats: UserStats,
    /// Purchases, newest first
    pub spending_logs: Vec<SpendingLog>,
    /// The day currently being tracked; only settlement moves it
    pub current_date: NaiveDate,
}

impl SessionState {
    /// Live, unsettled score of the current day.
    #[must_use]
    pub fn today_score(&self) -> i64 {
        self.tasks.iter().map(Task::score).sum()
    }

    /// Looks up a task by ID.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Mutable lookup of a task by ID.
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Resolves user input to a task: exact ID first, then display text
    /// ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_task(&self, query: &str) -> Option<&Task> {
        let query = query.trim();
        self.task(query).or_else(|| {
            self.tasks
                .iter()
                .find(|t| t.text.trim().eq_ignore_ascii_case(query))
        })
    }

    /// The history record for `date`, if one exists.
    #[must_use]
    pub fn record(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.history.iter().find(|r| r.date == date)
    }

    /// Converts the session into the persisted schema.
    ///
    /// `stats.lastLoginDate` always carries the session date so that the next
    /// load resumes on the same day.
    #[must_use]
    pub fn to_stored(&self, now: DateTime<Utc>) -> StoredData {
        let mut stats = self.stats.clone();
        stats.last_login_date = Some(self.current_date);

        StoredData {
            tasks: self.tasks.iter().map(StoredTask::from).collect(),
            wallet_balance: self.wallet_balance,
            last_updated: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            history: self.history.iter().map(StoredRecord::from).collect(),
            stats: Some(stats),
            spending_logs: self.spending_logs.iter().map(StoredSpendingLog::from).collect(),
        }
    }

    /// Serializes the session as the JSON blob handed to the store.
    pub fn to_blob(&self, now: DateTime<Utc>) -> Result<String> {
        Ok(serde_json::to_string(&self.to_stored(now))?)
    }
}

/// A task entry as found in a stored blob
///
/// Every field except `id` is optional: older saves used an `isCompleted`
/// flag instead of counts and did not record type or target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    /// Task ID
    pub id: String,
    /// Display text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Card icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Card colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Points per increment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    /// Completion mode
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    /// Progress for the session day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_count: Option<u32>,
    /// Completion target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_count: Option<u32>,
    /// Custom flag as last saved; recomputed on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
    /// Pre-counter completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: Some(task.text.clone()),
            emoji: task.emoji.clone(),
            color: task.color.clone(),
            value: Some(task.value),
            task_type: Some(task.task_type),
            current_count: Some(task.current_count),
            target_count: Some(task.target_count),
            is_custom: Some(task.is_custom),
            is_completed: None,
        }
    }
}

/// A history entry as found in a stored blob
///
/// Older saves may carry an empty or garbled date (a cleared date field at
/// settlement); such entries decode with `date: None` and are dropped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    /// Calendar date, `None` when unreadable
    #[serde(default, with = "lenient_date")]
    pub date: Option<NaiveDate>,
    /// Points earned
    #[serde(default)]
    pub points_earned: i64,
    /// Amount spent
    #[serde(default)]
    pub money_spent: f64,
}

impl From<&DailyRecord> for StoredRecord {
    fn from(record: &DailyRecord) -> Self {
        Self {
            date: Some(record.date),
            points_earned: record.points_earned,
            money_spent: record.money_spent,
        }
    }
}

impl StoredRecord {
    /// The record, or `None` when its date could not be read.
    #[must_use]
    pub fn into_record(self) -> Option<DailyRecord> {
        Some(DailyRecord {
            date: self.date?,
            points_earned: self.points_earned,
            money_spent: self.money_spent,
        })
    }
}

/// A spending log entry as found in a stored blob; dates are lenient as in
/// [`StoredRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSpendingLog {
    /// Unique ID
    pub id: String,
    /// Session date, `None` when unreadable
    #[serde(default, with = "lenient_date")]
    pub date: Option<NaiveDate>,
    /// Wall-clock time of the spend
    pub timestamp: DateTime<Utc>,
    /// Amount taken from the wallet
    pub amount: f64,
    /// What the points were spent on
    #[serde(default)]
    pub reason: String,
}

impl From<&SpendingLog> for StoredSpendingLog {
    fn from(log: &SpendingLog) -> Self {
        Self {
            id: log.id.clone(),
            date: Some(log.date),
            timestamp: log.timestamp,
            amount: log.amount,
            reason: log.reason.clone(),
        }
    }
}

impl StoredSpendingLog {
    /// The log entry, or `None` when its date could not be read.
    #[must_use]
    pub fn into_log(self) -> Option<SpendingLog> {
        Some(SpendingLog {
            date: self.date?,
            id: self.id,
            timestamp: self.timestamp,
            amount: self.amount,
            reason: self.reason,
        })
    }
}

/// The persisted blob
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredData {
    /// Tasks as saved
    #[serde(default)]
    pub tasks: Vec<StoredTask>,
    /// Wallet balance
    #[serde(default)]
    pub wallet_balance: f64,
    /// RFC 3339 time of the save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Daily records
    #[serde(default)]
    pub history: Vec<StoredRecord>,
    /// Lifetime stats
    #[serde(default)]
    pub stats: Option<UserStats>,
    /// Spending log, newest first
    #[serde(default)]
    pub spending_logs: Vec<StoredSpendingLog>,
}

impl StoredData {
    /// Parses a blob.
    pub fn from_blob(blob: &str) -> Result<Self> {
        Ok(serde_json::from_str(blob)?)
    }
}
