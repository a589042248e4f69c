//! Report generation - read-only projections of the session for display.
//!
//! Nothing here mutates state. The bot layer turns these into messages; the
//! formatting helpers return plain strings so they can be tested without a
//! Discord connection.

use crate::core::{
    achievements::{ACHIEVEMENTS, Achievement},
    catalog::TaskType,
    dates,
    state::{DailyRecord, SessionState, SpendingLog, Task, UserStats},
};

/// Number of history records shown in the trend view
pub const TREND_WINDOW: usize = 30;

/// An achievement together with whether the user holds it
#[derive(Debug, Clone)]
pub struct AchievementStatus {
    /// The achievement
    pub achievement: &'static Achievement,
    /// Whether it has been unlocked
    pub unlocked: bool,
}

/// The history slice to chart.
///
/// Takes the last [`TREND_WINDOW`] records in stored order. A history with a
/// single record gets a zero point for the previous day prepended, so the
/// first day still draws a rising line.
#[must_use]
pub fn trend(history: &[DailyRecord]) -> Vec<DailyRecord> {
    let mut points = history.to_vec();
    if let [only] = history {
        points.insert(0, DailyRecord::empty(dates::previous_day(only.date)));
    }
    let skip = points.len().saturating_sub(TREND_WINDOW);
    points.split_off(skip)
}

/// Total of every logged purchase.
#[must_use]
pub fn total_spent(logs: &[SpendingLog]) -> f64 {
    logs.iter().map(|l| l.amount).sum()
}

/// Every achievement with its unlock state, in catalog order.
#[must_use]
pub fn achievement_board(stats: &UserStats) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|achievement| AchievementStatus {
            achievement,
            unlocked: stats.has_unlocked(achievement.id),
        })
        .collect()
}

/// How many catalog achievements are unlocked.
#[must_use]
pub fn unlocked_count(stats: &UserStats) -> usize {
    ACHIEVEMENTS
        .iter()
        .filter(|a| stats.has_unlocked(a.id))
        .count()
}

/// Progress towards a counter's target as a percentage.
#[must_use]
pub fn calculate_progress(current: u32, target: u32) -> f64 {
    if target == 0 {
        return 0.0;
    }
    f64::from(current) / f64::from(target) * 100.0
}

/// Text progress bar like `[████████░░]`.
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress is in [0, 100] and length is small
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// One line per task, e.g. `✅ 💧 喝水达人 (250ml) 8/8 +2`.
#[must_use]
pub fn format_task_line(task: &Task) -> String {
    let mark = if task.is_completed() { "✅" } else { "⬜" };
    let emoji = task.emoji.as_deref().unwrap_or("📌");
    let progress = match task.task_type {
        TaskType::Boolean => String::new(),
        TaskType::Counter => format!(
            " {} {}/{}",
            format_progress_bar(calculate_progress(task.current_count, task.target_count), Some(8)),
            task.current_count,
            task.target_count
        ),
    };
    format!(
        "{mark} {emoji} {}{progress} {} `{}`",
        task.text,
        format_points(task.value),
        task.id
    )
}

/// Signed points like `+5` or `-2`.
#[must_use]
pub fn format_points(points: i64) -> String {
    if points >= 0 {
        format!("+{points}")
    } else {
        points.to_string()
    }
}

/// Header summary of the session.
#[must_use]
pub fn format_status(state: &SessionState) -> String {
    let in_sync = if state.current_date == dates::today() {
        ""
    } else {
        " (not yet settled)"
    };
    format!(
        "📅 {}{in_sync}\n🏆 Today's score: {}\n💰 Wallet: {:.2}\n🔥 Streak: {} day{}",
        dates::format_date(state.current_date),
        state.today_score(),
        state.wallet_balance,
        state.stats.current_streak,
        if state.stats.current_streak == 1 { "" } else { "s" },
    )
}

/// Trend rows as `MM-DD | bar points | spent`.
#[must_use]
pub fn format_trend(records: &[DailyRecord]) -> String {
    let peak = records.iter().map(|r| r.points_earned).max().unwrap_or(0);
    records
        .iter()
        .map(|r| {
            // Points are small integers; precision loss is irrelevant for a bar
            #[allow(clippy::cast_precision_loss)]
            let share = if peak > 0 {
                r.points_earned as f64 / peak as f64 * 100.0
            } else {
                0.0
            };
            format!(
                "{} {} {:>4} pts | {:.2} spent",
                r.date.format("%m-%d"),
                format_progress_bar(share, Some(10)),
                r.points_earned,
                r.money_spent
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Notification lines for freshly unlocked achievements.
#[must_use]
pub fn format_unlocks(unlocked: &[&'static Achievement]) -> String {
    unlocked
        .iter()
        .map(|a| format!("🏅 Achievement unlocked: {} **{}**", a.icon, a.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per purchase, newest first.
#[must_use]
pub fn format_spending_log(log: &SpendingLog) -> String {
    format!(
        "{} | -{:.2} | {}",
        dates::format_date(log.date),
        log.amount,
        log.reason
    )
}
