//! Autocomplete handlers for Discord slash command parameters.

use crate::{
    bot::BotData,
    core::state::Task,
    errors::Error,
};

/// Discord's limit on autocomplete suggestions
const MAX_SUGGESTIONS: usize = 25;

/// Suggests task names matching what the user has typed so far.
///
/// Matches on display text or ID, case-insensitively, in display order.
/// Commands accept either form; the suggestion is the display text unless
/// that text would resolve to a different task, in which case it is the ID.
pub async fn autocomplete_task(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let session = ctx.data().tracker.snapshot().await;
    matching_tasks(&session.tasks, partial, |_| true)
}

/// Like [`autocomplete_task`], limited to custom tasks.
pub async fn autocomplete_custom_task(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let session = ctx.data().tracker.snapshot().await;
    matching_tasks(&session.tasks, partial, |t| t.is_custom)
}

fn matching_tasks(tasks: &[Task], partial: &str, keep: impl Fn(&Task) -> bool) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    tasks
        .iter()
        .filter(|t| keep(t))
        .filter(|t| {
            t.text.to_lowercase().contains(&partial_lower)
                || t.id.to_lowercase().contains(&partial_lower)
        })
        .map(|t| {
            if is_ambiguous(tasks, t) {
                t.id.clone()
            } else {
                t.text.clone()
            }
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Whether looking `task` up by its text could land on another task.
fn is_ambiguous(tasks: &[Task], task: &Task) -> bool {
    let text = task.text.trim();
    tasks.iter().any(|other| {
        other.id != task.id
            && (other.id == text || other.text.trim().eq_ignore_ascii_case(text))
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_matching_tasks_by_text_or_id() {
        let state = sample_state(date(2025, 1, 1));

        let all = matching_tasks(&state.tasks, "", |_| true);
        assert_eq!(all.len(), 15);

        let water = matching_tasks(&state.tasks, "250ml", |_| true);
        assert_eq!(water, vec!["喝水达人 (250ml)".to_string()]);

        let by_id = matching_tasks(&state.tasks, "t11", |_| true);
        assert_eq!(by_id, vec!["记账打卡".to_string()]);
    }

    #[test]
    fn test_shared_name_suggests_id() {
        let mut state = sample_state(date(2025, 1, 1));
        let mut twin = custom_task("custom-2", 1, 0);
        twin.text = "记账打卡".to_string();
        state.tasks.push(twin);

        let suggestions = matching_tasks(&state.tasks, "记账", |_| true);
        assert_eq!(suggestions, vec!["t11".to_string(), "custom-2".to_string()]);

        // Each suggestion resolves back to the task it was offered for
        assert_eq!(state.find_task(&suggestions[1]).unwrap().id, "custom-2");
        let customs = matching_tasks(&state.tasks, "记账", |t| t.is_custom);
        assert_eq!(customs, vec!["custom-2".to_string()]);
    }

    #[test]
    fn test_matching_custom_tasks_only() {
        let mut state = sample_state(date(2025, 1, 1));
        state.tasks.push(custom_task("custom-1", 2, 0));

        let customs = matching_tasks(&state.tasks, "", |t| t.is_custom);
        assert_eq!(customs, vec!["custom-1".to_string()]);
    }
}
