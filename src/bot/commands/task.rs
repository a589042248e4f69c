//! Task Discord commands - completing, undoing, and editing tasks.
//!
//! Tasks are named by display text or ID; autocomplete suggests display text.

use crate::{bot::BotData, core::state::Task, errors::Error};

/// Resolves the task a user named, replying with a hint when nothing matches.
async fn resolve_task(
    ctx: poise::Context<'_, BotData, Error>,
    query: &str,
) -> crate::errors::Result<Option<Task>> {
    let session = ctx.data().tracker.snapshot().await;
    if let Some(task) = session.find_task(query) {
        return Ok(Some(task.clone()));
    }
    ctx.say(format!(
        "❌ Task '{query}' not found. Use `/tasks` to see available tasks."
    ))
    .await?;
    Ok(None)
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::resolve_task;
    use crate::{
        bot::{BotData, handlers::autocomplete, reply_with_unlocks},
        core::{
            catalog::TaskType,
            engine::{Action, TaskUpdate},
            report,
        },
        errors::{Error, Result},
    };

    /// Completion mode offered by `/task_edit`
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum TaskKind {
        #[name = "checkbox"]
        Boolean,
        #[name = "counter"]
        Counter,
    }

    impl From<TaskKind> for TaskType {
        fn from(kind: TaskKind) -> Self {
            match kind {
                TaskKind::Boolean => Self::Boolean,
                TaskKind::Counter => Self::Counter,
            }
        }
    }

    /// Lists every task with today's progress.
    #[poise::command(slash_command, prefix_command)]
    pub async fn tasks(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().tracker.snapshot().await;
        if session.tasks.is_empty() {
            ctx.say("No tasks yet. Use `/task_add` to create one.").await?;
            return Ok(());
        }

        let lines = session
            .tasks
            .iter()
            .map(report::format_task_line)
            .collect::<Vec<_>>()
            .join("\n");
        ctx.say(format!(
            "**Tasks for {}** (score {})\n{lines}",
            session.current_date,
            session.today_score()
        ))
        .await?;
        Ok(())
    }

    /// Counts one completion of a task.
    #[poise::command(slash_command, prefix_command)]
    pub async fn done(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Task to complete"]
        #[autocomplete = "autocomplete::autocomplete_task"]
        task: String,
    ) -> Result<()> {
        let Some(task) = resolve_task(ctx, &task).await? else {
            return Ok(());
        };

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::Increment {
                task_id: task.id.clone(),
            })
            .await?;

        let message = outcome.state.task(&task.id).map_or_else(
            || format!("✅ {}", task.text),
            |t| {
                format!(
                    "{}\n🏆 Today's score: {}",
                    report::format_task_line(t),
                    outcome.state.today_score()
                )
            },
        );
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Takes back one completion of a task.
    #[poise::command(slash_command, prefix_command)]
    pub async fn undo(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Task to undo"]
        #[autocomplete = "autocomplete::autocomplete_task"]
        task: String,
    ) -> Result<()> {
        let Some(task) = resolve_task(ctx, &task).await? else {
            return Ok(());
        };

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::Decrement {
                task_id: task.id.clone(),
            })
            .await?;

        if outcome.is_noop() {
            ctx.say(format!("ℹ️ '{}' has nothing to undo today.", task.text))
                .await?;
            return Ok(());
        }

        let message = outcome.state.task(&task.id).map_or_else(
            || format!("↩️ {}", task.text),
            |t| {
                format!(
                    "↩️ {}\n🏆 Today's score: {}",
                    report::format_task_line(t),
                    outcome.state.today_score()
                )
            },
        );
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Taps a task card: unchecks a finished checkbox task, otherwise counts one more.
    #[poise::command(slash_command, prefix_command)]
    pub async fn tap(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Task to tap"]
        #[autocomplete = "autocomplete::autocomplete_task"]
        task: String,
    ) -> Result<()> {
        let Some(task) = resolve_task(ctx, &task).await? else {
            return Ok(());
        };

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::Tap {
                task_id: task.id.clone(),
            })
            .await?;

        let message = outcome.state.task(&task.id).map_or_else(
            || task.text.clone(),
            |t| {
                format!(
                    "{}\n🏆 Today's score: {}",
                    report::format_task_line(t),
                    outcome.state.today_score()
                )
            },
        );
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Creates a custom checkbox task.
    #[poise::command(slash_command, prefix_command)]
    pub async fn task_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What the task is"] text: String,
        #[description = "Points per completion (default 1)"] points: Option<String>,
    ) -> Result<()> {
        if text.trim().is_empty() {
            ctx.say("❌ Task text cannot be empty.").await?;
            return Ok(());
        }

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::AddCustomTask {
                text,
                value: points.unwrap_or_default(),
            })
            .await?;

        let message = outcome.state.tasks.last().map_or_else(
            || "✅ Task added.".to_string(),
            |t| format!("✅ Task added:\n{}", report::format_task_line(t)),
        );
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Changes a task's text, icon, or colour; custom tasks also take points, mode, and target.
    #[poise::command(slash_command, prefix_command)]
    pub async fn task_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Task to edit"]
        #[autocomplete = "autocomplete::autocomplete_task"]
        task: String,
        #[description = "New text"] text: Option<String>,
        #[description = "New icon"] emoji: Option<String>,
        #[description = "New card colour, e.g. #E1F5FE"] color: Option<String>,
        #[description = "New points per completion"] points: Option<i64>,
        #[description = "Checkbox or counter"] kind: Option<TaskKind>,
        #[description = "New daily target for counters"]
        #[min = 1]
        target: Option<u32>,
    ) -> Result<()> {
        let Some(found) = resolve_task(ctx, &task).await? else {
            return Ok(());
        };

        let update = TaskUpdate {
            text: text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            emoji: emoji.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            color: color.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            value: points,
            task_type: kind.map(TaskType::from),
            target_count: target,
        };
        if update == TaskUpdate::default() {
            ctx.say("ℹ️ Nothing to change.").await?;
            return Ok(());
        }
        if !found.is_custom && update.changes_definition() {
            ctx.say(format!(
                "❌ '{}' is a preset task: only its text, icon, and colour can be changed.",
                found.text
            ))
            .await?;
            return Ok(());
        }

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::UpdateTask {
                task_id: found.id.clone(),
                update,
            })
            .await?;

        let message = outcome.state.task(&found.id).map_or_else(
            || "✅ Task updated.".to_string(),
            |t| format!("✅ Task updated:\n{}", report::format_task_line(t)),
        );
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Restores a preset task's original text, icon, and colour.
    #[poise::command(slash_command, prefix_command)]
    pub async fn task_reset(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Preset task to reset"]
        #[autocomplete = "autocomplete::autocomplete_task"]
        task: String,
    ) -> Result<()> {
        let Some(found) = resolve_task(ctx, &task).await? else {
            return Ok(());
        };
        if found.is_custom {
            ctx.say(format!(
                "❌ '{}' is a custom task and has no original look to restore.",
                found.text
            ))
            .await?;
            return Ok(());
        }

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::ResetTaskAppearance {
                task_id: found.id.clone(),
            })
            .await?;

        let message = outcome.state.task(&found.id).map_or_else(
            || "✅ Task reset.".to_string(),
            |t| format!("✅ Task reset:\n{}", report::format_task_line(t)),
        );
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Deletes a custom task. Preset tasks cannot be deleted.
    #[poise::command(slash_command, prefix_command)]
    pub async fn task_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Custom task to delete"]
        #[autocomplete = "autocomplete::autocomplete_custom_task"]
        task: String,
    ) -> Result<()> {
        let Some(found) = resolve_task(ctx, &task).await? else {
            return Ok(());
        };
        if !found.is_custom {
            ctx.say(format!("❌ '{}' is a preset task and cannot be deleted.", found.text))
                .await?;
            return Ok(());
        }

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::DeleteTask {
                task_id: found.id.clone(),
            })
            .await?;

        reply_with_unlocks(ctx, &format!("🗑️ Deleted '{}'.", found.text), &outcome).await
    }
}

// Re-export all commands
pub use inner::*;
