//! Day Discord commands - status, settlement, trend, and achievements.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, reply_with_unlocks},
        core::{dates, engine::Action, report},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Shows today's score, wallet, and streak.
    #[poise::command(slash_command, prefix_command)]
    pub async fn status(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().tracker.snapshot().await;
        ctx.say(report::format_status(&session)).await?;
        Ok(())
    }

    /// Closes the session day and starts the next one.
    ///
    /// The live score is archived under `archive_date` (default: the session
    /// date) and the session moves to `next_date` (default: the day after the
    /// archive date). Dates use YYYY-MM-DD.
    #[poise::command(slash_command, prefix_command)]
    pub async fn settle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Date to archive today's score under (YYYY-MM-DD)"]
        archive_date: Option<String>,
        #[description = "Date the new session starts on (YYYY-MM-DD)"]
        next_date: Option<String>,
    ) -> Result<()> {
        let current_date = ctx.data().tracker.snapshot().await.current_date;
        let archive_date = match archive_date {
            Some(value) => dates::parse_date(&value)?,
            None => current_date,
        };
        let next_date = match next_date {
            Some(value) => dates::parse_date(&value)?,
            None => dates::next_day(archive_date),
        };

        let outcome = ctx
            .data()
            .tracker
            .apply(Action::Settle {
                archive_date,
                next_date,
            })
            .await?;

        let mut message = format!(
            "📦 Archived {} points under {}\n📅 New session: {}\n🔥 Streak: {}",
            outcome.previous.today_score().max(0),
            dates::format_date(archive_date),
            dates::format_date(outcome.state.current_date),
            outcome.state.stats.current_streak,
        );
        if outcome.state.current_date != dates::today() {
            write!(message, "\n⚠️ The session date is not today ({}).", dates::today())?;
        }
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Shows points and spending over the most recent days.
    #[poise::command(slash_command, prefix_command)]
    pub async fn trend(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().tracker.snapshot().await;
        let records = report::trend(&session.history);
        if records.is_empty() {
            ctx.say("No history yet. Settle a day with `/settle` to start one.")
                .await?;
            return Ok(());
        }

        ctx.say(format!(
            "📈 **Trend (last {} records)**\n```\n{}\n```",
            report::TREND_WINDOW,
            report::format_trend(&records)
        ))
        .await?;
        Ok(())
    }

    /// Shows every achievement and which ones are unlocked.
    #[poise::command(slash_command, prefix_command)]
    pub async fn achievements(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().tracker.snapshot().await;
        let board = report::achievement_board(&session.stats);

        let mut message = format!(
            "🏅 **Achievements {}/{}**\n",
            report::unlocked_count(&session.stats),
            board.len()
        );
        for status in &board {
            let a = status.achievement;
            let mark = if status.unlocked { "✅" } else { "🔒" };
            writeln!(message, "{mark} {} **{}** - {}", a.icon, a.title, a.description)?;
        }

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
