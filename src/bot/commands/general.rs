//! General Discord commands - ping, help, and other utility commands.
//! These commands don't touch the session.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**HabitBuddy Help**\n\
        Earn points for daily habits, then spend them on rewards.\n\n\
        **Tasks**\n\
        • `/tasks` - Lists today's tasks and progress.\n\
        • `/done <task>` - Counts one completion of a task.\n\
        • `/undo <task>` - Takes back one completion.\n\
        • `/tap <task>` - Toggles a checkbox task, or counts one more.\n\
        • `/task_add <text> [points]` - Creates a custom task.\n\
        • `/task_edit <task> ...` - Changes a task's text, icon, colour, points, or target.\n\
        • `/task_reset <task>` - Restores a preset's original look.\n\
        • `/task_delete <task>` - Deletes a custom task.\n\n\
        **Wallet**\n\
        • `/spend <amount> [reason]` - Pays for a reward out of the wallet.\n\
        • `/wallet` - Shows the balance and recent purchases.\n\n\
        **Days**\n\
        • `/status` - Shows today's score, wallet, and streak.\n\
        • `/settle [archive_date] [next_date]` - Closes the day and starts the next.\n\
        • `/trend` - Shows points and spending over the last 30 records.\n\
        • `/achievements` - Shows every achievement and which are unlocked.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
