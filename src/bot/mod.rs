//! Bot layer - Discord-specific interface and command handlers
//!
//! Every slash command maps onto one tracker action. Achievement unlocks
//! returned by the tracker are appended to the command's reply.

/// Discord command implementations (tasks, wallet, day, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    core::{report, tracker::{ActionOutcome, Tracker}},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
pub struct BotData {
    /// The session service every command acts through
    pub tracker: Tracker,
}

impl BotData {
    /// Creates a new `BotData` around an opened tracker.
    #[must_use]
    pub const fn new(tracker: Tracker) -> Self {
        Self { tracker }
    }
}

/// Sends `message`, followed by any achievement notifications from `outcome`.
pub async fn reply_with_unlocks(
    ctx: poise::Context<'_, BotData, Error>,
    message: &str,
    outcome: &ActionOutcome,
) -> Result<()> {
    let mut text = message.to_string();
    if !outcome.unlocked.is_empty() {
        text.push_str("\n\n");
        text.push_str(&report::format_unlocks(&outcome.unlocked));
    }
    ctx.say(text).await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
#[instrument(skip(token, tracker))]
pub async fn run_bot(token: String, tracker: Tracker) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(tracker))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}
