//! Wallet Discord commands - `spend` and `wallet`.

/// Number of purchases listed by `/wallet`
const RECENT_PURCHASES: usize = 10;

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::RECENT_PURCHASES;
    use crate::{
        bot::{BotData, reply_with_unlocks},
        core::{
            engine::{Action, DEFAULT_SPEND_REASON},
            report,
        },
        errors::{Error, Result},
    };

    /// Pays for a reward out of the wallet.
    ///
    /// The amount must be positive and no larger than the current balance.
    #[poise::command(slash_command, prefix_command)]
    pub async fn spend(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount to spend"] amount: f64,
        #[description = "What the reward is"] reason: Option<String>,
    ) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }

        let balance = ctx.data().tracker.snapshot().await.wallet_balance;
        if amount > balance {
            ctx.say(format!(
                "❌ Insufficient funds! The wallet has {balance:.2}, but you're trying to spend {amount:.2}"
            ))
            .await?;
            return Ok(());
        }

        let reason = reason.unwrap_or_else(|| DEFAULT_SPEND_REASON.to_string());
        let outcome = ctx
            .data()
            .tracker
            .apply(Action::Spend { amount, reason })
            .await?;

        // The balance may have moved between the check and the apply
        let Some(log) = outcome.state.spending_logs.first().filter(|_| !outcome.is_noop()) else {
            ctx.say("❌ The purchase was rejected: insufficient funds.")
                .await?;
            return Ok(());
        };

        let message = format!(
            "💸 Spent {:.2} on {}\n💰 Wallet: {:.2}",
            log.amount, log.reason, outcome.state.wallet_balance
        );
        reply_with_unlocks(ctx, &message, &outcome).await
    }

    /// Shows the wallet balance and recent purchases.
    #[poise::command(slash_command, prefix_command)]
    pub async fn wallet(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().tracker.snapshot().await;

        let mut message = format!(
            "💰 **Wallet: {:.2}**\n🧾 Total spent: {:.2} across {} purchase{}",
            session.wallet_balance,
            report::total_spent(&session.spending_logs),
            session.spending_logs.len(),
            if session.spending_logs.len() == 1 { "" } else { "s" },
        );

        if !session.spending_logs.is_empty() {
            let recent = session
                .spending_logs
                .iter()
                .take(RECENT_PURCHASES)
                .map(report::format_spending_log)
                .collect::<Vec<_>>()
                .join("\n");
            message.push_str("\n\n**Recent purchases**\n```\n");
            message.push_str(&recent);
            message.push_str("\n```");
        }

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
