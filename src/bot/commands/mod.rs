//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// Status, settlement, trend, and achievement commands
pub mod day;

/// General utility commands
pub mod general;

/// Task commands
pub mod task;

/// Wallet commands
pub mod wallet;

// Export commands
pub use day::*;
pub use general::*;
pub use task::*;
pub use wallet::*;

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        tasks(),
        done(),
        undo(),
        tap(),
        task_add(),
        task_edit(),
        task_reset(),
        task_delete(),
        spend(),
        wallet(),
        status(),
        settle(),
        trend(),
        achievements(),
    ]
}
