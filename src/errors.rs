//! Unified error types for `HabitBuddy`.
//!
//! The reconciliation engine itself never fails: unknown tasks and invalid
//! arguments are no-ops. Errors only come from the edges of the system, i.e.
//! storage, configuration, and user input parsed by the bot layer.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// The key-value store rejected a query
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// State blob could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A date string was not in `YYYY-MM-DD` form
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// A spend amount was zero, negative, or not a finite number
    #[error("Invalid amount {amount}: must be a positive number")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// I/O failure (config file, data directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing a reply into a `String` failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
