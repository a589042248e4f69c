//! Database configuration module for `HabitBuddy`.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::SystemState;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Used when neither config.toml nor `DATABASE_URL` names a database
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/habit_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, or the
/// default local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first so a
/// fresh checkout can start without any setup.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_parent(database_url) {
        debug!("Ensuring database directory {:?} exists", parent);
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::connect(database_url).await?;
    info!("Connected to database");
    Ok(db)
}

/// Creates all tables that do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut system_state_table = schema.create_table_from_entity(SystemState);
    system_state_table.if_not_exists();

    db.execute(builder.build(&system_state_table)).await?;

    Ok(())
}

/// Directory holding the database file of a `sqlite://` URL, if any.
fn sqlite_file_parent(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}
