//! Persistence gateway - stores the serialized session in the key-value table.
//!
//! The store knows nothing about the blob's contents. `save` overwrites the
//! primary key unconditionally; the last full write wins. A legacy key is
//! consulted once, read-only, when the primary key has never been written.

use crate::{
    entities::{SystemState, SystemStateColumn, system_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{debug, info, instrument};

/// Default key the session blob is stored under
pub const DEFAULT_STORAGE_KEY: &str = "2026_RENEWAL_PLAN_DATA_V3_COUNTERS";

/// Key used by the previous data layout
pub const DEFAULT_LEGACY_STORAGE_KEY: &str = "2026_RENEWAL_PLAN_DATA_V2";

/// Where the blob lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key every save goes to
    pub primary: String,
    /// Read-only fallback consulted when `primary` is empty
    pub legacy: Option<String>,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            primary: DEFAULT_STORAGE_KEY.to_string(),
            legacy: Some(DEFAULT_LEGACY_STORAGE_KEY.to_string()),
        }
    }
}

/// Reads the raw value stored under `key`.
pub async fn get_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let row = SystemState::find()
        .filter(SystemStateColumn::Key.eq(key))
        .one(db)
        .await?;
    Ok(row.map(|r| r.value))
}

/// Writes `value` under `key`, replacing any previous value.
pub async fn set_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(SystemStateColumn::Key.eq(key))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut active_model: system_state::ActiveModel = row.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_row = system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_row.insert(db).await?;
    }

    Ok(())
}

/// Loads the last saved blob, falling back to the legacy key.
///
/// Returns `Ok(None)` on first run.
#[instrument(skip(db))]
pub async fn load<C>(db: &C, keys: &StorageKeys) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    if let Some(blob) = get_value(db, &keys.primary).await? {
        debug!(bytes = blob.len(), "Loaded saved state");
        return Ok(Some(blob));
    }

    let Some(legacy) = keys.legacy.as_deref() else {
        return Ok(None);
    };
    let blob = get_value(db, legacy).await?;
    if blob.is_some() {
        info!(legacy_key = legacy, "Migrating saved state from legacy key");
    }
    Ok(blob)
}

/// Saves `blob` under the primary key. The legacy key is never written.
#[instrument(skip(db, blob), fields(bytes = blob.len()))]
pub async fn save<C>(db: &C, keys: &StorageKeys, blob: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    set_value(db, &keys.primary, blob).await?;
    debug!("Saved state");
    Ok(())
}
