//! System state entity - key-value rows holding serialized tracker state.
//!
//! Each row maps a storage key (e.g. `"2026_RENEWAL_PLAN_DATA_V3_COUNTERS"`)
//! to the JSON blob last saved under it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key
    #[sea_orm(unique)]
    pub key: String,
    /// Serialized value
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the value was last written
    pub updated_at: DateTime,
}

/// `SystemState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
