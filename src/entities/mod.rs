//! Entity module - `SeaORM` entity definitions for the database.
//!
//! The tracker persists its whole state as one serialized blob, so the only
//! table is a key-value store.

pub mod system_state;

pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
