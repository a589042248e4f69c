//! Core business logic - framework-agnostic tracking, settlement, and reporting.
//!
//! Data flows one way: [`storage`] hands a blob to [`merge`], which builds the
//! [`state::SessionState`]. User actions go through [`tracker`], which runs an
//! [`engine`] reducer, lets [`achievements`] react to the new stats, and writes
//! the result back through [`storage`].

/// Achievement catalog and evaluator
pub mod achievements;
/// Predefined task definitions
pub mod catalog;
/// Calendar-date helpers
pub mod dates;
/// Reducers for every user action
pub mod engine;
/// Stored-state reconciliation against the catalog
pub mod merge;
/// Read-only projections for display
pub mod report;
/// Session data model and blob schema
pub mod state;
/// Key-value persistence of the session blob
pub mod storage;
/// Session service tying the pieces together
pub mod tracker;
