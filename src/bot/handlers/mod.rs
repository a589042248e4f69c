//! Discord interaction handlers
//!
//! Handlers for non-command interactions such as autocomplete.

/// Autocomplete handlers for task names
pub mod autocomplete;
