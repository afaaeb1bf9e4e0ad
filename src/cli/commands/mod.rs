//! CLI command implementations

pub mod classify;
pub mod completions;
pub mod config;
pub mod slots;
pub mod validate;
pub mod wizard;
