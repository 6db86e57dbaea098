//! Error types for configuration and catalog mismatches.
//!
//! Gameplay denials are not errors; see [`crate::command::Denial`].
use thiserror::Error;

use crate::item::ItemKind;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown item `{0}`")]
    UnknownItem(String),

    #[error("item `{name}` is a {actual}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: ItemKind,
        actual: ItemKind,
    },

    #[error("invalid effect: value {value}, alignment delta {alignment_delta}")]
    InvalidEffect { value: i32, alignment_delta: i32 },

    #[error("failed to parse item catalog")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("{0} must be non-zero")]
    ZeroInterval(&'static str),

    #[error("resolve step ({resolve_ms}ms) must be shorter than decay step ({decay_ms}ms)")]
    CadenceOrder { resolve_ms: u64, decay_ms: u64 },

    #[error("{name} must be between 0 and {limit}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        limit: i64,
    },

    #[error("evolution threshold must be positive, got {0}")]
    Threshold(i32),
}
