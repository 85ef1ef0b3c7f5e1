//! Configuration errors
//!
//! The puzzle core itself never fails; bad input there is a silent no-op.
//! Only loading settings and the character roster can go wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },
    #[error("character roster is empty")]
    EmptyRoster,
    #[error("character {index} has an empty {field}")]
    BlankCharacter { index: usize, field: &'static str },
}
