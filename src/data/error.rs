use std::num::ParseIntError;
use thiserror::Error;

/// Reasons a bound-field value string or configuration token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("value is empty")]
    Empty,
    #[error("malformed value '{0}'")]
    Malformed(String),
    #[error("invalid number: {0}")]
    Number(#[from] ParseIntError),
    #[error("value out of range: {0}")]
    OutOfRange(String),
    #[error("unknown {kind} '{value}'")]
    Unknown { kind: &'static str, value: String },
}
