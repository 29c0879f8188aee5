use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagTypeError {
    #[error("invalid boolean {0:?}")]
    InvalidBool(String),

    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error(transparent)]
    Timestamp(#[from] chrono::ParseError),

    #[error(transparent)]
    Duration(#[from] humantime::DurationError),

    /// A list parser was handed a prior value it didn't produce.
    #[error("expected prior value of flag {name:?} to be {expected}, got {got}")]
    UnexpectedPriorType {
        name: String,
        expected: &'static str,
        got: &'static str,
    },
}
