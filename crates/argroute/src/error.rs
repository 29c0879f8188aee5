use indexmap::IndexMap;
use thiserror::Error;

use crate::flag::{ConvertError, FlagValue};

/// Broad origin of a [`RouteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The command tree itself is invalid (a bug in the program, not the
    /// input).
    Configuration,
    /// The user's input can't be routed.
    Input,
    /// A flag parser rejected a value.
    Conversion,
}

#[derive(Debug, Error)]
pub enum RouteError {
    /// Two flags visible at the same level share a (lower-cased) name or alias.
    #[error("duplicate definitions of flag {0:?}")]
    DuplicateFlagName(String),

    /// A `--` token matched no visible flag and the command doesn't allow
    /// unknown flags. `flag` is the lower-cased name without the leading `--`.
    #[error("unexpected flag {flag:?}")]
    UnknownFlag { flag: String, command: String },

    #[error("value {value:?} set for flag {flag:?} that doesn't accept values")]
    UnexpectedFlagValue { flag: String, value: String },

    /// A command that accepts no arguments got one it couldn't place.
    #[error("unexpected argument: {arg}")]
    UnexpectedArgument { arg: String, command: String },

    #[error("invalid value {value:?} for flag {flag:?}")]
    Conversion {
        flag: String,
        value: String,
        #[source]
        source: ConvertError,
    },

    #[error(transparent)]
    ExtraInput(Box<ExtraInputError>),
}

impl RouteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateFlagName(_) => ErrorKind::Configuration,
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::UnknownFlag { .. }
            | Self::UnexpectedFlagValue { .. }
            | Self::UnexpectedArgument { .. }
            | Self::ExtraInput(_) => ErrorKind::Input,
        }
    }
}

impl From<ExtraInputError> for RouteError {
    fn from(err: ExtraInputError) -> Self {
        Self::ExtraInput(Box::new(err))
    }
}

/// Input left over after the deepest matched command could not place it.
#[derive(Debug, Clone, Error)]
#[error(
    "unexpected extra input to {}: {}",
    .command_path.join(" "),
    .extra_input.join(" ")
)]
pub struct ExtraInputError {
    /// Names of the commands matched before the error, root first.
    pub command_path: Vec<String>,
    /// Flags bound before the error.
    pub flags: IndexMap<String, FlagValue>,
    /// Positional arguments collected before the error.
    pub args: Vec<String>,
    pub extra_input: Vec<String>,
}
