//! Runtime flag values and the conversion protocol flag types implement.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::command::Command;

/// Error returned by a [`FlagParser`].
///
/// The router never looks inside it; it is surfaced unchanged as the source of
/// [`RouteError::Conversion`](crate::RouteError::Conversion).
pub type ConvertError = Box<dyn Error + Send + Sync + 'static>;

/// Typed payload of a flag value.
///
/// Every scalar shape has a repeatable counterpart produced by the list
/// parsers in [`flagtypes`](crate::flagtypes).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Timestamp(DateTime<FixedOffset>),
    Duration(Duration),
    BoolList(Vec<bool>),
    StringList(Vec<String>),
    IntList(Vec<i64>),
    UintList(Vec<u64>),
    FloatList(Vec<f64>),
    TimestampList(Vec<DateTime<FixedOffset>>),
    DurationList(Vec<Duration>),
}

impl Value {
    /// The type tag of the built-in parser that produces this shape.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Timestamp(_) => "timestamp",
            Self::Duration(_) => "duration",
            Self::BoolList(_) => "[]bool",
            Self::StringList(_) => "[]string",
            Self::IntList(_) => "[]int",
            Self::UintList(_) => "[]uint",
            Self::FloatList(_) => "[]float",
            Self::TimestampList(_) => "[]timestamp",
            Self::DurationList(_) => "[]duration",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::BoolList(_)
                | Self::StringList(_)
                | Self::IntList(_)
                | Self::UintList(_)
                | Self::FloatList(_)
                | Self::TimestampList(_)
                | Self::DurationList(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool_list(&self) -> Option<&[bool]> {
        match self {
            Self::BoolList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            Self::IntList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_uint_list(&self) -> Option<&[u64]> {
        match self {
            Self::UintList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            Self::FloatList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_timestamp_list(&self) -> Option<&[DateTime<FixedOffset>]> {
        match self {
            Self::TimestampList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_duration_list(&self) -> Option<&[Duration]> {
        match self {
            Self::DurationList(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

/// A flag as it was bound while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagValue {
    name: String,
    raw_value: String,
    value: Value,
}

impl FlagValue {
    pub fn new(name: impl Into<String>, raw_value: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            raw_value: raw_value.into(),
            value,
        }
    }

    /// The name the flag was invoked with (lower-cased, possibly an alias).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The string the user passed. Empty when no value was given.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// What a converter can see about the parse that invoked it.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    command: &'a Command,
}

impl<'a> ParseContext<'a> {
    pub fn new(command: &'a Command) -> Self {
        Self { command }
    }

    /// The command node whose token window is being parsed.
    pub fn command(&self) -> &'a Command {
        self.command
    }
}

/// Converts raw flag text into a [`FlagValue`]. Implementing it defines a new
/// flag type.
pub trait FlagParser: fmt::Debug + Send + Sync {
    /// Turn a name and value into a flag.
    ///
    /// `value` is empty when the flag was given without one. `prior` is the
    /// value already bound for this flag at the current level, so repeatable
    /// flags can fold successive occurrences together.
    fn parse(
        &self,
        ctx: &ParseContext<'_>,
        name: &str,
        value: &str,
        prior: Option<&FlagValue>,
    ) -> Result<FlagValue, ConvertError>;

    /// User-facing type tag, like `string` or `[]int`.
    fn flag_type(&self) -> &str;
}
