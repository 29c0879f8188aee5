use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat};

use super::ScalarParser;
use super::error::FlagTypeError;
use crate::flag::Value;

/// Parses booleans. A flag given without a value is `true`.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and the matching false
/// spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolParser;

impl ScalarParser for BoolParser {
    type Item = bool;
    const TYPE: &'static str = "bool";
    const LIST_TYPE: &'static str = "[]bool";

    fn convert(&self, raw: &str) -> Result<bool, FlagTypeError> {
        match raw {
            "" => Ok(true),
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(FlagTypeError::InvalidBool(raw.to_string())),
        }
    }

    fn format(item: &bool) -> String {
        item.to_string()
    }

    fn single(item: bool) -> Value {
        Value::Bool(item)
    }

    fn list(items: Vec<bool>) -> Value {
        Value::BoolList(items)
    }

    fn items(value: &Value) -> Option<&[bool]> {
        value.as_bool_list()
    }
}

/// Takes the value verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl ScalarParser for StringParser {
    type Item = String;
    const TYPE: &'static str = "string";
    const LIST_TYPE: &'static str = "[]string";

    fn convert(&self, raw: &str) -> Result<String, FlagTypeError> {
        Ok(raw.to_string())
    }

    fn format(item: &String) -> String {
        item.clone()
    }

    fn single(item: String) -> Value {
        Value::String(item)
    }

    fn list(items: Vec<String>) -> Value {
        Value::StringList(items)
    }

    fn items(value: &Value) -> Option<&[String]> {
        value.as_string_list()
    }
}

/// Base-10 signed 64-bit integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntParser;

impl ScalarParser for IntParser {
    type Item = i64;
    const TYPE: &'static str = "int";
    const LIST_TYPE: &'static str = "[]int";

    fn convert(&self, raw: &str) -> Result<i64, FlagTypeError> {
        Ok(raw.parse()?)
    }

    fn format(item: &i64) -> String {
        item.to_string()
    }

    fn single(item: i64) -> Value {
        Value::Int(item)
    }

    fn list(items: Vec<i64>) -> Value {
        Value::IntList(items)
    }

    fn items(value: &Value) -> Option<&[i64]> {
        value.as_int_list()
    }
}

/// Base-10 unsigned 64-bit integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UintParser;

impl ScalarParser for UintParser {
    type Item = u64;
    const TYPE: &'static str = "uint";
    const LIST_TYPE: &'static str = "[]uint";

    fn convert(&self, raw: &str) -> Result<u64, FlagTypeError> {
        Ok(raw.parse()?)
    }

    fn format(item: &u64) -> String {
        item.to_string()
    }

    fn single(item: u64) -> Value {
        Value::Uint(item)
    }

    fn list(items: Vec<u64>) -> Value {
        Value::UintList(items)
    }

    fn items(value: &Value) -> Option<&[u64]> {
        value.as_uint_list()
    }
}

/// 64-bit floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatParser;

impl ScalarParser for FloatParser {
    type Item = f64;
    const TYPE: &'static str = "float";
    const LIST_TYPE: &'static str = "[]float";

    fn convert(&self, raw: &str) -> Result<f64, FlagTypeError> {
        Ok(raw.parse()?)
    }

    fn format(item: &f64) -> String {
        item.to_string()
    }

    fn single(item: f64) -> Value {
        Value::Float(item)
    }

    fn list(items: Vec<f64>) -> Value {
        Value::FloatList(items)
    }

    fn items(value: &Value) -> Option<&[f64]> {
        value.as_float_list()
    }
}

/// RFC 3339 timestamps, with or without fractional seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeParser;

impl ScalarParser for TimeParser {
    type Item = DateTime<FixedOffset>;
    const TYPE: &'static str = "timestamp";
    const LIST_TYPE: &'static str = "[]timestamp";

    fn convert(&self, raw: &str) -> Result<DateTime<FixedOffset>, FlagTypeError> {
        Ok(DateTime::parse_from_rfc3339(raw)?)
    }

    fn format(item: &DateTime<FixedOffset>) -> String {
        item.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn single(item: DateTime<FixedOffset>) -> Value {
        Value::Timestamp(item)
    }

    fn list(items: Vec<DateTime<FixedOffset>>) -> Value {
        Value::TimestampList(items)
    }

    fn items(value: &Value) -> Option<&[DateTime<FixedOffset>]> {
        value.as_timestamp_list()
    }
}

/// Human-readable durations such as `90s`, `1h30m` or `250ms`.
///
/// Fractional (`1.5h`) and negative (`-1s`) durations are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationParser;

impl ScalarParser for DurationParser {
    type Item = Duration;
    const TYPE: &'static str = "duration";
    const LIST_TYPE: &'static str = "[]duration";

    fn convert(&self, raw: &str) -> Result<Duration, FlagTypeError> {
        Ok(humantime::parse_duration(raw)?)
    }

    fn format(item: &Duration) -> String {
        humantime::format_duration(*item).to_string()
    }

    fn single(item: Duration) -> Value {
        Value::Duration(item)
    }

    fn list(items: Vec<Duration>) -> Value {
        Value::DurationList(items)
    }

    fn items(value: &Value) -> Option<&[Duration]> {
        value.as_duration_list()
    }
}
