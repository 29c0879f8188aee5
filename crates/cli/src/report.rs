use argroute::{ErrorKind, FlagValue, RouteError, Routed, Value};
use chrono::SecondsFormat;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub struct RouteReport {
    /// Root first, then every matched subcommand.
    pub command: Vec<String>,
    pub flags: IndexMap<String, FlagReport>,
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlagReport {
    /// Name or alias as typed, lower-cased.
    pub invoked_as: String,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    pub raw: String,
    pub value: serde_json::Value,
}

impl RouteReport {
    pub fn from_routed(routed: &Routed<'_>) -> Self {
        Self {
            command: routed.command_names(),
            flags: routed
                .flags()
                .iter()
                .map(|(name, flag)| (name.clone(), FlagReport::from_flag(flag)))
                .collect(),
            args: routed.args().to_vec(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = format!("command: {}\n", self.command.join(" "));
        if !self.flags.is_empty() {
            out.push_str("flags:\n");
            let width = self.flags.keys().map(|k| k.len()).max().unwrap_or(0);
            for (name, flag) in &self.flags {
                out.push_str(&format!(
                    "  {:width$}  <{}> {}\n",
                    name,
                    flag.value_type,
                    flag.value,
                    width = width
                ));
            }
        }
        if !self.args.is_empty() {
            out.push_str("args:\n");
            for arg in &self.args {
                out.push_str(&format!("  {arg}\n"));
            }
        }
        out
    }
}

impl FlagReport {
    fn from_flag(flag: &FlagValue) -> Self {
        Self {
            invoked_as: flag.name().to_string(),
            value_type: flag.value().type_name(),
            raw: flag.raw_value().to_string(),
            value: value_to_json(flag.value()),
        }
    }
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(v) => json!(v),
        Value::String(v) => json!(v),
        Value::Int(v) => json!(v),
        Value::Uint(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Timestamp(v) => json!(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Value::Duration(v) => json!(humantime::format_duration(*v).to_string()),
        Value::BoolList(v) => json!(v),
        Value::StringList(v) => json!(v),
        Value::IntList(v) => json!(v),
        Value::UintList(v) => json!(v),
        Value::FloatList(v) => json!(v),
        Value::TimestampList(v) => json!(
            v.iter()
                .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .collect::<Vec<_>>()
        ),
        Value::DurationList(v) => json!(
            v.iter()
                .map(|d| humantime::format_duration(*d).to_string())
                .collect::<Vec<_>>()
        ),
    }
}

/// Machine-readable routing failure.
pub fn error_json(err: &RouteError) -> serde_json::Value {
    let kind = match err.kind() {
        ErrorKind::Configuration => "configuration",
        ErrorKind::Input => "input",
        ErrorKind::Conversion => "conversion",
    };
    let mut out = json!({
        "ok": false,
        "kind": kind,
        "message": argroute::app::error_chain(err),
    });
    if let RouteError::ExtraInput(extra) = err {
        out["command"] = json!(extra.command_path);
        out["extra-input"] = json!(extra.extra_input);
    }
    out
}
