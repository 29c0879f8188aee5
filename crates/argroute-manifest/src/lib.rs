//! Serializable description of a command tree.
//!
//! A manifest is a JSON document (kebab-case keys) that mirrors
//! [`argroute::Command`] and [`argroute::FlagDef`], with flag parsers named by
//! their type tag (`bool`, `[]string`, ...).

use argroute::flagtypes::parser_for_type;
use argroute::{Command, FlagDef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest `schema-version` this crate understands.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("flag {flag:?} has unknown type {flag_type:?}")]
    UnknownFlagType { flag: String, flag_type: String },

    #[error("unsupported schema-version {0} (expected {max})", max = SCHEMA_VERSION)]
    UnsupportedSchema(u32),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TreeManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    pub root: CommandSpec,
}

impl TreeManifest {
    pub fn new(root: CommandSpec) -> Self {
        Self {
            schema_version: Some(SCHEMA_VERSION),
            root,
        }
    }

    /// Parse and validate a manifest.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        match manifest.schema_version {
            Some(version) if version != SCHEMA_VERSION => {
                Err(ManifestError::UnsupportedSchema(version))
            }
            _ => Ok(manifest),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the runtime tree.
    pub fn to_command(&self) -> Result<Command, ManifestError> {
        self.root.to_command()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub args_accepted: bool,
    #[serde(default)]
    pub allow_unknown_flags: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    pub fn to_command(&self) -> Result<Command, ManifestError> {
        Ok(Command {
            name: self.name.clone(),
            aliases: self.aliases.clone(),
            description: self.description.clone(),
            hidden: self.hidden,
            flags: self
                .flags
                .iter()
                .map(FlagSpec::to_flag_def)
                .collect::<Result<_, _>>()?,
            subcommands: self
                .subcommands
                .iter()
                .map(CommandSpec::to_command)
                .collect::<Result<_, _>>()?,
            handler: None,
            args_accepted: self.args_accepted,
            allow_unknown_flags: self.allow_unknown_flags,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FlagSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Type tag of a built-in parser.
    #[serde(rename = "type")]
    pub flag_type: String,
    /// Defaults to `true` for every type but `bool`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_accepted: Option<bool>,
    #[serde(default)]
    pub only_after_command_name: bool,
}

impl FlagSpec {
    pub fn value_accepted(&self) -> bool {
        self.value_accepted.unwrap_or(self.flag_type != "bool")
    }

    pub fn to_flag_def(&self) -> Result<FlagDef, ManifestError> {
        let parser =
            parser_for_type(&self.flag_type).ok_or_else(|| ManifestError::UnknownFlagType {
                flag: self.name.clone(),
                flag_type: self.flag_type.clone(),
            })?;
        let mut def = FlagDef::with_parser(self.name.clone(), parser)
            .description(self.description.clone())
            .value_accepted(self.value_accepted())
            .only_after_command_name(self.only_after_command_name);
        def.aliases = self.aliases.clone();
        Ok(def)
    }
}
