//! Token disambiguation for a single level of the command tree.

use indexmap::IndexMap;

use crate::command::{Command, FlagDef};
use crate::error::RouteError;
use crate::flag::{FlagValue, ParseContext};
use crate::namespace::FlagNamespace;

const FLAG_MARKER: &str = "--";

/// Outcome of parsing one command's token window.
#[derive(Debug)]
pub struct ParsedLevel<'a, 't> {
    /// Child command named by one of the tokens, if any.
    pub matched: Option<&'a Command>,
    /// Flags bound at this level, keyed by canonical flag name.
    pub flags: IndexMap<String, FlagValue>,
    pub args: Vec<String>,
    /// Tokens after the matched child's name, or the leftover input of a leaf
    /// command that takes no arguments. Empty when everything was consumed.
    pub unconsumed: &'t [String],
}

enum State<'a> {
    Scanning,
    /// A value-accepting flag was named without an inline value.
    AwaitingValue { def: &'a FlagDef, name: String },
}

/// Classify `tokens` as flags, flag values, a subcommand name or positional
/// arguments of `command`.
///
/// Scanning stops at the first token naming a child of `command`. A flag
/// still waiting for a value when it is closed (by another flag, a
/// subcommand, or the end of input) is converted with an empty value.
pub fn parse_level<'a, 't>(
    command: &'a Command,
    tokens: &'t [String],
    namespace: &FlagNamespace<'a>,
) -> Result<ParsedLevel<'a, 't>, RouteError> {
    let ctx = ParseContext::new(command);
    let mut flags = IndexMap::new();
    let mut args = Vec::new();
    let mut state = State::Scanning;

    for (pos, token) in tokens.iter().enumerate() {
        if let Some(rest) = token.strip_prefix(FLAG_MARKER) {
            let (arg_name, value) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (rest, None),
            };
            let arg_name = arg_name.to_lowercase();

            match namespace.get(&arg_name) {
                Some(def) => {
                    close_open_flag(&ctx, &mut state, &mut flags)?;
                    match (def.value_accepted, value) {
                        (false, Some(value)) => {
                            return Err(RouteError::UnexpectedFlagValue {
                                flag: arg_name,
                                value: value.to_string(),
                            });
                        }
                        (false, None) => bind(&ctx, def, &arg_name, "", &mut flags)?,
                        (true, Some(value)) => bind(&ctx, def, &arg_name, value, &mut flags)?,
                        (true, None) => {
                            tracing::trace!(flag = %arg_name, "awaiting flag value");
                            state = State::AwaitingValue {
                                def,
                                name: arg_name,
                            };
                        }
                    }
                    continue;
                }
                None if !command.allow_unknown_flags => {
                    return Err(RouteError::UnknownFlag {
                        flag: arg_name,
                        command: command.name.clone(),
                    });
                }
                None => {
                    tracing::trace!(%token, "unknown flag treated as plain token");
                }
            }
        }

        if let Some(child) = command.find_subcommand(token) {
            close_open_flag(&ctx, &mut state, &mut flags)?;
            tracing::trace!(command = %child.name, "matched subcommand");
            return Ok(ParsedLevel {
                matched: Some(child),
                flags,
                args,
                unconsumed: &tokens[pos + 1..],
            });
        }

        let last = pos + 1 == tokens.len();
        state = match state {
            State::Scanning if !command.args_accepted => {
                if command.subcommands.is_empty() {
                    return Ok(ParsedLevel {
                        matched: None,
                        flags,
                        args,
                        unconsumed: &tokens[pos..],
                    });
                }
                return Err(RouteError::UnexpectedArgument {
                    arg: token.clone(),
                    command: command.name.clone(),
                });
            }
            State::Scanning => {
                args.push(token.clone());
                State::Scanning
            }
            // The final token goes to the arguments and the flag is dropped.
            State::AwaitingValue { name, .. } if command.args_accepted && last => {
                tracing::trace!(flag = %name, "trailing token taken as argument");
                args.push(token.clone());
                State::Scanning
            }
            State::AwaitingValue { def, name } => {
                bind(&ctx, def, &name, token, &mut flags)?;
                State::Scanning
            }
        };
    }

    close_open_flag(&ctx, &mut state, &mut flags)?;
    Ok(ParsedLevel {
        matched: None,
        flags,
        args,
        unconsumed: &[],
    })
}

fn close_open_flag(
    ctx: &ParseContext<'_>,
    state: &mut State<'_>,
    flags: &mut IndexMap<String, FlagValue>,
) -> Result<(), RouteError> {
    if let State::AwaitingValue { def, name } = std::mem::replace(state, State::Scanning) {
        bind(ctx, def, &name, "", flags)?;
    }
    Ok(())
}

fn bind(
    ctx: &ParseContext<'_>,
    def: &FlagDef,
    name: &str,
    value: &str,
    flags: &mut IndexMap<String, FlagValue>,
) -> Result<(), RouteError> {
    let prior = flags.get(&def.name);
    let parsed = def
        .parser
        .parse(ctx, name, value, prior)
        .map_err(|source| RouteError::Conversion {
            flag: name.to_string(),
            value: value.to_string(),
            source,
        })?;
    tracing::trace!(flag = %def.name, raw = %parsed.raw_value(), "bound flag");
    flags.insert(def.name.clone(), parsed);
    Ok(())
}
