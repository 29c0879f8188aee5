//! Routing command-line tokens through a tree of commands.
//!
//! A [`Command`] tree describes the subcommands, flags and positional
//! arguments a program accepts. [`route`] walks the input one level at a
//! time: at each level every token is classified as a flag, a flag value, the
//! name of a child command or a positional argument, and the tokens after a
//! child's name are handed to that child. Flags are matched
//! case-insensitively, by name or alias, and are converted to typed
//! [`Value`]s by their [`FlagParser`].
//!
//! [`Application`] adds the last step: running the selected command's
//! handler and turning the outcome into an exit code.

pub mod app;
pub mod command;
pub mod error;
pub mod flag;
pub mod flagtypes;
pub mod help;
pub mod namespace;
pub mod parse;
pub mod route;

pub use app::{Application, FnHandler, Handler, HandlerBuilder, Invocation, Response, handler_fn};
pub use command::{Command, FlagDef};
pub use error::{ErrorKind, ExtraInputError, RouteError};
pub use flag::{ConvertError, FlagParser, FlagValue, ParseContext, Value};
pub use namespace::FlagNamespace;
pub use route::{Routed, route};
