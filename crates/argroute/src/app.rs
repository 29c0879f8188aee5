//! Running a routed command's handler.

use std::error::Error;
use std::io::{self, Write};

use indexmap::IndexMap;

use crate::command::Command;
use crate::error::RouteError;
use crate::flag::FlagValue;
use crate::route::{Routed, route};

/// Where a handler writes its output, and the exit code it settles on.
pub struct Response<'w> {
    pub code: i32,
    pub output: &'w mut dyn Write,
    pub error: &'w mut dyn Write,
}

/// Everything routing bound for the selected command.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Names of the root and every matched subcommand.
    pub command_path: Vec<String>,
    pub flags: IndexMap<String, FlagValue>,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }
}

pub trait Handler {
    fn handle(&self, resp: &mut Response<'_>);
}

/// Turns an [`Invocation`] into a runnable [`Handler`].
///
/// Setting a non-zero `resp.code` while building (for example because a
/// required argument is missing) stops the run before the handler executes.
pub trait HandlerBuilder: Send + Sync {
    fn build(&self, invocation: Invocation, resp: &mut Response<'_>) -> Box<dyn Handler + '_>;
}

/// A [`HandlerBuilder`] that calls `f` with the invocation.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Invocation, &mut Response<'_>) + Send + Sync,
{
    FnHandler(f)
}

pub struct FnHandler<F>(F);

struct BoundFn<'f, F> {
    f: &'f F,
    invocation: Invocation,
}

impl<F> HandlerBuilder for FnHandler<F>
where
    F: Fn(&Invocation, &mut Response<'_>) + Send + Sync,
{
    fn build(&self, invocation: Invocation, _resp: &mut Response<'_>) -> Box<dyn Handler + '_> {
        Box::new(BoundFn {
            f: &self.0,
            invocation,
        })
    }
}

impl<F> Handler for BoundFn<'_, F>
where
    F: Fn(&Invocation, &mut Response<'_>),
{
    fn handle(&self, resp: &mut Response<'_>) {
        (self.f)(&self.invocation, resp)
    }
}

/// A command tree ready to be run against user input.
#[derive(Debug, Clone)]
pub struct Application {
    root: Command,
}

impl Application {
    pub fn new(root: Command) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn route(&self, args: &[String]) -> Result<Routed<'_>, RouteError> {
        route(&self.root, args)
    }

    /// Route `args` and run the selected command's handler, returning the exit
    /// code.
    ///
    /// Routing errors and commands without a handler are reported on `error`
    /// and exit with 1.
    pub fn run(&self, args: &[String], output: &mut dyn Write, error: &mut dyn Write) -> i32 {
        let mut resp = Response {
            code: 0,
            output,
            error,
        };

        let routed = match self.route(args) {
            Ok(routed) => routed,
            Err(err) => {
                let _ = writeln!(resp.error, "{}", error_chain(&err));
                return 1;
            }
        };

        let command_path = routed.command_names();
        let (command, flags, args_out) = routed.into_parts();
        let Some(builder) = command.handler.as_ref() else {
            let _ = writeln!(resp.error, "invalid command: {}", args.join(" "));
            return 1;
        };

        tracing::debug!(command = %command_path.join(" "), "running handler");
        let invocation = Invocation {
            command_path,
            flags,
            args: args_out,
        };
        let handler = builder.build(invocation, &mut resp);
        if resp.code != 0 {
            return resp.code;
        }
        handler.handle(&mut resp);
        resp.code
    }

    /// [`run`](Self::run) with the process arguments (minus the program
    /// name), stdout and stderr.
    pub fn run_env(&self) -> i32 {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let stdout = io::stdout();
        let stderr = io::stderr();
        let mut output = stdout.lock();
        let mut error = stderr.lock();
        let code = self.run(&args, &mut output, &mut error);
        let _ = output.flush();
        code
    }
}

/// `err` followed by each of its sources, separated by `": "`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
