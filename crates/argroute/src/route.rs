//! Descending the command tree one level at a time.

use indexmap::IndexMap;

use crate::command::Command;
use crate::error::{ExtraInputError, RouteError};
use crate::flag::FlagValue;
use crate::namespace::FlagNamespace;
use crate::parse::parse_level;

/// The command selected by [`route`], with everything bound on the way down.
#[derive(Debug, Clone)]
pub struct Routed<'a> {
    root: &'a Command,
    path: Vec<&'a Command>,
    flags: IndexMap<String, FlagValue>,
    args: Vec<String>,
}

impl<'a> Routed<'a> {
    /// Deepest matched command; the root when no subcommand was named.
    pub fn command(&self) -> &'a Command {
        self.path.last().copied().unwrap_or(self.root)
    }

    pub fn root(&self) -> &'a Command {
        self.root
    }

    /// Matched subcommands, outermost first. Does not include the root.
    pub fn path(&self) -> &[&'a Command] {
        &self.path
    }

    /// Names of the root and every matched subcommand.
    pub fn command_names(&self) -> Vec<String> {
        std::iter::once(self.root)
            .chain(self.path.iter().copied())
            .map(|cmd| cmd.name.clone())
            .collect()
    }

    /// Flags from every level, keyed by canonical name.
    pub fn flags(&self) -> &IndexMap<String, FlagValue> {
        &self.flags
    }

    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Positional arguments from every level, in input order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn into_parts(self) -> (&'a Command, IndexMap<String, FlagValue>, Vec<String>) {
        let command = self.command();
        (command, self.flags, self.args)
    }
}

/// Route `tokens` through the tree rooted at `root`.
///
/// Each level is parsed against its own flag namespace; once a subcommand is
/// named, the remaining tokens are parsed in its context. A flag bound at a
/// deeper level replaces one of the same name bound above it.
pub fn route<'a>(root: &'a Command, tokens: &[String]) -> Result<Routed<'a>, RouteError> {
    let mut routed = Routed {
        root,
        path: Vec::new(),
        flags: IndexMap::new(),
        args: Vec::new(),
    };
    let mut current = root;
    let mut remaining = tokens;

    loop {
        let namespace = FlagNamespace::build(current, true)?;
        let parsed = parse_level(current, remaining, &namespace)?;
        tracing::debug!(
            command = %current.name,
            flags = parsed.flags.len(),
            args = parsed.args.len(),
            "parsed level"
        );
        routed.flags.extend(parsed.flags);
        routed.args.extend(parsed.args);

        match parsed.matched {
            Some(child) => {
                routed.path.push(child);
                current = child;
                remaining = parsed.unconsumed;
            }
            None if parsed.unconsumed.is_empty() => return Ok(routed),
            None => {
                return Err(ExtraInputError {
                    command_path: routed.command_names(),
                    flags: routed.flags,
                    args: routed.args,
                    extra_input: parsed.unconsumed.to_vec(),
                }
                .into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FlagDef;
    use crate::error::ErrorKind;
    use crate::flagtypes::{BoolParser, StringListParser, StringParser};

    fn tokens(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    fn tree() -> Command {
        Command::new("app")
            .flag(FlagDef::new("verbose", BoolParser).alias("v"))
            .subcommand(Command::new("help"))
            .subcommand(
                Command::new("foo")
                    .subcommand(
                        Command::new("bar")
                            .flag(
                                FlagDef::new("quux", StringParser)
                                    .value_accepted(true)
                                    .only_after_command_name(true),
                            )
                            .args_accepted(true),
                    )
                    .subcommand(
                        Command::new("baaz").flag(
                            FlagDef::new("name", StringListParser::default())
                                .value_accepted(true),
                        ),
                    ),
            )
            .subcommand(Command::new("Remote").alias("r").args_accepted(true).subcommand(
                Command::new("add").args_accepted(true),
            ))
    }

    #[test]
    fn routes_to_nested_command_with_restricted_flag() {
        let root = tree();
        let input = tokens(&["foo", "bar", "--quux", "hello", "tail"]);
        let routed = route(&root, &input).unwrap();
        assert_eq!(routed.command().name, "bar");
        assert_eq!(routed.root().name, "app");
        assert_eq!(routed.command_names(), vec!["app", "foo", "bar"]);
        assert_eq!(routed.flag("quux").and_then(|f| f.value().as_str()), Some("hello"));
        assert_eq!(routed.args(), &["tail".to_string()]);
    }

    #[test]
    fn restricted_flag_before_its_command_is_unknown() {
        let root = tree();
        let input = tokens(&["foo", "--quux", "hello", "bar"]);
        let err = route(&root, &input).unwrap_err();
        assert!(matches!(err, RouteError::UnknownFlag { ref flag, ref command } if flag == "quux" && command == "foo"));
    }

    #[test]
    fn unrestricted_descendant_flag_is_accepted_early() {
        let root = tree();
        let input = tokens(&["--name=early", "foo", "baaz", "--name", "bar"]);
        let routed = route(&root, &input).unwrap();
        assert_eq!(routed.command().name, "baaz");
        // Later levels replace what earlier levels bound.
        assert_eq!(
            routed.flag("name").and_then(|f| f.value().as_string_list()),
            Some(&["bar".to_string()][..])
        );
    }

    #[test]
    fn repeated_flag_accumulates_within_a_level() {
        let root = tree();
        let input = tokens(&["foo", "baaz", "--name", "foo", "--name", "bar", "--name=baaz"]);
        let routed = route(&root, &input).unwrap();
        let flag = routed.flag("name").unwrap();
        assert_eq!(
            flag.value().as_string_list().unwrap(),
            &["foo".to_string(), "bar".to_string(), "baaz".to_string()]
        );
    }

    #[test]
    fn global_flag_merges_with_deeper_levels() {
        let root = tree();
        let input = tokens(&["--V", "foo", "bar", "--quux=x"]);
        let routed = route(&root, &input).unwrap();
        assert_eq!(routed.flag("verbose").and_then(|f| f.value().as_bool()), Some(true));
        assert_eq!(routed.flag("verbose").map(|f| f.name()), Some("v"));
        assert_eq!(routed.flags().len(), 2);
    }

    #[test]
    fn open_flag_is_closed_by_a_subcommand_name() {
        let root = tree();
        let input = tokens(&["--name", "foo", "baaz"]);
        let routed = route(&root, &input).unwrap();
        assert_eq!(routed.command().name, "baaz");
        assert_eq!(routed.flag("name").map(|f| f.raw_value()), Some(""));
    }

    #[test]
    fn subcommands_match_case_insensitively_and_by_alias() {
        let root = tree();
        for input in [["remote"], ["REMOTE"], ["r"]] {
            let input = tokens(&input);
            let routed = route(&root, &input).unwrap();
            assert_eq!(routed.command().name, "Remote");
        }
    }

    #[test]
    fn greedy_child_match_wins_over_parent_args() {
        let root = tree();
        let input = tokens(&["remote", "add", "extra"]);
        let routed = route(&root, &input).unwrap();
        assert_eq!(routed.command().name, "add");
        assert_eq!(routed.args(), &["extra".to_string()]);

        let input = tokens(&["remote", "origin", "add"]);
        let routed = route(&root, &input).unwrap();
        assert_eq!(routed.command().name, "add");
        assert_eq!(routed.args(), &["origin".to_string()]);
    }

    #[test]
    fn extra_input_on_leaf() {
        let root = tree();
        let input = tokens(&["help", "surplus"]);
        let err = route(&root, &input).unwrap_err();
        match err {
            RouteError::ExtraInput(extra) => {
                assert_eq!(extra.command_path, vec!["app", "help"]);
                assert_eq!(extra.extra_input, vec!["surplus"]);
                assert_eq!(extra.to_string(), "unexpected extra input to app help: surplus");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_input_keeps_what_was_bound() {
        let root = tree();
        let input = tokens(&["--verbose", "help", "a", "b"]);
        let err = route(&root, &input).unwrap_err();
        let RouteError::ExtraInput(extra) = err else {
            panic!("expected extra input");
        };
        assert!(extra.flags.contains_key("verbose"));
        assert_eq!(extra.extra_input, vec!["a", "b"]);
    }

    #[test]
    fn unexpected_argument_at_branch() {
        let root = tree();
        let input = tokens(&["nope"]);
        let err = route(&root, &input).unwrap_err();
        assert!(matches!(err, RouteError::UnexpectedArgument { ref arg, ref command } if arg == "nope" && command == "app"));
    }

    #[test]
    fn duplicate_flags_fail_even_without_tokens() {
        let root = tree().flag(FlagDef::new("QUUX", BoolParser));
        // `quux` is restricted to `bar`, so the root level is fine.
        assert!(route(&root, &[]).is_ok());

        let root = tree().subcommand(Command::new("other").flag(FlagDef::new("Verbose", BoolParser)));
        let err = route(&root, &[]).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateFlagName(ref n) if n == "verbose"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn no_tokens_selects_root() {
        let root = tree();
        let routed = route(&root, &[]).unwrap();
        assert_eq!(routed.command().name, "app");
        assert!(routed.path().is_empty());
        assert!(routed.flags().is_empty());
    }
}
