//! Plain-text help for a command's subcommands and flags.

use crate::command::Command;

/// One row per visible subcommand: name and description.
pub fn subcommands_help(command: &Command) -> String {
    let rows: Vec<Vec<String>> = command
        .subcommands
        .iter()
        .filter(|sub| !sub.hidden)
        .map(|sub| vec![sub.name.clone(), sub.description.clone()])
        .collect();
    render_rows(&rows)
}

/// One row per flag owned by `command`: `--name`, `<type>` and description.
pub fn flags_help(command: &Command) -> String {
    let rows: Vec<Vec<String>> = command
        .flags
        .iter()
        .map(|flag| {
            vec![
                format!("--{}", flag.name),
                format!("<{}>", flag.parser.flag_type()),
                flag.description.clone(),
            ]
        })
        .collect();
    render_rows(&rows)
}

/// Full help page for `command`, reached from the root through `path`.
pub fn command_help(command: &Command, path: &[String]) -> String {
    let mut out = String::new();
    let usage = path.join(" ");
    if command.description.trim().is_empty() {
        out.push_str(&usage);
        out.push('\n');
    } else {
        out.push_str(&format!("{} - {}\n", usage, command.description.trim()));
    }

    let mut usage_line = format!("\nUsage: {usage}");
    if !command.flags.is_empty() {
        usage_line.push_str(" [FLAGS]");
    }
    if command.subcommands.iter().any(|sub| !sub.hidden) {
        usage_line.push_str(" <COMMAND>");
    }
    if command.args_accepted {
        usage_line.push_str(" [ARGS]...");
    }
    out.push_str(&usage_line);
    out.push('\n');

    let commands = subcommands_help(command);
    if !commands.is_empty() {
        out.push_str("\nCommands:\n");
        out.push_str(&commands);
    }

    let flags = flags_help(command);
    if !flags.is_empty() {
        out.push_str("\nFlags:\n");
        out.push_str(&flags);
    }
    out
}

/// Left-align every column but the last to its widest cell.
fn render_rows(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns.saturating_sub(1))
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let mut line = String::from("  ");
        for (col, cell) in row.iter().enumerate() {
            match widths.get(col) {
                Some(&width) => line.push_str(&format!("{cell:width$}  ")),
                None => line.push_str(cell),
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FlagDef;
    use crate::flagtypes::{BoolParser, DurationParser, StringListParser};

    fn tree() -> Command {
        Command::new("app")
            .description("Demo application")
            .flag(FlagDef::new("verbose", BoolParser).alias("v").description("Print more"))
            .flag(
                FlagDef::new("timeout", DurationParser)
                    .value_accepted(true)
                    .description("How long to wait"),
            )
            .flag(FlagDef::new("tag", StringListParser::default()).value_accepted(true))
            .subcommand(Command::new("status").alias("st").description("Show status"))
            .subcommand(Command::new("remote").description("Manage remotes"))
            .subcommand(Command::new("debug").hidden(true).description("Internal"))
    }

    #[test]
    fn subcommands_are_aligned_and_hidden_skipped() {
        let help = subcommands_help(&tree());
        assert_eq!(help, "  status  Show status\n  remote  Manage remotes\n");
    }

    #[test]
    fn flags_show_type_tags() {
        let help = flags_help(&tree());
        assert_eq!(
            help,
            concat!(
                "  --verbose  <bool>      Print more\n",
                "  --timeout  <duration>  How long to wait\n",
                "  --tag      <[]string>\n",
            )
        );
    }

    #[test]
    fn empty_command_renders_nothing() {
        let cmd = Command::new("bare");
        assert_eq!(subcommands_help(&cmd), "");
        assert_eq!(flags_help(&cmd), "");
    }

    #[test]
    fn command_help_sections() {
        let root = tree();
        let help = command_help(&root, &["app".to_string()]);
        assert!(help.starts_with("app - Demo application\n"));
        assert!(help.contains("\nUsage: app [FLAGS] <COMMAND>\n"));
        assert!(help.contains("\nCommands:\n  status"));
        assert!(help.contains("\nFlags:\n  --verbose"));
        assert!(!help.contains("debug"));
    }
}
