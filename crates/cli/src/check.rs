use argroute::{Command, FlagNamespace};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub manifest: String,
    /// Number of commands checked, root included.
    pub commands: usize,
    pub conflicts: Vec<Conflict>,
}

/// Flag keys claimed more than once while `command` is being parsed.
#[derive(Debug, Serialize)]
pub struct Conflict {
    pub command: Vec<String>,
    pub duplicates: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Build the flag namespace of every command in the tree, as the active
/// level, and collect every duplicate key.
pub fn check_tree(root: &Command, manifest: &str) -> CheckReport {
    let mut conflicts = Vec::new();
    let mut commands = 0;
    let mut stack = vec![(root, vec![root.name.clone()])];

    while let Some((command, path)) = stack.pop() {
        commands += 1;
        let duplicates = FlagNamespace::duplicates(command, true);
        if !duplicates.is_empty() {
            tracing::debug!(command = %path.join(" "), count = duplicates.len(), "duplicate flags");
            conflicts.push(Conflict {
                command: path.clone(),
                duplicates,
            });
        }
        for sub in command.subcommands.iter().rev() {
            let mut sub_path = path.clone();
            sub_path.push(sub.name.clone());
            stack.push((sub, sub_path));
        }
    }

    CheckReport {
        manifest: manifest.to_string(),
        commands,
        conflicts,
    }
}
