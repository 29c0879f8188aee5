//! Flattened, case-insensitive view of the flags visible while one command is
//! being parsed.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::command::{Command, FlagDef};
use crate::error::RouteError;

/// Lower-cased flag name/alias → definition, for one tree level.
///
/// Holds every flag owned by the active command, plus every unrestricted flag
/// owned by any of its descendants. Built fresh for each level, because which
/// restricted flags are visible depends on the active command.
#[derive(Debug, Clone, Default)]
pub struct FlagNamespace<'a> {
    defs: HashMap<String, &'a FlagDef>,
}

impl<'a> FlagNamespace<'a> {
    /// Build the namespace for `command`.
    ///
    /// `active` marks `command` as the node being parsed, making its
    /// restricted flags visible. Fails on the first name or alias that two
    /// visible flags share.
    pub fn build(command: &'a Command, active: bool) -> Result<Self, RouteError> {
        let (defs, duplicates) = index(&visible_flag_defs(command, active));
        if let Some(name) = duplicates.into_iter().next() {
            return Err(RouteError::DuplicateFlagName(name));
        }
        Ok(Self { defs })
    }

    /// Every lower-cased key claimed by more than one visible flag, in the
    /// order the collisions were found. Empty when [`build`](Self::build)
    /// would succeed.
    pub fn duplicates(command: &Command, active: bool) -> Vec<String> {
        index(&visible_flag_defs(command, active)).1
    }

    /// Look up a flag by its lower-cased name or alias.
    pub fn get(&self, key: &str) -> Option<&'a FlagDef> {
        self.defs.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defs.contains_key(key)
    }

    /// Number of keys (names plus aliases).
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Sorted keys, for diagnostics.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.defs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Flags of `command` (all of them if `active`, else only unrestricted ones)
/// followed by the unrestricted flags of every descendant, depth first.
pub fn visible_flag_defs(command: &Command, active: bool) -> Vec<&FlagDef> {
    let mut out = Vec::new();
    collect(command, active, &mut out);
    out
}

fn collect<'a>(command: &'a Command, active: bool, out: &mut Vec<&'a FlagDef>) {
    out.extend(
        command
            .flags
            .iter()
            .filter(|flag| active || !flag.only_after_command_name),
    );
    for sub in &command.subcommands {
        collect(sub, false, out);
    }
}

fn index<'a>(defs: &[&'a FlagDef]) -> (HashMap<String, &'a FlagDef>, Vec<String>) {
    let mut map = HashMap::with_capacity(defs.len());
    let mut duplicates = Vec::new();
    for &def in defs {
        for key in std::iter::once(&def.name).chain(def.aliases.iter()) {
            match map.entry(key.to_lowercase()) {
                Entry::Occupied(entry) => duplicates.push(entry.key().clone()),
                Entry::Vacant(entry) => {
                    entry.insert(def);
                }
            }
        }
    }
    (map, duplicates)
}
