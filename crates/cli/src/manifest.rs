use anyhow::{Context, Result, bail};
use argroute_manifest::{CommandSpec, FlagSpec, TreeManifest};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "argroute.json";

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: TreeManifest,
}

/// Load the manifest at `manifest_path`, or `argroute.json` in the current
/// directory.
pub fn load_manifest(manifest_path: Option<&Path>) -> Result<LoadedManifest> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let path = match manifest_path {
        Some(p) => resolve_against(&cwd, p),
        None => cwd.join(DEFAULT_MANIFEST_NAME),
    };

    if !path.exists() {
        if manifest_path.is_some() {
            bail!("manifest not found: {}", path.display());
        }
        bail!(
            "no {DEFAULT_MANIFEST_NAME} in {} (run `argroute init` or pass --manifest)",
            cwd.display()
        );
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let manifest = TreeManifest::from_json(&contents)
        .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded manifest");
    Ok(LoadedManifest { path, manifest })
}

/// Write a sample manifest into `project_dir`. An existing file is left alone
/// unless `overwrite` is set; returns the path either way.
pub fn write_default_manifest(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        return Ok(dest);
    }

    let project_name = guess_project_name(project_dir).unwrap_or_else(|| "my-cli".to_string());
    let manifest = default_manifest(&project_name);

    let mut out = manifest
        .to_json_pretty()
        .context("failed to serialize manifest")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn default_manifest(project_name: &str) -> TreeManifest {
    let flag = |name: &str, flag_type: &str| FlagSpec {
        name: name.to_string(),
        flag_type: flag_type.to_string(),
        ..Default::default()
    };

    TreeManifest::new(CommandSpec {
        name: project_name.to_string(),
        description: format!("{project_name} command line"),
        flags: vec![FlagSpec {
            aliases: vec!["v".to_string()],
            description: "Print more output".to_string(),
            ..flag("verbose", "bool")
        }],
        subcommands: vec![
            CommandSpec {
                name: "help".to_string(),
                description: "Show help".to_string(),
                ..Default::default()
            },
            CommandSpec {
                name: "remote".to_string(),
                aliases: vec!["r".to_string()],
                description: "Manage remotes".to_string(),
                subcommands: vec![CommandSpec {
                    name: "add".to_string(),
                    description: "Add a remote".to_string(),
                    args_accepted: true,
                    flags: vec![
                        FlagSpec {
                            description: "Tag to attach (repeatable)".to_string(),
                            ..flag("tag", "[]string")
                        },
                        FlagSpec {
                            description: "Connection timeout".to_string(),
                            only_after_command_name: true,
                            ..flag("timeout", "duration")
                        },
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            },
        ],
        ..Default::default()
    })
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn guess_project_name(project_dir: &Path) -> Option<String> {
    // For `.` or other non-meaningful paths, try the current directory name.
    let file_name = project_dir.file_name().and_then(|s| s.to_str());
    let direct = file_name.filter(|s| !s.is_empty() && *s != "." && *s != "..");
    if let Some(name) = direct {
        return Some(name.to_string());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
}
