mod check;
mod manifest;
mod report;

use anyhow::{Context, Result, bail};
use argroute::Command;
use clap::{Parser, Subcommand};
use std::{fs, path::PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{DEFAULT_MANIFEST_NAME, LoadedManifest};
use crate::report::RouteReport;

#[derive(Parser)]
#[command(name = "argroute")]
#[command(
    version,
    about = "Route command-line tokens through a command tree",
    long_about = None,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample argroute.json manifest
    Init(InitArgs),

    /// Route tokens through the manifest's command tree
    Route(RouteArgs),

    /// Check the manifest for conflicting flag names
    Check(CheckArgs),

    /// Show help for a command in the manifest's tree
    Help(HelpArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing manifest
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct RouteArgs {
    /// Path to the manifest (default: ./argroute.json)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Only output JSON
    #[arg(long)]
    json: bool,

    /// Tokens to route, after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the manifest (default: ./argroute.json)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Only output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct HelpArgs {
    /// Path to the manifest (default: ./argroute.json)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Command names (or aliases) leading to the command to describe
    #[arg(value_name = "PATH")]
    path: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Route(args) => route_command(args),
        Commands::Check(args) => check_command(args),
        Commands::Help(args) => help_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    // Create directory if it doesn't exist
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    if dir.join(DEFAULT_MANIFEST_NAME).exists() && !args.force {
        bail!(
            "{DEFAULT_MANIFEST_NAME} already exists in {} (use --force to replace it)",
            dir.display()
        );
    }

    let manifest_path = manifest::write_default_manifest(&dir, args.force)?;

    eprintln!("Created: {}", manifest_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to describe your command tree");
    eprintln!("  2. Run: argroute check");
    eprintln!("  3. Run: argroute route -- remote add --tag demo origin");

    Ok(())
}

fn load_tree(path: Option<&std::path::Path>) -> Result<(LoadedManifest, Command)> {
    let loaded = manifest::load_manifest(path)?;
    let root = loaded
        .manifest
        .to_command()
        .with_context(|| format!("invalid manifest: {}", loaded.path.display()))?;
    Ok((loaded, root))
}

fn route_command(args: RouteArgs) -> Result<()> {
    tracing::debug!("executing route command");

    let (_, root) = load_tree(args.manifest.as_deref())?;
    let routed = match argroute::route(&root, &args.tokens) {
        Ok(routed) => routed,
        Err(err) if args.json => {
            println!("{}", serde_json::to_string_pretty(&report::error_json(&err))?);
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("failed to route input"),
    };

    let report = RouteReport::from_routed(&routed);
    if args.json {
        let out = serde_json::json!({
            "ok": true,
            "command": report.command,
            "flags": report.flags,
            "args": report.args,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let (loaded, root) = load_tree(args.manifest.as_deref())?;
    let report = check::check_tree(&root, &loaded.path.display().to_string());

    if args.json {
        // JSON-only output
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !report.is_ok() {
            std::process::exit(1);
        }
        return Ok(());
    }

    eprintln!("Manifest: {}", report.manifest);
    eprintln!("Commands: {}", report.commands);
    if report.is_ok() {
        eprintln!("OK: no conflicting flag names");
        return Ok(());
    }

    eprintln!();
    eprintln!("Found conflicting flag names:");
    for conflict in &report.conflicts {
        eprintln!(
            "  {}: {}",
            conflict.command.join(" "),
            conflict.duplicates.join(", ")
        );
    }
    eprintln!();
    bail!("manifest has conflicting flag names");
}

fn help_command(args: HelpArgs) -> Result<()> {
    tracing::debug!("executing help command");

    let (_, root) = load_tree(args.manifest.as_deref())?;
    let mut names = vec![root.name.clone()];
    let mut command = &root;
    for name in &args.path {
        let Some(sub) = command.find_subcommand(name) else {
            bail!("no command {name:?} under `{}`", names.join(" "));
        };
        names.push(sub.name.clone());
        command = sub;
    }

    print!("{}", argroute::help::command_help(command, &names));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
