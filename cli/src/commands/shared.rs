//! # Shared Command Plumbing
//!
//! File: cli/src/commands/shared.rs
//!
//! ## Overview
//!
//! `stencil generate` and `stencil destroy` take the same arguments and need
//! the same setup before the blueprint engine runs:
//!
//! 1. find the project root (nearest ancestor with `package.json` or
//!    `.stencil.toml`, else the current directory),
//! 2. load configuration,
//! 3. build the blueprint registry and resolve the blueprint,
//! 4. turn flags and config defaults into `InstallOptions`.
//!
use crate::core::blueprint::registry::BlueprintRegistry;
use crate::core::blueprint::{Blueprint, InstallOptions};
use crate::core::config::{self, Config};
use crate::core::error::Result;
use anyhow::{anyhow, Context};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files that mark the root of a project.
const PROJECT_MARKERS: [&str; 2] = ["package.json", ".stencil.toml"];

/// Arguments shared by `generate` and `destroy`.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Blueprint to run (e.g. `module`, `in-repo-addon`).
    pub blueprint: String,

    /// Name of the entity (e.g. `foo-bar`, `blog/post`).
    pub name: String,

    /// Use the pod layout (`<pod_path>/<name>/<blueprint>.js`).
    #[arg(long, short = 'p')]
    pub pod: bool,

    /// Print what would happen without touching any file.
    #[arg(long, short = 'd')]
    pub dry_run: bool,

    /// Target the in-repo addon `lib/<ADDON>` instead of the app.
    #[arg(long, value_name = "ADDON")]
    pub in_repo_addon: Option<String>,

    /// Target the dummy app under `tests/dummy`.
    #[arg(long, conflicts_with = "in_repo_addon")]
    pub dummy: bool,

    /// Extra directory to look for blueprints in (searched before the built-ins).
    #[arg(long = "lookup-path", value_name = "DIR", action = clap::ArgAction::Append)]
    pub lookup_paths: Vec<PathBuf>,

    /// Template variable override. Example: `--var author="Jane Doe"`.
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val, action = clap::ArgAction::Append)]
    pub vars: Vec<(String, String)>,
}

/// Parses `KEY=VALUE`; surrounding whitespace is trimmed.
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| anyhow!("Invalid variable format: '{}'. Expected format: KEY=VALUE", s))?;
    if key.is_empty() {
        return Err(anyhow!("Invalid variable format: '{}'. The key is empty", s));
    }
    Ok((key, value))
}

/// Nearest ancestor of `start` (inclusive) holding a project marker, else `start`.
pub fn find_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if PROJECT_MARKERS.iter().any(|marker| dir.join(marker).is_file()) {
            debug!("Project root: {}", dir.display());
            return dir.to_path_buf();
        }
    }
    debug!("No project marker found, using {}", start.display());
    start.to_path_buf()
}

/// Everything a generate/destroy run needs.
pub struct PreparedRun {
    pub project_root: PathBuf,
    pub blueprint: Blueprint,
    pub options: InstallOptions,
}

/// The project root for the current directory, its configuration and registry.
pub fn load_registry(lookup_paths: &[PathBuf]) -> Result<(PathBuf, Config, BlueprintRegistry)> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let project_root = find_project_root(&cwd);
    let config = config::load_config_from(&project_root).context("Failed to load stencil configuration")?;
    let registry = BlueprintRegistry::from_config(&project_root, &config, lookup_paths);
    Ok((project_root, config, registry))
}

/// Resolves the project, configuration and blueprint for `args`.
pub fn prepare_run(args: &TargetArgs) -> Result<PreparedRun> {
    let (project_root, config, registry) = load_registry(&args.lookup_paths)?;
    let blueprint = registry.lookup(&args.blueprint)?;
    info!(
        "Using blueprint '{}' ({}) from {}",
        blueprint.name(),
        blueprint.source_label(),
        blueprint.root().display()
    );

    let options = install_options(args, &config);
    Ok(PreparedRun {
        project_root,
        blueprint,
        options,
    })
}

fn install_options(args: &TargetArgs, config: &Config) -> InstallOptions {
    InstallOptions {
        pod: args.pod || config.generate.pod(),
        pod_path: config.generate.pod_path.clone(),
        in_repo_addon: args.in_repo_addon.clone(),
        dummy: args.dummy,
        dry_run: args.dry_run,
        update: false,
        vars: args.vars.clone(),
        ignored_files: config.generate.ignored_files.clone(),
    }
}

/// Prints the dry-run banner. Status lines follow on stdout.
pub fn announce_dry_run(options: &InstallOptions) {
    if options.dry_run {
        println!("You specified the dry-run flag, so no changes will be written.");
    }
}
