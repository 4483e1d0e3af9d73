//! # Stencil Blueprint Info Command
//!
//! File: cli/src/commands/blueprint/info.rs
//!
//! ## Overview
//!
//! Implements `stencil blueprint info <NAME>`. Resolves the blueprint exactly as
//! `generate` would and prints:
//!
//! - where it was found and its description,
//! - the settings from `blueprint.toml` (hooks preset, pruning, locals, tokens),
//! - the files it would generate for a sample entity, as a tree relative to
//!   the project root.
//!
//! Nothing is rendered or written; only destination paths are computed.
//!
//! ## Examples
//!
//! ```bash
//! stencil blueprint info module
//! stencil blueprint info module --entity blog/post --pod
//! ```
//!
//! ```text
//! ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┓
//! ┃ Blueprint: module
//! ┣━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┫
//! ┃ Description:  A plain JavaScript module
//! ┃ Source:       built-in (/usr/local/share/stencil/blueprints/module)
//! ┃ Hooks:        default
//! ┃ Prune dirs:   yes
//! ┣--------------------------------------------------------------------┫
//! ┃ Files for 'example':
//! ┃    ./
//! ┃    └── app
//! ┃        └── modules
//! ┃            └── example.js
//! ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛
//! ```
//!
use super::tree;
use crate::commands::shared;
use crate::common::ui::stdout_supports_color;
use crate::core::blueprint::{Blueprint, InstallOptions, Target};
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use tracing::info;

const HEAVY_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const LIGHT_RULE: &str = "--------------------------------------------------------------------";

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Name of the blueprint to describe.
    pub name: String,

    /// Sample entity name used for the file preview.
    #[arg(long, default_value = "example")]
    pub entity: String,

    /// Preview the pod layout.
    #[arg(long, short = 'p')]
    pub pod: bool,

    /// Extra directory to look for blueprints in.
    #[arg(long = "lookup-path", value_name = "DIR", action = clap::ArgAction::Append)]
    pub lookup_paths: Vec<PathBuf>,
}

pub async fn handle_info(args: InfoArgs) -> Result<()> {
    info!("Handling blueprint info for '{}'", args.name);
    let (project_root, config, registry) = shared::load_registry(&args.lookup_paths)?;
    let blueprint = registry.lookup(&args.name)?;

    let options = preview_options(&args, &config);
    let target = Target {
        project_root: &project_root,
        entity_name: &args.entity,
        options: &options,
    };
    let files = blueprint
        .file_infos(&target)
        .with_context(|| format!("Failed to map the files of blueprint '{}'", blueprint.name()))?;
    let destinations: Vec<&str> = files.iter().map(|f| f.display_path()).collect();

    print!(
        "{}",
        format_info(&blueprint, &args.entity, &destinations, stdout_supports_color())
    );
    Ok(())
}

fn preview_options(args: &InfoArgs, config: &Config) -> InstallOptions {
    InstallOptions {
        pod: args.pod || config.generate.pod(),
        pod_path: config.generate.pod_path.clone(),
        ignored_files: config.generate.ignored_files.clone(),
        dry_run: true,
        ..InstallOptions::default()
    }
}

fn format_info(blueprint: &Blueprint, entity: &str, destinations: &[&str], color: bool) -> String {
    let manifest = blueprint.manifest();
    let description = if manifest.description.is_empty() {
        "[No description]"
    } else {
        manifest.description.as_str()
    };

    let mut out = String::new();
    let _ = writeln!(out, "\n┏{}┓", HEAVY_RULE);
    let _ = writeln!(out, "┃ Blueprint: {}", blueprint.name());
    let _ = writeln!(out, "┣{}┫", HEAVY_RULE);
    let _ = writeln!(out, "┃ Description:  {}", description);
    let _ = writeln!(
        out,
        "┃ Source:       {} ({})",
        blueprint.source_label(),
        blueprint.root().display()
    );
    let _ = writeln!(out, "┃ Hooks:        {}", manifest.hooks);
    let _ = writeln!(
        out,
        "┃ Prune dirs:   {}",
        if manifest.prune_empty_dirs { "yes" } else { "no" }
    );
    write_table(&mut out, "Locals", &manifest.locals);
    write_table(&mut out, "Tokens", &manifest.tokens);

    let _ = writeln!(out, "┣{}┫", LIGHT_RULE);
    if destinations.is_empty() {
        let _ = writeln!(
            out,
            "┃ No template files under {}",
            blueprint.template_root().display()
        );
    } else {
        let _ = writeln!(out, "┃ Files for '{}':", entity);
        for line in tree::render_path_tree(".", destinations.iter().copied(), color).lines() {
            let _ = writeln!(out, "┃    {}", line);
        }
    }
    let _ = writeln!(out, "┣{}┫", LIGHT_RULE);
    let _ = writeln!(out, "┃ Usage:");
    let _ = writeln!(out, "┃    stencil generate {} <entity>", blueprint.name());
    let _ = writeln!(out, "┃    stencil destroy {} <entity>", blueprint.name());
    let _ = writeln!(out, "┗{}┛", HEAVY_RULE);
    out
}

fn write_table(out: &mut String, title: &str, table: &BTreeMap<String, String>) {
    if table.is_empty() {
        return;
    }
    let _ = writeln!(out, "┃ {}:", title);
    for (key, value) in table {
        let _ = writeln!(out, "┃    {} = {:?}", key, value);
    }
}
