//! # Stencil Blueprint List Command
//!
//! File: cli/src/commands/blueprint/list.rs
//!
//! ## Overview
//!
//! Implements `stencil blueprint list`. Every lookup source is shown in search
//! order together with the blueprints it provides. A blueprint shadowed by one
//! of the same name in an earlier source is marked `(overridden)`; `generate`
//! will never pick it.
//!
//! ## Examples
//!
//! ```bash
//! stencil blueprint list
//! stencil blueprint list --lookup-path ../shared-blueprints
//! ```
//!
//! Example output:
//!
//! ```text
//! Available blueprints:
//!
//! project (blueprints)
//!   module        | Project flavoured module
//!
//! built-in (/usr/local/share/stencil/blueprints)
//!   in-repo-addon | An addon living in lib/ of the host project
//!   module        | A plain JavaScript module (overridden)
//!
//! Found 3 blueprint(s).
//! Use 'stencil blueprint info <Name>' for details or 'stencil generate <Name> <entity>' to run one.
//! ```
//!
use crate::commands::shared;
use crate::core::blueprint::registry::BlueprintSource;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Extra directory to look for blueprints in.
    #[arg(long = "lookup-path", value_name = "DIR", action = clap::ArgAction::Append)]
    pub lookup_paths: Vec<PathBuf>,
}

pub async fn handle_list(args: ListArgs) -> Result<()> {
    info!("Handling blueprint list command...");
    let (_, _, registry) = shared::load_registry(&args.lookup_paths)?;
    debug!("Scanning {} blueprint sources", registry.sources().len());
    let listing = registry.list().context("Failed to scan blueprint sources")?;
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    print!("{}", format_listing(&listing, &cwd));
    Ok(())
}

/// `path` relative to `cwd` when it lies below it, else unchanged.
fn display_path(path: &Path, cwd: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    match pathdiff::diff_paths(&absolute, cwd) {
        Some(relative) if !relative.starts_with("..") && !relative.as_os_str().is_empty() => {
            relative.display().to_string()
        }
        _ => absolute.display().to_string(),
    }
}

fn format_listing(listing: &[BlueprintSource], cwd: &Path) -> String {
    let found: usize = listing.iter().map(|s| s.blueprints.len()).sum();
    let mut out = String::new();

    if found == 0 {
        let _ = writeln!(out, "\nNo blueprints found. Searched:");
        for source in listing {
            let _ = writeln!(out, "  {} ({})", source.source.label, display_path(&source.source.path, cwd));
        }
        let _ = writeln!(
            out,
            "\nA blueprint is a directory holding a 'files/' template tree and an optional 'blueprint.toml'."
        );
        return out;
    }

    let name_width = listing
        .iter()
        .flat_map(|s| s.blueprints.iter())
        .map(|b| b.name.len())
        .max()
        .unwrap_or(10)
        .clamp(10, 30);

    let _ = writeln!(out, "\nAvailable blueprints:");
    for source in listing.iter().filter(|s| !s.blueprints.is_empty()) {
        let _ = writeln!(
            out,
            "\n{} ({})",
            source.source.label,
            display_path(&source.source.path, cwd)
        );
        for entry in &source.blueprints {
            let description = if entry.description.is_empty() {
                "[No description]"
            } else {
                entry.description.as_str()
            };
            let marker = if entry.overridden { " (overridden)" } else { "" };
            let _ = writeln!(
                out,
                "  {:<width$} | {}{}",
                entry.name,
                description,
                marker,
                width = name_width
            );
        }
    }

    let _ = writeln!(out, "\nFound {} blueprint(s).", found);
    let _ = writeln!(
        out,
        "Use 'stencil blueprint info <Name>' for details or 'stencil generate <Name> <entity>' to run one."
    );
    out
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::blueprint::registry::{BlueprintEntry, LookupSource};

    fn entry(name: &str, description: &str, overridden: bool) -> BlueprintEntry {
        BlueprintEntry {
            name: name.to_string(),
            description: description.to_string(),
            overridden,
        }
    }

    #[test]
    fn test_display_path_relative_below_cwd() {
        let cwd = Path::new("/work/app");
        assert_eq!(display_path(Path::new("/work/app/blueprints"), cwd), "blueprints");
        assert_eq!(display_path(Path::new("blueprints"), cwd), "blueprints");
        assert_eq!(display_path(Path::new("/opt/stencil"), cwd), "/opt/stencil");
    }

    #[test]
    fn test_format_listing_groups_by_source() {
        let cwd = Path::new("/work/app");
        let listing = vec![
            BlueprintSource {
                source: LookupSource::new("project", "/work/app/blueprints"),
                blueprints: vec![entry("module", "Local module", false)],
            },
            BlueprintSource {
                source: LookupSource::new("lookup path", "/work/app/empty"),
                blueprints: vec![],
            },
            BlueprintSource {
                source: LookupSource::new("built-in", "/opt/stencil"),
                blueprints: vec![entry("in-repo-addon", "", false), entry("module", "Plain", true)],
            },
        ];
        let out = format_listing(&listing, cwd);

        assert!(out.contains("project (blueprints)\n  module        | Local module\n"));
        assert!(out.contains("built-in (/opt/stencil)"));
        assert!(out.contains("in-repo-addon | [No description]\n"));
        assert!(out.contains("module        | Plain (overridden)\n"));
        assert!(!out.contains("lookup path"));
        assert!(out.contains("Found 3 blueprint(s)."));
        assert!(out.find("project (").unwrap() < out.find("built-in (").unwrap());
    }

    #[test]
    fn test_format_listing_empty_lists_sources() {
        let listing = vec![BlueprintSource {
            source: LookupSource::new("built-in", "/opt/stencil"),
            blueprints: vec![],
        }];
        let out = format_listing(&listing, Path::new("/work"));
        assert!(out.contains("No blueprints found. Searched:"));
        assert!(out.contains("  built-in (/opt/stencil)"));
    }
}
