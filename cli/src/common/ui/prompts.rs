//! # Terminal Conflict Prompts
//!
//! File: cli/src/common/ui/prompts.rs
//!
//! ## Overview
//!
//! `TerminalPrompter` is the interactive `Prompter` used by `stencil generate`
//! when neither `--force` nor `--skip-existing` is given:
//!
//! ```text
//! ? Overwrite app/modules/foo-bar.js?
//! > Overwrite
//!   Skip
//!   Diff
//!   Edit
//!   Quit
//! ```
//!
//! - The menu is a `dialoguer::Select`, run on the blocking thread pool.
//!   Escape counts as quit.
//! - `Diff` prints a coloured unified diff to stdout.
//! - `Edit` writes the diff to a temporary `.diff` file and opens it in
//!   `$VISUAL`, `$EDITOR` or `vi`. Delete the `+` lines you do not want and turn
//!   `-` lines you want to keep into context lines (leading space), then save.
//!
//! Without a terminal on stdin there is nobody to ask: the prompter fails with
//! a hint to rerun with `--force` or `--skip-existing`.
//!
use crate::core::blueprint::resolver::{Choice, Prompter};
use crate::core::error::{StencilError, Result};
use anyhow::{anyhow, Context};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use std::io::{IsTerminal, Write};
use tracing::debug;

const CHOICES: [(&str, Choice); 5] = [
    ("Overwrite", Choice::Overwrite),
    ("Skip", Choice::Skip),
    ("Diff", Choice::Diff),
    ("Edit", Choice::Edit),
    ("Quit", Choice::Quit),
];

#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompter {
    color: bool,
}

impl TerminalPrompter {
    pub fn new(color: bool) -> Self {
        TerminalPrompter { color }
    }
}

impl Prompter for TerminalPrompter {
    async fn choose(&mut self, display_path: &str) -> Result<Choice> {
        if !std::io::stdin().is_terminal() {
            return Err(StencilError::Prompt(format!(
                "'{}' already exists with different content and stdin is not a terminal; \
                 rerun with --force or --skip-existing",
                display_path
            ))
            .into());
        }

        let prompt = format!("Overwrite {}?", display_path);
        let picked = tokio::task::spawn_blocking(move || {
            let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .items(&labels)
                .default(0)
                .interact_opt()
        })
        .await
        .context("Prompt task panicked")?
        .map_err(|e| StencilError::Prompt(e.to_string()))?;

        let choice = picked.map_or(Choice::Quit, |index| CHOICES[index].1);
        debug!("Picked {:?} for {}", choice, display_path);
        Ok(choice)
    }

    async fn show_diff(&mut self, _display_path: &str, diff: &str) -> Result<()> {
        let rendered = render_diff(diff, self.color);
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to print diff")
    }

    async fn edit_patch(&mut self, display_path: &str, patch: &str) -> Result<String> {
        let file = tempfile::Builder::new()
            .prefix("stencil-")
            .suffix(".diff")
            .tempfile()
            .context("Failed to create temporary diff file")?;
        std::fs::write(file.path(), patch)
            .map_err(|e| anyhow!(StencilError::file_system(file.path(), e)))?;

        let editor = editor_command();
        let (program, args) = editor
            .split_first()
            .ok_or_else(|| StencilError::Prompt("no editor configured".to_string()))?;
        debug!("Editing diff for {} with {:?}", display_path, editor);

        let status = tokio::process::Command::new(program)
            .args(args)
            .arg(file.path())
            .status()
            .await
            .map_err(|e| StencilError::Prompt(format!("failed to start editor '{}': {}", program, e)))?;
        if !status.success() {
            return Err(StencilError::ConflictResolution(format!(
                "editor '{}' exited with {}",
                program, status
            ))
            .into());
        }

        std::fs::read_to_string(file.path())
            .map_err(|e| anyhow!(StencilError::file_system(file.path(), e)))
    }

    fn notify(&mut self, message: &str) {
        if self.color {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        } else {
            eprintln!("warning: {}", message);
        }
    }
}

/// `$VISUAL`, then `$EDITOR`, then `vi`, split into program and arguments.
fn editor_command() -> Vec<String> {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Colours added, removed and hunk-header lines of a unified diff.
pub fn render_diff(diff: &str, color: bool) -> String {
    if !color {
        return diff.to_string();
    }
    let mut out = String::with_capacity(diff.len() + 64);
    for line in diff.lines() {
        let painted = if line.starts_with("+++") || line.starts_with("---") {
            line.bold().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else {
            line.to_string()
        };
        out.push_str(&painted);
        out.push('\n');
    }
    out
}
