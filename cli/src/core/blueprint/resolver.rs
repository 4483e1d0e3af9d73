//! # Interactive Conflict Resolution
//!
//! File: cli/src/core/blueprint/resolver.rs
//!
//! ## Overview
//!
//! Every file classified as `Resolution::Confirm` needs a decision before the
//! plan can be committed. This module asks for those decisions one file at a
//! time, in plan order.
//!
//! ## Architecture
//!
//! - `ConflictSequence` walks the plan and hands out one `PendingConflict` at a
//!   time. A `PendingConflict` mutably borrows the sequence, so the next
//!   conflict cannot be requested until the current one has been decided
//!   (`PendingConflict::decide`). Dropping an undecided conflict just means the
//!   same file comes back on the next request.
//! - `Prompter` is the seam to the user: the terminal implementation lives in
//!   `common::ui::prompts`; `PolicyPrompter` answers every conflict the same way
//!   for `--force` / `--skip-existing`.
//! - `InteractiveResolver` drives the loop:
//!   - `overwrite` and `skip` are terminal;
//!   - `diff` shows the unified diff and asks again;
//!   - `edit` lets the user trim the diff in `$EDITOR`, applies what is left to
//!     the existing file and asks again. A patch that fails to parse or apply
//!     is reported and the same file is prompted again;
//!   - `quit` aborts the run with `StencilError::Cancelled`.
//!
//! Edited content is written immediately (unless dry-run) and is not rolled
//! back if the run is cancelled later.
//!
use crate::common::fs::io;
use crate::core::blueprint::file_info::{Action, FileInfo, Resolution};
use crate::core::blueprint::plan::ConflictDecision;
use crate::core::error::{kind_of, StencilError, Result};
use crate::core::templating::TemplateRenderer;
use anyhow::anyhow;
use std::io::ErrorKind;
use tracing::{debug, info};

/// What the user picked for a conflicting file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Overwrite,
    Skip,
    Diff,
    Edit,
    Quit,
}

/// Talks to whoever decides conflicts.
///
/// Used generically (`InteractiveResolver<P>`), never as a trait object.
#[allow(async_fn_in_trait)]
pub trait Prompter {
    /// Asks what to do with the conflicting file at `display_path`.
    async fn choose(&mut self, display_path: &str) -> Result<Choice>;

    /// Shows a unified diff (existing -> new).
    async fn show_diff(&mut self, display_path: &str, diff: &str) -> Result<()>;

    /// Lets the user edit `patch` and returns the edited text.
    async fn edit_patch(&mut self, display_path: &str, patch: &str) -> Result<String>;

    /// Reports a recoverable problem before the file is prompted again.
    fn notify(&mut self, message: &str);
}

/// Blanket answer used for `--force` and `--skip-existing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    OverwriteAll,
    SkipAll,
}

/// A prompter that never asks.
#[derive(Debug, Clone, Copy)]
pub struct PolicyPrompter {
    policy: Policy,
}

impl PolicyPrompter {
    pub fn new(policy: Policy) -> Self {
        PolicyPrompter { policy }
    }
}

impl Prompter for PolicyPrompter {
    async fn choose(&mut self, display_path: &str) -> Result<Choice> {
        let choice = match self.policy {
            Policy::OverwriteAll => Choice::Overwrite,
            Policy::SkipAll => Choice::Skip,
        };
        debug!("{:?} policy picked {:?} for {}", self.policy, choice, display_path);
        Ok(choice)
    }

    async fn show_diff(&mut self, _display_path: &str, _diff: &str) -> Result<()> {
        Ok(())
    }

    async fn edit_patch(&mut self, display_path: &str, _patch: &str) -> Result<String> {
        Err(StencilError::Prompt(format!(
            "cannot edit '{}' without an interactive terminal",
            display_path
        ))
        .into())
    }

    fn notify(&mut self, message: &str) {
        info!("{}", message);
    }
}

/// Hands out conflicts one at a time, in plan order.
pub struct ConflictSequence<'a> {
    files: &'a mut [FileInfo],
    cursor: usize,
    decisions: Vec<ConflictDecision>,
}

impl<'a> ConflictSequence<'a> {
    pub fn new(files: &'a mut [FileInfo]) -> Self {
        ConflictSequence {
            files,
            cursor: 0,
            decisions: Vec::new(),
        }
    }

    /// The next undecided conflict, or `None` when every conflict is decided.
    pub fn next_pending(&mut self) -> Option<PendingConflict<'_, 'a>> {
        let offset = self.files[self.cursor..]
            .iter()
            .position(|f| f.resolution() == Some(Resolution::Confirm))?;
        let index = self.cursor + offset;
        self.cursor = index;
        Some(PendingConflict {
            sequence: self,
            index,
        })
    }

    pub fn into_decisions(self) -> Vec<ConflictDecision> {
        self.decisions
    }
}

/// The conflict currently awaiting a decision.
pub struct PendingConflict<'s, 'a> {
    sequence: &'s mut ConflictSequence<'a>,
    index: usize,
}

impl PendingConflict<'_, '_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn file(&self) -> &FileInfo {
        &self.sequence.files[self.index]
    }

    pub fn file_mut(&mut self) -> &mut FileInfo {
        &mut self.sequence.files[self.index]
    }

    /// Records the final action and releases the sequence for the next conflict.
    pub fn decide(self, action: Action) -> Result<ConflictDecision> {
        if !matches!(action, Action::Overwrite | Action::Skip | Action::Edit) {
            return Err(StencilError::InvalidTransition {
                path: self.file().display_path().to_string(),
                action: action.to_string(),
                reason: "a conflict can only be overwritten, skipped or edited".to_string(),
            }
            .into());
        }
        self.sequence.files[self.index].set_action(action)?;
        let decision = ConflictDecision {
            index: self.index,
            action,
        };
        self.sequence.decisions.push(decision);
        self.sequence.cursor = self.index + 1;
        Ok(decision)
    }
}

/// Runs the prompt loop for every conflict in a plan.
pub struct InteractiveResolver<'r, P: Prompter> {
    prompter: &'r mut P,
    renderer: &'r dyn TemplateRenderer,
    dry_run: bool,
}

impl<'r, P: Prompter> InteractiveResolver<'r, P> {
    pub fn new(prompter: &'r mut P, renderer: &'r dyn TemplateRenderer, dry_run: bool) -> Self {
        InteractiveResolver {
            prompter,
            renderer,
            dry_run,
        }
    }

    /// Prompts for every `Confirm` file in order and returns the decisions made.
    ///
    /// # Errors
    ///
    /// `Cancelled` if the user quits; filesystem and prompt failures otherwise.
    pub async fn resolve_all(&mut self, files: &mut [FileInfo]) -> Result<Vec<ConflictDecision>> {
        let mut sequence = ConflictSequence::new(files);
        while let Some(pending) = sequence.next_pending() {
            self.resolve_one(pending).await?;
        }
        Ok(sequence.into_decisions())
    }

    async fn resolve_one(&mut self, mut pending: PendingConflict<'_, '_>) -> Result<()> {
        loop {
            let display_path = pending.file().display_path().to_string();
            match self.prompter.choose(&display_path).await? {
                Choice::Overwrite => {
                    pending.decide(Action::Overwrite)?;
                    return Ok(());
                }
                Choice::Skip => {
                    let action = if pending.file().edited_content().is_some() {
                        Action::Edit
                    } else {
                        Action::Skip
                    };
                    pending.decide(action)?;
                    return Ok(());
                }
                Choice::Diff => match self.diff(pending.file()).await {
                    Ok(diff) => self.prompter.show_diff(&display_path, &diff).await?,
                    Err(e) => self.recover(e)?,
                },
                Choice::Edit => {
                    if let Err(e) = self.edit(pending.file_mut()).await {
                        self.recover(e)?;
                    }
                }
                Choice::Quit => {
                    info!("Quit while resolving {}", display_path);
                    return Err(StencilError::Cancelled.into());
                }
            }
        }
    }

    /// Reports `ConflictResolution` errors and swallows them; anything else is fatal.
    fn recover(&mut self, err: anyhow::Error) -> Result<()> {
        if matches!(kind_of(&err), Some(StencilError::ConflictResolution(_))) {
            self.prompter.notify(&format!("{:#}", err));
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Unified diff from the current baseline to the rendered content.
    async fn diff(&self, file: &FileInfo) -> Result<String> {
        let baseline = self.baseline(file).await?;
        let rendered = file.rendered_content(self.renderer)?;
        let (old, new) = as_text(file, &baseline, rendered)?;
        Ok(diffy::create_patch(old, new).to_string())
    }

    async fn edit(&mut self, file: &mut FileInfo) -> Result<()> {
        let baseline = self.baseline(file).await?;
        let rendered = file.rendered_content(self.renderer)?;
        let (old, new) = as_text(file, &baseline, rendered)?;
        let patch = diffy::create_patch(old, new).to_string();

        let edited = self.prompter.edit_patch(file.display_path(), &patch).await?;
        let parsed = diffy::Patch::from_str(&edited).map_err(|e| {
            StencilError::ConflictResolution(format!(
                "could not parse the edited diff for '{}': {}",
                file.display_path(),
                e
            ))
        })?;
        let merged = diffy::apply(old, &parsed).map_err(|e| {
            StencilError::ConflictResolution(format!(
                "the edited diff does not apply to '{}': {}",
                file.display_path(),
                e
            ))
        })?;

        if self.dry_run {
            debug!("Dry run: not writing edited {}", file.display_path());
        } else {
            io::write_bytes_to_file(file.destination_path(), merged.as_bytes()).await?;
        }
        info!("Applied edited diff to {}", file.display_path());
        file.record_edit(merged.into_bytes());
        Ok(())
    }

    /// The content the user is currently looking at: the last edit, or the file on disk.
    async fn baseline(&self, file: &FileInfo) -> Result<Vec<u8>> {
        if let Some(edited) = file.edited_content() {
            return Ok(edited.to_vec());
        }
        let destination = file.destination_path();
        match tokio::fs::read(destination).await {
            Ok(bytes) => Ok(bytes),
            // Removed behind our back: diff against nothing.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(anyhow!(StencilError::file_system(destination, e))),
        }
    }
}

fn as_text<'b>(file: &FileInfo, old: &'b [u8], new: &'b [u8]) -> Result<(&'b str, &'b str)> {
    match (std::str::from_utf8(old), std::str::from_utf8(new)) {
        (Ok(old), Ok(new)) => Ok((old, new)),
        _ => Err(StencilError::ConflictResolution(format!(
            "'{}' is a binary file and cannot be diffed",
            file.display_path()
        ))
        .into()),
    }
}
