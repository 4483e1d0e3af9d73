//! # Plan Committer
//!
//! File: cli/src/core/blueprint/committer.rs
//!
//! ## Overview
//!
//! Applies an `InstallPlan` to the filesystem, strictly in plan order, and
//! prints exactly one status line per file.
//!
//! | action      | mutation                                  | status      |
//! |-------------|-------------------------------------------|-------------|
//! | `Write`     | render + write (parents created)          | `create`    |
//! | `Overwrite` | render + write                            | `overwrite` |
//! | `Skip`      | none                                      | `identical` / `skip` |
//! | `Edit`      | none (the edit session already wrote it)  | `edit`      |
//! | `Remove`    | delete if present                         | `remove`    |
//!
//! The status line for a file is written and flushed before its mutation, so
//! when a run aborts part-way the output shows exactly how far it got. In a
//! dry run the status lines are printed and nothing is mutated.
//!
//! A `remove` line is printed whether or not the file is still there; the
//! `CommitSummary` tells the two apart (`removed` vs `already_absent`).
//!
use crate::common::fs::io;
use crate::common::ui::status::{status_line, FileStatus};
use crate::core::blueprint::file_info::{Action, FileInfo, Resolution};
use crate::core::blueprint::plan::InstallPlan;
use crate::core::error::{StencilError, Result};
use crate::core::templating::TemplateRenderer;
use anyhow::Context;
use std::io::Write;
use tokio::fs;
use tracing::debug;

/// Per-status counts for one commit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    pub created: usize,
    pub identical: usize,
    pub skipped: usize,
    pub overwritten: usize,
    pub edited: usize,
    /// Files actually deleted (or, in a dry run, present and due for deletion).
    pub removed: usize,
    /// `remove` entries whose file was already gone.
    pub already_absent: usize,
}

impl CommitSummary {
    fn record(&mut self, status: FileStatus) {
        match status {
            FileStatus::Create => self.created += 1,
            FileStatus::Identical => self.identical += 1,
            FileStatus::Skip => self.skipped += 1,
            FileStatus::Overwrite => self.overwritten += 1,
            FileStatus::Edit => self.edited += 1,
            FileStatus::Remove => {}
        }
    }

    fn record_removal(&mut self, deleted: bool) {
        if deleted {
            self.removed += 1;
        } else {
            self.already_absent += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.created
            + self.identical
            + self.skipped
            + self.overwritten
            + self.edited
            + self.removed
            + self.already_absent
    }
}

pub struct Committer<'r, W: Write> {
    renderer: &'r dyn TemplateRenderer,
    out: W,
    color: bool,
}

impl<'r, W: Write> Committer<'r, W> {
    pub fn new(renderer: &'r dyn TemplateRenderer, out: W, color: bool) -> Self {
        Committer { renderer, out, color }
    }

    pub fn renderer(&self) -> &'r dyn TemplateRenderer {
        self.renderer
    }

    /// Applies every planned action in order.
    ///
    /// # Errors
    ///
    /// - `UnplannedAction` for a file that reached the committer without an action.
    /// - `FileSystem` / render errors from the mutation itself. Earlier files
    ///   stay committed.
    pub async fn commit(&mut self, plan: &InstallPlan, dry_run: bool) -> Result<CommitSummary> {
        let mut summary = CommitSummary::default();
        for file in plan.files() {
            let action = file.action().ok_or_else(|| StencilError::UnplannedAction {
                path: file.display_path().to_string(),
            })?;
            let status = status_for(file, action);
            self.emit(status, file.display_path())?;

            if action == Action::Remove {
                let deleted = if dry_run {
                    fs::try_exists(file.destination_path())
                        .await
                        .map_err(|e| StencilError::file_system(file.destination_path(), e))?
                } else {
                    io::remove_file_if_exists(file.destination_path()).await?
                };
                summary.record_removal(deleted);
                continue;
            }

            summary.record(status);
            if dry_run {
                continue;
            }
            self.apply(file, action).await?;
        }
        debug!("Commit finished: {:?}", summary);
        Ok(summary)
    }

    async fn apply(&self, file: &FileInfo, action: Action) -> Result<()> {
        match action {
            Action::Write | Action::Overwrite => {
                let content = file.rendered_content(self.renderer)?;
                io::write_bytes_to_file(file.destination_path(), content).await
            }
            Action::Skip | Action::Edit | Action::Remove => Ok(()),
        }
    }

    fn emit(&mut self, status: FileStatus, display_path: &str) -> Result<()> {
        writeln!(self.out, "{}", status_line(status, display_path, self.color))
            .and_then(|_| self.out.flush())
            .context("Failed to write status line")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn status_for(file: &FileInfo, action: Action) -> FileStatus {
    match action {
        Action::Write => FileStatus::Create,
        Action::Skip if file.resolution() == Some(Resolution::Identical) => FileStatus::Identical,
        Action::Skip => FileStatus::Skip,
        Action::Overwrite => FileStatus::Overwrite,
        Action::Edit => FileStatus::Edit,
        Action::Remove => FileStatus::Remove,
    }
}
