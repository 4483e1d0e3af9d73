//! # Per-file Status Lines
//!
//! File: cli/src/common/ui/status.rs
//!
//! Formats the one-line report printed for every file a blueprint run touches:
//!
//! ```text
//!   create app/modules/foo-bar.js
//!   identical app/templates/foo-bar.hbs
//!   overwrite app/styles/foo-bar.css
//! ```
//!
use colored::{ColoredString, Colorize};
use std::fmt;

/// What happened (or, in a dry run, would happen) to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Create,
    Identical,
    Skip,
    Overwrite,
    Edit,
    Remove,
}

impl FileStatus {
    pub fn label(self) -> &'static str {
        match self {
            FileStatus::Create => "create",
            FileStatus::Identical => "identical",
            FileStatus::Skip => "skip",
            FileStatus::Overwrite => "overwrite",
            FileStatus::Edit => "edit",
            FileStatus::Remove => "remove",
        }
    }

    fn colorize(self) -> ColoredString {
        let label = self.label();
        match self {
            FileStatus::Create => label.green(),
            FileStatus::Identical => label.blue(),
            FileStatus::Skip => label.yellow(),
            FileStatus::Overwrite | FileStatus::Edit => label.yellow().bold(),
            FileStatus::Remove => label.red(),
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `"  <label> <path>"`, with the label coloured when `color` is set.
pub fn status_line(status: FileStatus, display_path: &str, color: bool) -> String {
    if color {
        format!("  {} {}", status.colorize(), display_path)
    } else {
        format!("  {} {}", status.label(), display_path)
    }
}
