//! # Stencil UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Terminal-facing pieces of the CLI. The blueprint engine in `core` only
//! sees the `Prompter` trait and a `Write` sink; the implementations that
//! talk to a human live here.
//!
//! - **`prompts`**: `TerminalPrompter`, the interactive overwrite / skip /
//!   diff / edit / quit menu (`dialoguer`), plus coloured diff output.
//! - **`status`**: the `create` / `identical` / `overwrite` / ... status lines
//!   printed for every file (`colored`).
//!
//! ```rust
//! use crate::common::ui::{prompts::TerminalPrompter, status};
//!
//! let mut prompter = TerminalPrompter::new(true);
//! println!("{}", status::status_line(status::FileStatus::Create, "app/foo.js", false));
//! ```
//!
use std::io::IsTerminal;

/// Interactive conflict prompts.
pub mod prompts;
/// Per-file status line formatting.
pub mod status;

/// Whether stdout is a terminal that should receive colour.
///
/// `NO_COLOR` (any value) turns colour off.
pub fn stdout_supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
