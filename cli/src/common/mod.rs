//! # Stencil Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! This module is the organizational entry point for the shared utilities used
//! by the blueprint engine and the command handlers. It keeps terminal and
//! filesystem plumbing out of `core::blueprint`, which only depends on the
//! small functions and traits exposed here.
//!
//! ## Architecture
//!
//! - **`fs`**: filesystem mutations with path-carrying errors (`io`).
//! - **`ui`**: terminal prompts and per-file status lines.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{fs::io, ui};
//!
//! io::write_bytes_to_file(&destination, &content).await?;
//! let color = ui::stdout_supports_color();
//! ```
//!

/// Utilities for filesystem operations (writes, removal, pruning).
pub mod fs;
/// Utilities for terminal user interface elements (prompts, status lines).
pub mod ui;
