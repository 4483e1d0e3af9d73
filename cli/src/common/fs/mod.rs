//! # Stencil Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module is the organizational unit for filesystem helpers. The blueprint
//! engine's committer and the uninstall hooks go through these functions so
//! that every I/O failure carries the path it happened on.
//!
//! - **`io`**: directory creation, byte writes, idempotent removal and
//!   empty-directory pruning.
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::write_bytes_to_file(&destination, &content).await?;
//! ```
//!

/// File I/O wrappers (`ensure_dir_exists`, `write_bytes_to_file`, `remove_file_if_exists`, `prune_empty_dirs`).
pub mod io;
