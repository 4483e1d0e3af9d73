//! # Stencil Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem mutations the blueprint engine
//! performs. It provides thin wrappers around `tokio::fs` (and `std::fs` for
//! the hook-side pruning) that map every I/O failure into
//! `StencilError::FileSystem` with the offending path attached.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: creates a directory and its parents; errors if
//!   the path exists but is not a directory.
//! - **`write_bytes_to_file`**: writes bytes, creating parent directories first.
//! - **`remove_file_if_exists`**: deletes a file; an already absent file is a
//!   successful no-op (uninstall is idempotent).
//! - **`prune_empty_dirs`**: walks upward from a directory removing it while it
//!   is empty, stopping at a boundary directory. Used by uninstall hooks.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::write_bytes_to_file(&dest, b"export default {};\n").await?;
//! let removed = io::remove_file_if_exists(&dest).await?;
//! io::prune_empty_dirs(dest.parent().unwrap(), &project_root)?;
//! ```
//!
use crate::core::error::{StencilError, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Ensures that a directory exists at the specified path, creating parents as needed.
///
/// # Errors
///
/// Returns a `StencilError::FileSystem` if the path exists but is not a
/// directory or if creating it fails.
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            debug!("Directory already exists: {:?}", path);
            Ok(())
        }
        Ok(_) => Err(StencilError::file_system(
            path,
            std::io::Error::new(ErrorKind::AlreadyExists, "path exists but is not a directory"),
        )
        .into()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(path)
                .await
                .map_err(|e| StencilError::file_system(path, e))?;
            debug!("Created directory: {:?}", path);
            Ok(())
        }
        Err(e) => Err(StencilError::file_system(path, e).into()),
    }
}

/// Writes `content` to `path`, creating intermediate directories and
/// replacing any existing file.
pub async fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent).await?;
    }
    fs::write(path, content)
        .await
        .map_err(|e| StencilError::file_system(path, e))?;
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Removes the file at `path`.
///
/// Returns `Ok(true)` if a file was deleted and `Ok(false)` if there was
/// nothing to delete.
pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed file: {:?}", path);
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Nothing to remove at {:?}", path);
            Ok(false)
        }
        Err(e) => Err(StencilError::file_system(path, e).into()),
    }
}

/// Removes `start` and each of its ancestors while they are empty directories.
///
/// Stops at (and never removes) `boundary`. Directories outside `boundary`
/// are left alone. Returns how many directories were removed.
///
/// Synchronous: it runs from blueprint hooks, which are plain functions.
pub fn prune_empty_dirs(start: &Path, boundary: &Path) -> Result<usize> {
    let mut removed = 0;
    let mut current = start;
    while current != boundary && current.starts_with(boundary) {
        let has_entries = match std::fs::read_dir(current) {
            Ok(mut entries) => entries.next().is_some(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(StencilError::file_system(current, e).into()),
        };
        if has_entries {
            break;
        }
        match std::fs::remove_dir(current) {
            Ok(()) => {
                debug!("Pruned empty directory: {:?}", current);
                removed += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StencilError::file_system(current, e).into()),
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Ok(removed)
}
