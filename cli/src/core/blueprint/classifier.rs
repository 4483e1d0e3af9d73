//! # Conflict Classification
//!
//! File: cli/src/core/blueprint/classifier.rs
//!
//! ## Overview
//!
//! Decides, for every mapped file, whether installing it would create a new
//! file (`Resolution::None`), leave an identical file alone
//! (`Resolution::Identical`) or clash with different content
//! (`Resolution::Confirm`).
//!
//! ## Rules
//!
//! - Absent destination: `None`. The renderer is not invoked.
//! - Present destination: existing bytes are compared byte-for-byte with the
//!   rendered bytes. No line-ending or whitespace normalisation.
//! - Any read failure other than "not found" (permission denied, a directory
//!   where a file is expected, ...) is a fatal `FileSystem` error.
//! - Render failures propagate unchanged; binary passthrough is the
//!   renderer's job.
//!
//! Independent files are classified concurrently; `classify_all` still
//! records results in plan order.
//!
use crate::core::blueprint::file_info::{FileInfo, Resolution};
use crate::core::error::{StencilError, Result};
use crate::core::templating::TemplateRenderer;
use futures_util::future::try_join_all;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Classifies one destination against the content `render` produces.
pub async fn classify<'a, F>(destination: &Path, render: F) -> Result<Resolution>
where
    F: FnOnce() -> Result<&'a [u8]>,
{
    let existing = match tokio::fs::read(destination).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("classify {}: absent", destination.display());
            return Ok(Resolution::None);
        }
        Err(e) => return Err(StencilError::file_system(destination, e).into()),
    };

    let rendered = render()?;
    let resolution = if existing.as_slice() == rendered {
        Resolution::Identical
    } else {
        Resolution::Confirm
    };
    debug!("classify {}: {:?}", destination.display(), resolution);
    Ok(resolution)
}

/// Classifies a single FileInfo using its memoized rendered content.
pub async fn classify_file(file: &FileInfo, renderer: &dyn TemplateRenderer) -> Result<Resolution> {
    classify(file.destination_path(), || file.rendered_content(renderer)).await
}

/// Classifies every file concurrently and stores each resolution on its FileInfo.
pub async fn classify_all(files: &mut [FileInfo], renderer: &dyn TemplateRenderer) -> Result<()> {
    let resolutions = try_join_all(files.iter().map(|file| classify_file(file, renderer))).await?;
    for (file, resolution) in files.iter_mut().zip(resolutions) {
        file.set_resolution(resolution);
    }
    Ok(())
}
