//! # Stencil Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the stencil CLI. It
//! provides a consistent approach to error management with detailed error
//! information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `StencilError`: A custom error enum using `thiserror` for the failure kinds
//!   the blueprint engine distinguishes between
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error kinds follow how a failure must be treated:
//! - `Validation`: bad user input, reported immediately, never retried
//! - `TemplateConfiguration`: a broken blueprint (unresolved token, bad rename table)
//! - `FileSystem`: an I/O failure other than "not found"; aborts the whole run
//! - `ConflictResolution`: a patch that did not apply during an edit; recoverable,
//!   the same file is prompted again
//! - `UnknownBlueprint`: lookup failure, fatal to the invoking command
//! - `Cancelled`: the user quit an interactive prompt
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! return Err(StencilError::UnknownBlueprint { name: name.to_string() })?;
//!
//! // Branch on the kind further up the stack
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<StencilError>(), Some(StencilError::ConflictResolution(_))) => {
//!         // re-prompt
//!     }
//!     other => other?,
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the stencil application.
#[derive(Error, Debug)]
pub enum StencilError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Blueprint configuration error in '{}': {message}", path.display())]
    TemplateConfiguration { path: PathBuf, message: String },

    #[error("Filesystem error at '{}': {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Conflict resolution failed: {0}")]
    ConflictResolution(String),

    #[error("Unknown blueprint '{name}'. Run 'stencil blueprint list' to see available blueprints.")]
    UnknownBlueprint { name: String },

    #[error("Cancelled by user.")]
    Cancelled,

    #[error("No action was planned for '{path}'.")]
    UnplannedAction { path: String },

    #[error("Action '{action}' is not allowed for '{path}' ({reason}).")]
    InvalidTransition {
        path: String,
        action: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Package manifest error: {0}")]
    Manifest(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl StencilError {
    /// Wraps an I/O error together with the path it happened on.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StencilError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

/// Returns the `StencilError` at the root of an `anyhow` chain, if any.
pub fn kind_of(err: &anyhow::Error) -> Option<&StencilError> {
    err.chain().find_map(|cause| cause.downcast_ref::<StencilError>())
}
