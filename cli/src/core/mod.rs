//! # Stencil Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core components of stencil: the blueprint
//! engine and the infrastructure it stands on.
//!
//! ## Architecture
//!
//! - `blueprint`: registry, path mapping, conflict classification and
//!   resolution, planning and committing
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//! - `templating`: Template rendering and name case conversion
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::blueprint::registry::BlueprintRegistry;
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{StencilError, Result}; // For error handling
//! ```
//!
pub mod blueprint;
pub mod config;
pub mod error;
pub mod templating;
