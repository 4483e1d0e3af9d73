//! # Stencil Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level subcommand, each exposing a clap `*Args` struct
//! and an async `handle_*` function called from `main`:
//!
//! - `generate`: install a blueprint for an entity (`stencil g`)
//! - `destroy`: remove what a blueprint installed (`stencil d`)
//! - `blueprint`: `list` and `info` (`stencil b`)
//!
//! `shared` holds the argument struct and setup common to generate and destroy.
//!
pub mod blueprint;
pub mod destroy;
pub mod generate;
pub mod shared;
