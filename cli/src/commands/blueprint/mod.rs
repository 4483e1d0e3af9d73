//! # Stencil Blueprint Command Group
//!
//! File: cli/src/commands/blueprint/mod.rs
//!
//! ## Overview
//!
//! Entry point and router for `stencil blueprint`. The subcommands inspect
//! blueprints without running them:
//!
//! - `list`: every lookup source and the blueprints it provides
//! - `info`: settings of one blueprint and the files it would generate
//!
//! ## Examples
//!
//! ```bash
//! stencil blueprint list
//! stencil blueprint info module
//! stencil blueprint info module --entity blog/post --pod
//! ```
//!
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// `stencil blueprint info`.
mod info;
/// `stencil blueprint list`.
mod list;
/// Text tree of mapped destination paths, used by `info`.
mod tree;

#[derive(Parser, Debug)]
pub struct BlueprintArgs {
    #[command(subcommand)]
    command: BlueprintCommand,
}

#[derive(Subcommand, Debug)]
enum BlueprintCommand {
    /// List available blueprints, grouped by where they were found.
    #[command(alias = "ls")]
    List(list::ListArgs),
    /// Show a blueprint's settings and the files it would generate.
    Info(info::InfoArgs),
}

/// Dispatches `stencil blueprint <subcommand>`.
pub async fn handle_blueprint(args: BlueprintArgs) -> Result<()> {
    match args.command {
        BlueprintCommand::List(args) => list::handle_list(args).await,
        BlueprintCommand::Info(args) => info::handle_info(args).await,
    }
}
