//! # Stencil CLI Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! `stencil` generates project artifacts from blueprints: directory trees of
//! templates whose paths contain tokens (`__name__`, `__path__`, `__root__`,
//! ...) and whose contents are rendered with per-entity variables. Existing
//! files are compared first; identical ones are skipped, differing ones go
//! through an overwrite/skip/diff/edit prompt.
//!
//! ## Architecture
//!
//! - `commands`: clap argument structs and handlers per subcommand
//! - `common`: filesystem helpers and terminal UI (status lines, prompts)
//! - `core`: configuration, errors, templating and the blueprint engine
//!
//! ## Usage
//!
//! ```bash
//! stencil generate module foo-bar
//! stencil g module blog/post --pod --dry-run
//! stencil destroy module foo-bar
//! stencil blueprint list
//! stencil -vv generate in-repo-addon my-addon
//! ```
//!
//! Verbosity: default `warn`, `-v` info, `-vv` debug, `-vvv` trace. `RUST_LOG`
//! overrides the flag. Logs go to stderr; stdout carries status lines only.
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;

#[derive(Parser, Debug)]
#[command(
    name = "stencil",
    about = "Blueprint generator: scaffold, diff and destroy project artifacts",
    long_about = "Generate files from blueprints (token-mapped template trees), resolve \
                  conflicts with existing files interactively, and remove generated files again.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Generate files from a blueprint.
    #[command(alias = "g")]
    Generate(commands::generate::GenerateArgs),
    /// Remove the files a blueprint generates.
    #[command(alias = "d")]
    Destroy(commands::destroy::DestroyArgs),
    /// Inspect available blueprints.
    #[command(alias = "b")]
    Blueprint(commands::blueprint::BlueprintArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Generate(args) => commands::generate::handle_generate(args).await,
        Commands::Destroy(args) => commands::destroy::handle_destroy(args).await,
        Commands::Blueprint(args) => commands::blueprint::handle_blueprint(args).await,
    };

    if let Err(e) = command_result {
        tracing::debug!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
