//! # Stencil Destroy Command
//!
//! File: cli/src/commands/destroy.rs
//!
//! ## Overview
//!
//! `stencil destroy <blueprint> <name>` (alias `d`) removes every file the
//! blueprint would generate for `<name>`, then runs the blueprint's uninstall
//! hooks (pruning emptied directories, unregistering in-repo addons).
//!
//! Files are removed by template membership: a generated file that was edited
//! afterwards is removed too. Missing files are not an error, so destroying
//! twice is harmless.
//!
//! ```bash
//! stencil destroy module foo-bar
//! stencil d module foo-bar --dry-run
//! ```
//!
use crate::commands::shared::{announce_dry_run, prepare_run, TargetArgs};
use crate::common::ui;
use crate::core::blueprint::committer::Committer;
use crate::core::blueprint::Target;
use crate::core::error::Result;
use crate::core::templating::TeraRenderer;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn handle_destroy(args: DestroyArgs) -> Result<()> {
    info!("Handling destroy command...");
    let run = prepare_run(&args.target)?;
    announce_dry_run(&run.options);

    let target = Target {
        project_root: &run.project_root,
        entity_name: &args.target.name,
        options: &run.options,
    };
    let mut committer = Committer::new(&TeraRenderer, std::io::stdout(), ui::stdout_supports_color());
    let summary = run.blueprint.uninstall(&target, &mut committer).await?;
    info!(
        "Removed {} of {} file(s) for '{}' ({} already absent)",
        summary.removed,
        summary.total(),
        args.target.name,
        summary.already_absent
    );
    Ok(())
}
