//! # Stencil Generate Command
//!
//! File: cli/src/commands/generate.rs
//!
//! ## Overview
//!
//! `stencil generate <blueprint> <name>` (alias `g`) installs a blueprint into
//! the current project. Every file is classified against what is already on
//! disk; conflicting files are resolved interactively unless `--force` or
//! `--skip-existing` answers for all of them.
//!
//! ## Examples
//!
//! ```bash
//! stencil generate module foo-bar
//! stencil g module blog/post --pod --dry-run
//! stencil g in-repo-addon my-addon --skip-existing
//! stencil g module foo --var author="Jane Doe"
//! ```
//!
use crate::commands::shared::{announce_dry_run, prepare_run, TargetArgs};
use crate::common::ui::{self, prompts::TerminalPrompter};
use crate::core::blueprint::committer::Committer;
use crate::core::blueprint::resolver::{Policy, PolicyPrompter};
use crate::core::blueprint::Target;
use crate::core::error::Result;
use crate::core::templating::TeraRenderer;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Overwrite every conflicting file without asking.
    #[arg(long, short = 'f', conflicts_with = "skip_existing")]
    pub force: bool,

    /// Keep every conflicting file without asking.
    #[arg(long, short = 's')]
    pub skip_existing: bool,

    /// Re-run over an existing project; `.gitkeep` placeholders are ignored.
    #[arg(long)]
    pub update: bool,
}

impl GenerateArgs {
    fn policy(&self) -> Option<Policy> {
        if self.force {
            Some(Policy::OverwriteAll)
        } else if self.skip_existing {
            Some(Policy::SkipAll)
        } else {
            None
        }
    }
}

pub async fn handle_generate(args: GenerateArgs) -> Result<()> {
    info!("Handling generate command...");
    let mut run = prepare_run(&args.target)?;
    run.options.update = args.update;
    announce_dry_run(&run.options);

    let color = ui::stdout_supports_color();
    let target = Target {
        project_root: &run.project_root,
        entity_name: &args.target.name,
        options: &run.options,
    };
    let mut committer = Committer::new(&TeraRenderer, std::io::stdout(), color);
    let summary = match args.policy() {
        Some(policy) => {
            let mut prompter = PolicyPrompter::new(policy);
            run.blueprint.install(&target, &mut prompter, &mut committer).await?
        }
        None => {
            let mut prompter = TerminalPrompter::new(color);
            run.blueprint.install(&target, &mut prompter, &mut committer).await?
        }
    };

    info!(
        "Generated '{}' with blueprint '{}': {} created, {} overwritten, {} unchanged",
        args.target.name,
        run.blueprint.name(),
        summary.created,
        summary.overwritten + summary.edited,
        summary.identical + summary.skipped
    );
    Ok(())
}
