//! Main release orchestration logic
//!
//! Provides a clean separation between CLI argument parsing and the release
//! workflow so the workflow can be called programmatically without clap.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{self, ReleaseConfig};
use crate::git::{Git2Repository, Repository};
use crate::pipeline::{ReleasePipeline, ReleaseReport, ReleaseStep};
use crate::ui;
use crate::version::ReleaseVersions;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Version string to replace
    pub old: Option<String>,

    /// Version string to release
    pub new: Option<String>,

    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Working copy to release from
    pub repo_path: PathBuf,

    /// Skip the confirmation prompt
    pub force: bool,

    /// Preview mode - print the plan without changing anything
    pub dry_run: bool,

    /// Stop on the first ignored failure
    pub strict: bool,
}

impl Default for ReleaseArgs {
    fn default() -> Self {
        ReleaseArgs {
            old: None,
            new: None,
            config_path: None,
            repo_path: PathBuf::from("."),
            force: false,
            dry_run: false,
            strict: false,
        }
    }
}

/// How a release workflow ended
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    /// Dry run: the plan that would have been executed
    Planned(Vec<(ReleaseStep, Vec<String>)>),
    /// The user declined the confirmation prompt
    Cancelled,
    /// Every step ran
    Released(ReleaseReport),
}

/// Main release workflow
///
/// 1. Check both versions were given
/// 2. Open the repository and load configuration
/// 3. Print the plan (dry run) or ask for confirmation (unless forced)
/// 4. Run every pipeline step in order
pub fn run_release_workflow(args: &ReleaseArgs) -> Result<WorkflowResult> {
    let versions = ReleaseVersions::from_args(args.old.as_deref(), args.new.as_deref())?;

    let repo = Git2Repository::open(&args.repo_path)?;
    let config = config::load_config(args.config_path.as_deref(), repo.workdir())
        .context("Error loading config")?;

    release_with(&repo, &config, versions, args)
}

/// Release workflow against an already opened repository
pub fn release_with<R: Repository>(
    repo: &R,
    config: &ReleaseConfig,
    versions: ReleaseVersions,
    args: &ReleaseArgs,
) -> Result<WorkflowResult> {
    let strict = args.strict || config.behavior.strict;
    let pipeline = ReleasePipeline::new(repo, config, versions).strict(strict);

    if args.dry_run {
        let plan = pipeline.plan();
        ui::display_release_plan(&plan);
        return Ok(WorkflowResult::Planned(plan));
    }

    if !args.force {
        if ui::stdin_is_interactive() {
            if !ui::confirm_release(pipeline.versions(), pipeline.tag_name())? {
                println!("Release cancelled by user.");
                return Ok(WorkflowResult::Cancelled);
            }
        } else {
            ui::display_status(&format!(
                "Standard input is not a terminal; releasing {} without confirmation",
                pipeline.tag_name()
            ));
        }
    }

    let report = execute_pipeline(&pipeline)?;
    ui::display_release_summary(&report);
    ui::display_congratulations(&report.tag);

    Ok(WorkflowResult::Released(report))
}

/// Run every step in order, showing progress and ignored failures.
///
/// Stops at the first step that returns an error.
pub fn execute_pipeline<R: Repository>(
    pipeline: &ReleasePipeline<'_, R>,
) -> crate::error::Result<ReleaseReport> {
    let mut outcomes = Vec::with_capacity(ReleaseStep::ALL.len());

    for step in ReleaseStep::ALL {
        ui::display_step_header(step);
        log::info!("starting step {}", step);

        let outcome = pipeline.run_step(step)?;
        if outcome.is_clean() {
            ui::display_success(&format!("{} completed", step));
        } else {
            for warning in &outcome.warnings {
                ui::display_warning(warning);
            }
        }
        outcomes.push(outcome);
    }

    Ok(ReleaseReport {
        versions: pipeline.versions().clone(),
        tag: pipeline.tag_name().to_string(),
        outcomes,
    })
}
