use std::path::PathBuf;

use crate::boundary::ReleaseWarning;
use crate::config::{CommandConfig, ReleaseConfig};
use crate::error::{ReleaseError, Result};
use crate::external::{CommandExecutor, CommandStatus, StepContext};
use crate::git::Repository;
use crate::pipeline::{ReleaseStep, StepOutcome};
use crate::version::{self, ReleaseVersions};

/// Runs the release steps against one repository.
///
/// Only a failed version bump stops a release. Git and external-program
/// failures become [ReleaseWarning]s on the step outcome, unless `strict`
/// is set, in which case the first one is returned as an error.
pub struct ReleasePipeline<'a, R: Repository> {
    repo: &'a R,
    config: &'a ReleaseConfig,
    versions: ReleaseVersions,
    tag: String,
    strict: bool,
}

impl<'a, R: Repository> ReleasePipeline<'a, R> {
    pub fn new(repo: &'a R, config: &'a ReleaseConfig, versions: ReleaseVersions) -> Self {
        let tag = version::render_template(&config.tag.pattern, &versions.new);
        ReleasePipeline {
            repo,
            config,
            versions,
            tag,
            strict: config.behavior.strict,
        }
    }

    /// Override the configured strict mode
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn versions(&self) -> &ReleaseVersions {
        &self.versions
    }

    /// Human-readable actions each step would take, for dry runs
    pub fn plan(&self) -> Vec<(ReleaseStep, Vec<String>)> {
        let new = &self.versions.new;
        let remote = &self.config.remote;

        ReleaseStep::ALL
            .iter()
            .map(|&step| {
                let actions = match step {
                    ReleaseStep::Bump => {
                        let mut actions: Vec<String> = self
                            .config
                            .version_files
                            .iter()
                            .map(|f| format!("replace {} with {} in {}", self.versions.old, new, f))
                            .collect();
                        actions.push(format!(
                            "commit \"{}\"",
                            version::render_template(&self.config.commit_message, new)
                        ));
                        actions.push(format!("push to {}", remote));
                        actions
                    }
                    ReleaseStep::Docs => vec![
                        format!("run {}", self.config.docs.command.display_line()),
                        format!(
                            "commit {} as \"{}\"",
                            self.config.docs.output_dir,
                            version::render_template(&self.config.docs.commit_message, new)
                        ),
                        format!("push to {}", remote),
                    ],
                    ReleaseStep::Tag => vec![
                        format!(
                            "create annotated tag {} (\"{}\")",
                            self.tag,
                            version::render_template(&self.config.tag.message, new)
                        ),
                        format!("push tags to {}", remote),
                    ],
                    ReleaseStep::Publish => {
                        vec![format!("run {}", self.config.publish.display_line())]
                    }
                    ReleaseStep::SecondaryBuild => {
                        vec![format!("run {}", self.config.secondary_build.display_line())]
                    }
                };
                (step, actions)
            })
            .collect()
    }

    /// Run a single step
    pub fn run_step(&self, step: ReleaseStep) -> Result<StepOutcome> {
        let mut outcome = StepOutcome::new(step);
        match step {
            ReleaseStep::Bump => self.bump(&mut outcome)?,
            ReleaseStep::Docs => self.generate_docs(&mut outcome)?,
            ReleaseStep::Tag => self.add_tag(&mut outcome)?,
            ReleaseStep::Publish => {
                self.run_command(&self.config.publish, step, &mut outcome)?
            }
            ReleaseStep::SecondaryBuild => {
                self.run_command(&self.config.secondary_build, step, &mut outcome)?
            }
        }
        Ok(outcome)
    }

    fn bump(&self, outcome: &mut StepOutcome) -> Result<()> {
        if self.versions.is_identical() {
            outcome.warnings.push(ReleaseWarning::IdenticalVersions {
                version: self.versions.new.clone(),
            });
        }

        let bumped = version::bump_files(
            self.repo.workdir(),
            &self.config.version_files,
            &self.versions,
        )?;
        log::info!("bumped {} file(s) to {}", bumped.len(), self.versions.new);

        let message = version::render_template(&self.config.commit_message, &self.versions.new);
        self.commit_and_push(&bumped, &message, outcome)
    }

    fn generate_docs(&self, outcome: &mut StepOutcome) -> Result<()> {
        self.run_command(&self.config.docs.command, ReleaseStep::Docs, outcome)?;

        let message =
            version::render_template(&self.config.docs.commit_message, &self.versions.new);
        let output_dir = vec![PathBuf::from(&self.config.docs.output_dir)];
        self.commit_and_push(&output_dir, &message, outcome)
    }

    fn add_tag(&self, outcome: &mut StepOutcome) -> Result<()> {
        let message = version::render_template(&self.config.tag.message, &self.versions.new);

        let created = self.repo.create_annotated_tag(&self.tag, &message);
        self.tolerate_git("tag", created, outcome)?;

        let pushed = self.repo.push_tags(&self.config.remote);
        self.tolerate_git("push --tags", pushed, outcome)
    }

    /// Stage exactly `paths`, commit them and push the current branch.
    /// Every operation is attempted even if an earlier one failed.
    fn commit_and_push(
        &self,
        paths: &[PathBuf],
        message: &str,
        outcome: &mut StepOutcome,
    ) -> Result<()> {
        let staged = self.repo.stage_paths(paths);
        self.tolerate_git("add", staged, outcome)?;

        match self.repo.commit(message) {
            Ok(hash) => log::info!("committed \"{}\" ({})", message, short_hash(&hash)),
            Err(ReleaseError::NothingToCommit(_)) => self.tolerate(
                ReleaseWarning::NothingToCommit {
                    message: message.to_string(),
                },
                outcome,
            )?,
            Err(e) => self.tolerate_git::<()>("commit", Err(e), outcome)?,
        }

        let pushed = self.repo.push_branch(&self.config.remote);
        self.tolerate_git("push", pushed, outcome)
    }

    fn run_command(
        &self,
        command: &CommandConfig,
        step: ReleaseStep,
        outcome: &mut StepOutcome,
    ) -> Result<()> {
        let context = StepContext::new(step, &self.versions, &self.tag);
        match CommandExecutor::execute(command, self.repo.workdir(), &context) {
            Ok(CommandStatus::Succeeded) => {
                log::info!("{} finished", command.display_line());
                Ok(())
            }
            Ok(CommandStatus::Failed(exit_code)) => self.tolerate(
                ReleaseWarning::CommandFailed {
                    command: command.display_line(),
                    exit_code,
                },
                outcome,
            ),
            Err(e) => self.tolerate(
                ReleaseWarning::CommandUnavailable {
                    command: command.display_line(),
                    reason: e.to_string(),
                },
                outcome,
            ),
        }
    }

    fn tolerate_git<T>(
        &self,
        operation: &str,
        result: Result<T>,
        outcome: &mut StepOutcome,
    ) -> Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => self.tolerate(
                ReleaseWarning::GitOperationFailed {
                    operation: operation.to_string(),
                    reason: e.to_string(),
                },
                outcome,
            ),
        }
    }

    fn tolerate(&self, warning: ReleaseWarning, outcome: &mut StepOutcome) -> Result<()> {
        if self.strict {
            return Err(ReleaseError::Strict {
                step: outcome.step,
                warning,
            });
        }
        log::warn!("{}: {}", outcome.step, warning);
        outcome.warnings.push(warning);
        Ok(())
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
