use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::CommandConfig;
use crate::error::{ReleaseError, Result};
use crate::external::StepContext;

/// How an external program finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Succeeded,
    /// Non-zero exit; `None` when the process was killed by a signal
    Failed(Option<i32>),
}

/// Executes the external programs of the release steps
pub struct CommandExecutor;

impl CommandExecutor {
    /// Run `command` in `workdir` and wait for it to exit
    ///
    /// Standard input, output and error are inherited so the program talks to
    /// the terminal directly. There is no timeout.
    ///
    /// # Returns
    /// * `Ok(CommandStatus)` - The program ran; its exit status
    /// * `Err` - The program could not be started (not found, not executable)
    pub fn execute(
        command: &CommandConfig,
        workdir: &Path,
        context: &StepContext,
    ) -> Result<CommandStatus> {
        let program = resolve_program(&command.program, workdir);
        log::debug!(
            "running {} (step {}) in {}",
            command.display_line(),
            context.step.name(),
            workdir.display()
        );

        let status = Command::new(&program)
            .args(&command.args)
            .current_dir(workdir)
            .envs(context.to_env_vars())
            .status()
            .map_err(|e| {
                ReleaseError::command(format!("Failed to execute {}: {}", command.program, e))
            })?;

        if status.success() {
            Ok(CommandStatus::Succeeded)
        } else {
            Ok(CommandStatus::Failed(status.code()))
        }
    }
}

/// Programs given with a path component run relative to the repository root;
/// bare names are looked up on `PATH`.
fn resolve_program(program: &str, workdir: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        workdir.join(path)
    } else {
        path.to_path_buf()
    }
}
