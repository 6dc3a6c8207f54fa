//! Blocking command runner.

use std::process::{Command, Stdio};

use cimerge_core::Environment;
use tracing::{info, warn};

use crate::{CommandError, CommandLine, CommandResult};

/// Something that can run a [`CommandLine`] to completion.
pub trait CommandRunner {
    /// Run `command` with the variables of `env` and wait for it to exit.
    fn run(&self, command: &CommandLine, env: &Environment) -> CommandResult<()>;
}

/// Runs commands as real child processes.
///
/// Standard streams are inherited, nothing is captured, and there is no
/// timeout: a command that never exits blocks the caller forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine, env: &Environment) -> CommandResult<()> {
        let shown = command.redacted();
        info!(command = %shown, "Running command");

        let status = Command::new(command.program())
            .args(command.arguments())
            .env_clear()
            .envs(env.vars())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| CommandError::Spawn {
                command: shown.clone(),
                source,
            })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => {
                warn!(command = %shown, code, "Command failed");
                Err(CommandError::Failed {
                    command: shown,
                    code,
                })
            }
            None => {
                warn!(command = %shown, "Command terminated by signal");
                Err(CommandError::Terminated { command: shown })
            }
        }
    }
}

/// Run `command` as a child process with the variables of `env`.
pub fn run(command: &CommandLine, env: &Environment) -> CommandResult<()> {
    SystemRunner.run(command, env)
}
