//! External command execution for project builds.

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Errors that can occur while running a build command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to execute '{command}': {message}")]
    Spawn { command: String, message: String },

    #[error("Failed to wait for '{command}': {message}")]
    Wait { command: String, message: String },

    #[error("'{command}' failed with status {code}")]
    Exit { command: String, code: i32 },

    #[error("'{command}' timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
}

/// Runs a shell command line inside a project directory.
///
/// Implementations block until the command finishes. A non-zero exit is an
/// error.
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `cwd` as the working directory.
    fn run(&self, command: &str, cwd: &Path) -> Result<(), RunError>;
}

/// Runs commands through the platform shell with inherited stdio, so build
/// output streams straight to the console.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    timeout: Option<Duration>,
}

impl ShellRunner {
    /// Create a runner with no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path) -> Result<(), RunError> {
        let mut cmd = shell_command(command);
        cmd.current_dir(cwd);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| RunError::Spawn {
            command: command.to_string(),
            message: e.to_string(),
        })?;

        let status = match self.timeout {
            Some(limit) => wait_with_timeout(&mut child, command, limit)?,
            None => child.wait().map_err(|e| RunError::Wait {
                command: command.to_string(),
                message: e.to_string(),
            })?,
        };

        if !status.success() {
            return Err(RunError::Exit {
                command: command.to_string(),
                code: status.code().unwrap_or(-1),
            });
        }

        Ok(())
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

fn wait_with_timeout(
    child: &mut Child,
    command: &str,
    limit: Duration,
) -> Result<ExitStatus, RunError> {
    let deadline = Instant::now() + limit;
    let poll = Duration::from_millis(100);

    loop {
        let waited = child.try_wait().map_err(|e| RunError::Wait {
            command: command.to_string(),
            message: e.to_string(),
        })?;

        if let Some(status) = waited {
            return Ok(status);
        }

        if Instant::now() >= deadline {
            // Reap the child; the kill result does not change the outcome
            let _ = child.kill();
            let _ = child.wait();
            return Err(RunError::Timeout {
                command: command.to_string(),
                secs: limit.as_secs(),
            });
        }

        thread::sleep(poll);
    }
}
