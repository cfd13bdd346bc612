//! Process runner.
//!
//! Executes one fully formed command line, blocks until it exits, and reports
//! the exit status. A non-zero exit is logged as a warning and returned as
//! [`RunOutcome::Failed`]; only failures to spawn or wait are errors.
//!
//! The command line is handed to the platform shell (`/bin/sh -c` on Unix,
//! `cmd.exe /C` on Windows). That choice is the only platform-specific piece of
//! the compile path.

use std::io;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to spawn `{command}`: {source}")]
  Spawn { command: String, source: io::Error },

  #[error("failed waiting for `{command}`: {source}")]
  Wait { command: String, source: io::Error },

  #[error("failed to create process runtime: {0}")]
  Runtime(#[source] io::Error),
}

/// How a spawned process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
  Success,
  /// Exited with a non-zero status (`None` when terminated by a signal).
  Failed { code: Option<i32> },
  /// Killed after exceeding the requested timeout.
  TimedOut,
}

impl RunOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, RunOutcome::Success)
  }
}

/// Spawns a command line and waits for it to exit.
pub trait ProcessRunner {
  fn run(&self, command_line: &str, working_dir: &Path, timeout: Option<Duration>) -> Result<RunOutcome, ProcessError>;
}

/// Runs command lines through the platform shell.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
  shell: Option<String>,
}

impl ShellRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Use a specific shell instead of the platform default.
  pub fn with_shell(shell: impl Into<String>) -> Self {
    Self {
      shell: Some(shell.into()),
    }
  }
}

impl ProcessRunner for ShellRunner {
  fn run(&self, command_line: &str, working_dir: &Path, timeout: Option<Duration>) -> Result<RunOutcome, ProcessError> {
    let (shell, shell_args) = get_shell(self.shell.as_deref());

    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(ProcessError::Runtime)?;

    let mut command = Command::new(&shell);
    command.args(&shell_args).current_dir(working_dir).kill_on_drop(true);
    push_command_line(&mut command, command_line);

    info!(cmd = %command_line, "running command");
    debug!(shell = %shell, working_dir = ?working_dir, "spawning process");

    runtime.block_on(spawn_and_wait(command, command_line, timeout))
  }
}

async fn spawn_and_wait(
  mut command: Command,
  command_line: &str,
  timeout: Option<Duration>,
) -> Result<RunOutcome, ProcessError> {
  let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
    command: command_line.to_string(),
    source,
  })?;

  let waited = match timeout {
    Some(limit) => {
      let result = tokio::time::timeout(limit, child.wait()).await;
      match result {
        Ok(status) => status,
        Err(_) => {
          warn!(cmd = %command_line, timeout = ?limit, "command timed out, killing it");
          if let Err(e) = child.kill().await {
            warn!(error = %e, "failed to kill timed out process");
          }
          return Ok(RunOutcome::TimedOut);
        }
      }
    }
    None => child.wait().await,
  };

  let status = waited.map_err(|source| ProcessError::Wait {
    command: command_line.to_string(),
    source,
  })?;

  if status.success() {
    Ok(RunOutcome::Success)
  } else {
    warn!(code = ?status.code(), "compiler exited with non-zero status");
    Ok(RunOutcome::Failed { code: status.code() })
  }
}

#[cfg(unix)]
fn push_command_line(command: &mut Command, command_line: &str) {
  command.arg(command_line);
}

#[cfg(windows)]
fn push_command_line(command: &mut Command, command_line: &str) {
  // cmd.exe parses its own quoting, so the line must reach it untouched.
  command.raw_arg(command_line);
}

/// Get the shell command and arguments for the current platform.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    ("cmd.exe".to_string(), vec!["/C".to_string()])
  }
}
