// src/system/executor.rs

use crate::system::host::HostProfile;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Failures while launching or waiting for an external process.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The line has unbalanced quotes or escapes.
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    /// The line was blank.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The process could not be started.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The process ran and reported failure.
    #[error("Command '{command}' exited with {}.", describe_exit(.code))]
    NonZeroExitStatus {
        /// The command line as run.
        command: String,
        /// The exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by a signal)".to_string(),
    }
}

/// How a command line is turned into a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    /// The whole line is handed to the host shell (`sh -c` / `cmd /C`).
    /// Required for redirection and shell builtins such as `copy`.
    Shell,
    /// The line is split with shell-like rules and executed as an argument vector.
    Direct,
}

/// The only seam through which the orchestrator launches external processes.
pub trait CommandRunner: std::fmt::Debug {
    /// Runs `command_line` to completion with inherited standard streams.
    /// `cwd` of `None` means the current directory.
    fn run(&self, command_line: &str, cwd: Option<&Path>, mode: ShellMode)
    -> Result<(), ExecutionError>;

    /// Runs a short availability check with output discarded.
    /// Returns `true` only if the command launched and exited successfully.
    fn succeeds(&self, command_line: &str) -> bool;
}

/// Runs commands on the real host.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    host: HostProfile,
}

impl SystemRunner {
    /// A runner that builds shell lines for `host`.
    pub fn new(host: HostProfile) -> Self {
        Self { host }
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command_line: &str,
        cwd: Option<&Path>,
        mode: ShellMode,
    ) -> Result<(), ExecutionError> {
        log::info!("Running command: {}", command_line.trim());
        execute_command(command_line, cwd, mode, self.host, Stdio::inherit)
    }

    fn succeeds(&self, command_line: &str) -> bool {
        match execute_command(command_line, None, ShellMode::Direct, self.host, Stdio::null) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Availability check '{}' failed: {}", command_line, e);
                false
            }
        }
    }
}

/// Builds the process for a command line without spawning it.
fn build_command(
    command_line: &str,
    mode: ShellMode,
    host: HostProfile,
) -> Result<StdCommand, ExecutionError> {
    match mode {
        ShellMode::Shell => {
            let (shell, flag) = host.shell();
            let mut command = StdCommand::new(shell);
            command.arg(flag);
            // cmd.exe does its own parsing; passing the line through Rust's
            // argument quoting would mangle embedded quotes.
            #[cfg(windows)]
            {
                use std::os::windows::process::CommandExt;
                command.raw_arg(command_line);
            }
            #[cfg(not(windows))]
            command.arg(command_line);
            Ok(command)
        }
        ShellMode::Direct => {
            let parts = shlex::split(command_line)
                .ok_or_else(|| ExecutionError::CommandParse(command_line.to_string()))?;
            let (program, args) = parts.split_first().ok_or(ExecutionError::EmptyCommand)?;
            let mut command = StdCommand::new(program);
            command.args(args);
            Ok(command)
        }
    }
}

/// Executes a command line synchronously and waits for it to finish.
///
/// A non-zero exit status is reported as `NonZeroExitStatus`, carrying the exit
/// code (if any) and the command line. A launch failure is `CommandFailed`.
pub fn execute_command(
    command_line: &str,
    cwd: Option<&Path>,
    mode: ShellMode,
    host: HostProfile,
    output: fn() -> Stdio,
) -> Result<(), ExecutionError> {
    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let mut command = build_command(trimmed_command, mode, host)?;

    let clean_cwd = match cwd {
        Some(dir) => dunce::simplified(dir).to_path_buf(),
        None => std::env::current_dir()
            .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?,
    };

    let status = command
        .current_dir(&clean_cwd)
        .stdin(Stdio::inherit())
        .stdout(output())
        .stderr(output())
        .status()
        .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?;

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: trimmed_command.to_string(),
            code: status.code(),
        });
    }
    Ok(())
}

/// A `CommandRunner` that records invocations instead of launching processes.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// One call to `CommandRunner::run`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCommand {
        /// The command line as passed in.
        pub command: String,
        /// The requested working directory.
        pub cwd: Option<PathBuf>,
        /// How the line would have been launched.
        pub mode: ShellMode,
    }

    /// Records every call and succeeds unless told otherwise.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        recorded: RefCell<Vec<RecordedCommand>>,
        checks: RefCell<Vec<String>>,
        fail_on: Vec<String>,
        failing_checks: Vec<String>,
        materialize: Vec<(String, PathBuf)>,
    }

    impl RecordingRunner {
        /// A runner where every command and check succeeds.
        pub fn new() -> Self {
            Self::default()
        }

        /// Any command containing `pattern` exits with code 1.
        pub fn failing_on(mut self, pattern: &str) -> Self {
            self.fail_on.push(pattern.to_string());
            self
        }

        /// Any availability check containing `pattern` reports failure.
        pub fn failing_check(mut self, pattern: &str) -> Self {
            self.failing_checks.push(pattern.to_string());
            self
        }

        /// Creates `dir` whenever a successful command contains `pattern`.
        pub fn creating_dir_on(mut self, pattern: &str, dir: impl Into<PathBuf>) -> Self {
            self.materialize.push((pattern.to_string(), dir.into()));
            self
        }

        /// Every `run` call so far, in order.
        pub fn recorded(&self) -> Vec<RecordedCommand> {
            self.recorded.borrow().clone()
        }

        /// The command lines of every `run` call so far.
        pub fn commands(&self) -> Vec<String> {
            self.recorded
                .borrow()
                .iter()
                .map(|r| r.command.clone())
                .collect()
        }

        /// The command lines of every availability check so far.
        pub fn checks(&self) -> Vec<String> {
            self.checks.borrow().clone()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(
            &self,
            command_line: &str,
            cwd: Option<&Path>,
            mode: ShellMode,
        ) -> Result<(), ExecutionError> {
            self.recorded.borrow_mut().push(RecordedCommand {
                command: command_line.to_string(),
                cwd: cwd.map(Path::to_path_buf),
                mode,
            });

            if self.fail_on.iter().any(|p| command_line.contains(p.as_str())) {
                return Err(ExecutionError::NonZeroExitStatus {
                    command: command_line.to_string(),
                    code: Some(1),
                });
            }

            for (pattern, dir) in &self.materialize {
                if command_line.contains(pattern.as_str()) {
                    std::fs::create_dir_all(dir)
                        .map_err(|e| ExecutionError::CommandFailed(command_line.to_string(), e))?;
                }
            }
            Ok(())
        }

        fn succeeds(&self, command_line: &str) -> bool {
            self.checks.borrow_mut().push(command_line.to_string());
            !self
                .failing_checks
                .iter()
                .any(|p| command_line.contains(p.as_str()))
        }
    }
}
