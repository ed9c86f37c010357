// src/system/host.rs

use std::path::{Path, PathBuf};

/// Characters `cmd.exe` interprets outside double quotes.
const CMD_METACHARACTERS: &[char] = &['&', '|', '<', '>', '^', '(', ')', '%', '!', '"'];

/// The OS family the orchestrator runs on.
///
/// Detected once at startup and carried in `ToolchainConfig`. Every place that
/// builds a platform-dependent command or path asks this value instead of
/// checking `cfg!` inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostProfile {
    /// `cmd.exe`, `Scripts\<name>.exe` environments.
    Windows,
    /// `sh`, `bin/<name>` environments.
    Posix,
}

impl HostProfile {
    /// The family of the host this binary was compiled for.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Path of an executable installed inside a virtual environment directory.
    pub fn venv_executable(&self, venv_dir: &Path, name: &str) -> PathBuf {
        match self {
            Self::Windows => venv_dir.join("Scripts").join(format!("{}.exe", name)),
            Self::Posix => venv_dir.join("bin").join(name),
        }
    }

    /// The interpreter binary name inside a provisioned environment.
    pub fn venv_interpreter_name(&self) -> &'static str {
        match self {
            Self::Windows => "python",
            Self::Posix => "python3",
        }
    }

    /// Builds a file copy command line for the host shell. Both operands are quoted.
    pub fn copy_command(&self, source: &str, destination: &str) -> String {
        let (source, destination) = (self.quote(source), self.quote(destination));
        match self {
            Self::Windows => format!("copy {} {}", source, destination),
            Self::Posix => format!("cp {} {}", source, destination),
        }
    }

    /// The shell program and the flag that makes it run a single command line.
    pub fn shell(&self) -> (&'static str, &'static str) {
        match self {
            Self::Windows => ("cmd", "/C"),
            Self::Posix => ("sh", "-c"),
        }
    }

    /// Quotes an argument so it survives being spliced into a shell line.
    ///
    /// On Windows the value is wrapped in double quotes when it is empty or
    /// holds whitespace or a `cmd` metacharacter, with embedded quotes doubled.
    /// Values without any of those are returned unchanged on both families.
    pub fn quote(&self, value: &str) -> String {
        match self {
            Self::Windows => {
                let needs_quotes = value.is_empty()
                    || value.contains(char::is_whitespace)
                    || value.contains(CMD_METACHARACTERS);
                if needs_quotes {
                    format!("\"{}\"", value.replace('"', "\"\""))
                } else {
                    value.to_string()
                }
            }
            Self::Posix => {
                // `try_quote` only rejects interior NUL bytes, which no shell line can carry.
                let cleaned = value.replace('\0', "");
                shlex::try_quote(&cleaned)
                    .map(|quoted| quoted.into_owned())
                    .unwrap_or_else(|_| cleaned.clone())
            }
        }
    }
}
