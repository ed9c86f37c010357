// src/models.rs

use crate::{constants::*, core::error::LifecycleError, system::host::HostProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// --- RUNTIME MODELS ---

/// A named environment configuration variant.
///
/// Activating a profile copies `.<name>.env` over the active environment file.
/// The orchestrator never looks inside those files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Local development, the default for `--type`.
    Dev,
    /// Production settings.
    Prod,
    /// Selected only by the test command.
    Test,
}

impl Profile {
    /// The lowercase name used on the command line and in `.<name>.env`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
            Self::Test => "test",
        }
    }

    /// The per-profile source file, by convention `.<name>.env`.
    pub fn source_file(&self) -> String {
        format!(".{}.env", self.name())
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            "test" => Ok(Self::Test),
            other => Err(LifecycleError::InvalidProfile(other.to_string())),
        }
    }
}

/// What `migrate` should do.
///
/// The set is closed at the command line by `clap::ValueEnum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MigrationAction {
    /// Apply every pending revision.
    Up,
    /// Revert the last `--rollback-count` revisions.
    Down,
    /// Report applied revisions (not implemented yet).
    Status,
    /// Autogenerate a new revision from the current models.
    Update,
}

impl MigrationAction {
    /// The action as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Status => "status",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for MigrationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated command together with exactly the options it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the delegated service.
    Run,
    /// Run the test suite.
    Test {
        /// Optional test-selection expression.
        filter: Option<String>,
    },
    /// Install packages and regenerate the manifest.
    Install {
        /// Package names, at least one.
        dependencies: Vec<String>,
    },
    /// Production build (not implemented yet).
    Build,
    /// Run a migration action.
    Migrate {
        /// The action to perform.
        action: MigrationAction,
        /// Revisions reverted by `down`, at least 1.
        rollback_count: u32,
    },
}

/// The parsed operator request for this process run. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// The routed command and its options.
    pub command: Command,
    /// The environment type used to run the service, migrations and scaffolding.
    pub profile: Profile,
}

/// Resolved tool locations, detected once at startup.
///
/// Executable paths are relative to the managed folder and are computed, not
/// verified: they only exist after the provisioning environment is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    /// The OS family the paths and commands were computed for.
    pub host: HostProfile,
    /// The host interpreter used to create the environment (`python` or its fallback).
    pub interpreter_command: String,
    /// The interpreter inside the provisioning environment.
    pub interpreter: PathBuf,
    /// The migration tool inside the provisioning environment.
    pub migration_tool: PathBuf,
}

// --- `stagehand.toml` MODELS ---

/// The `[toolchain]` table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainSettings {
    /// Interpreter tried first on the host.
    pub interpreter: String,
    /// Interpreter used when the first one does not answer `--version`.
    pub fallback_interpreter: String,
    /// Provisioning environment directory, relative to the managed folder.
    pub venv_dir: String,
    /// Migration tool executable name inside the environment.
    pub migration_tool: String,
}

impl Default for ToolchainSettings {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            fallback_interpreter: DEFAULT_FALLBACK_INTERPRETER.to_string(),
            venv_dir: DEFAULT_VENV_DIR.to_string(),
            migration_tool: DEFAULT_MIGRATION_TOOL.to_string(),
        }
    }
}

/// The `[project]` table. All names are relative to the managed folder.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectLayout {
    /// The dependency manifest.
    pub manifest: String,
    /// The migration workspace directory.
    pub migrations_dir: String,
    /// The script started by `run`.
    pub service_entry: String,
    /// The file each profile is copied over.
    pub active_env_file: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_MANIFEST_FILENAME.to_string(),
            migrations_dir: DEFAULT_MIGRATIONS_DIR.to_string(),
            service_entry: DEFAULT_SERVICE_ENTRY.to_string(),
            active_env_file: DEFAULT_ACTIVE_ENV_FILENAME.to_string(),
        }
    }
}

/// Represents the deserialized structure of a `stagehand.toml` file.
/// Every field has a default, so an empty or missing file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// The managed folder.
    pub folder: PathBuf,
    /// Root of the staleness markers.
    pub cache_dir: PathBuf,
    /// Interpreter and environment settings.
    pub toolchain: ToolchainSettings,
    /// File and directory names inside the managed folder.
    pub project: ProjectLayout,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_PROJECT_FOLDER),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            toolchain: ToolchainSettings::default(),
            project: ProjectLayout::default(),
        }
    }
}
