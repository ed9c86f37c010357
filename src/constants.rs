// src/constants.rs

/// The name of the optional configuration file looked up in the working directory.
pub const PROJECT_CONFIG_FILENAME: &str = "stagehand.toml";

/// The managed sub-project folder, relative to the working directory.
pub const DEFAULT_PROJECT_FOLDER: &str = "ntt_server";

/// The root directory for staleness markers, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "temp";

/// The name of the provisioning (virtual environment) directory inside the managed folder.
pub const DEFAULT_VENV_DIR: &str = "venv";

/// The dependency manifest consumed by the package installer.
pub const DEFAULT_MANIFEST_FILENAME: &str = "requirements.txt";

/// The directory created by the migration tool's `init` command.
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// The script that starts the delegated web service.
pub const DEFAULT_SERVICE_ENTRY: &str = "server.py";

/// The single environment file read by the delegated service.
pub const DEFAULT_ACTIVE_ENV_FILENAME: &str = ".env";

/// The host interpreter tried first.
pub const DEFAULT_INTERPRETER: &str = "python";

/// The host interpreter used when the first one does not answer `--version`.
pub const DEFAULT_FALLBACK_INTERPRETER: &str = "python3";

/// The migration tool installed inside the provisioning environment.
pub const DEFAULT_MIGRATION_TOOL: &str = "alembic";

/// Extension appended to a tracked path to build its marker name.
pub const STAMP_EXTENSION: &str = "stamp";

/// Placeholder written into every marker. Only existence and mtime matter.
pub const STAMP_CONTENT: &str = "cached";
