// src/core/toolchain.rs

use crate::{
    models::{ToolchainConfig, ToolchainSettings},
    system::{executor::CommandRunner, host::HostProfile},
};
use std::path::Path;

/// Checks the host once and resolves where every tool lives.
///
/// The host interpreter name is the configured default if `<name> --version`
/// succeeds, otherwise the fallback. A failed check is never an error. The
/// provisioned interpreter and migration tool paths are computed from the
/// host layout and are not checked on disk.
pub fn detect_toolchain(
    runner: &dyn CommandRunner,
    host: HostProfile,
    settings: &ToolchainSettings,
) -> ToolchainConfig {
    let version_check = format!("{} --version", settings.interpreter);
    let interpreter_command = if runner.succeeds(&version_check) {
        settings.interpreter.clone()
    } else {
        log::debug!(
            "'{}' is not available, falling back to '{}'",
            settings.interpreter,
            settings.fallback_interpreter
        );
        settings.fallback_interpreter.clone()
    };

    let venv_dir = Path::new(&settings.venv_dir);
    let toolchain = ToolchainConfig {
        host,
        interpreter_command,
        interpreter: host.venv_executable(venv_dir, host.venv_interpreter_name()),
        migration_tool: host.venv_executable(venv_dir, &settings.migration_tool),
    };
    log::debug!("Detected toolchain: {:?}", toolchain);
    toolchain
}
