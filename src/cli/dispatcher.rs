// src/cli/dispatcher.rs

use crate::{
    core::{error::LifecycleError, lifecycle::Lifecycle},
    models::{Command, CommandInvocation},
};
use std::path::Path;

/// Routes one invocation to its lifecycle operation.
///
/// Every command needs an up-to-date environment and a migration workspace,
/// so both are ensured first, unconditionally. `build` is declared on the
/// command line but has no operation behind it yet.
pub fn dispatch(
    invocation: &CommandInvocation,
    lifecycle: &Lifecycle<'_>,
    folder: &Path,
) -> Result<(), LifecycleError> {
    log::debug!("Dispatching {:?} in '{}'", invocation, folder.display());

    lifecycle.ensure_dependencies(folder)?;
    lifecycle.ensure_migration_scaffold(invocation.profile, folder)?;

    match &invocation.command {
        Command::Run => lifecycle.run_delegated_service(invocation.profile, folder),
        Command::Install { dependencies } => lifecycle.install_new_dependencies(dependencies, folder),
        Command::Test { filter } => lifecycle.run_test_suite(filter.as_deref(), folder),
        Command::Migrate {
            action,
            rollback_count,
        } => lifecycle.run_migration(*action, invocation.profile, *rollback_count, folder),
        Command::Build => Err(LifecycleError::NotImplemented("build")),
    }
}
