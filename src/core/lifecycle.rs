// src/core/lifecycle.rs

//! # Lifecycle Operations
//!
//! The policy layer. Each operation composes the staleness cache, the
//! environment switcher and the process runner in a fixed order. All paths
//! handed to external tools are relative to the managed folder, which is also
//! the working directory of every command launched from here.

use crate::{
    core::{cache::StalenessCache, environment::EnvironmentSwitcher, error::LifecycleError},
    models::{MigrationAction, Profile, ProjectSettings, ToolchainConfig},
    system::executor::{CommandRunner, ShellMode},
};
use log::info;
use std::path::Path;

/// The lifecycle operations over one managed folder, bound to the tools and
/// cache resolved at startup.
#[derive(Debug)]
pub struct Lifecycle<'a> {
    runner: &'a dyn CommandRunner,
    toolchain: &'a ToolchainConfig,
    cache: &'a StalenessCache,
    settings: &'a ProjectSettings,
}

impl<'a> Lifecycle<'a> {
    /// Binds the operations to a runner, the detected toolchain, the marker
    /// cache and the loaded settings.
    pub fn new(
        runner: &'a dyn CommandRunner,
        toolchain: &'a ToolchainConfig,
        cache: &'a StalenessCache,
        settings: &'a ProjectSettings,
    ) -> Self {
        Self {
            runner,
            toolchain,
            cache,
            settings,
        }
    }

    fn run(&self, command: &str, folder: &Path) -> Result<(), LifecycleError> {
        self.runner.run(command, Some(folder), ShellMode::Shell)?;
        Ok(())
    }

    fn switcher(&self) -> EnvironmentSwitcher<'_> {
        EnvironmentSwitcher::new(
            self.runner,
            self.toolchain.host,
            &self.settings.project.active_env_file,
        )
    }

    /// Quotes a configured name or path for the host shell.
    fn quoted(&self, value: &str) -> String {
        self.toolchain.host.quote(value)
    }

    fn python(&self) -> String {
        self.quoted(&self.toolchain.interpreter.display().to_string())
    }

    fn migration_tool(&self) -> String {
        self.quoted(&self.toolchain.migration_tool.display().to_string())
    }

    /// Makes sure the provisioning environment exists and matches the manifest.
    ///
    /// Does nothing when the environment exists and the manifest has not changed
    /// since the last successful install. The manifest is stamped only after the
    /// install succeeded, so a failed install is retried on the next run.
    pub fn ensure_dependencies(&self, folder: &Path) -> Result<(), LifecycleError> {
        let manifest_name = &self.settings.project.manifest;
        let venv_dir = &self.settings.toolchain.venv_dir;
        let manifest = folder.join(manifest_name);

        let env_exists = folder.join(venv_dir).exists();
        let manifest_stale = self.cache.is_stale(&manifest);

        if env_exists && !manifest_stale {
            info!("Dependencies already installed in folder: {}", folder.display());
            return Ok(());
        }

        let python = self.python();
        if !env_exists {
            info!("Creating virtual environment in folder: {}", folder.display());
            self.run(
                &format!(
                    "{} -m venv {}",
                    self.quoted(&self.toolchain.interpreter_command),
                    self.quoted(venv_dir)
                ),
                folder,
            )?;

            info!("Updating the pip package manager...");
            self.run(&format!("{} -m pip install --upgrade pip", python), folder)?;
        }

        info!("Installing required packages from {}...", manifest_name);
        self.run(
            &format!("{} -m pip install -r {}", python, self.quoted(manifest_name)),
            folder,
        )?;
        info!("Dependencies installed successfully.");

        self.cache.record_fresh(&manifest)?;
        Ok(())
    }

    /// Installs new packages and regenerates the manifest from the installed set.
    ///
    /// This is what produces a fresh manifest, so it never asks the cache first.
    pub fn install_new_dependencies(
        &self,
        names: &[String],
        folder: &Path,
    ) -> Result<(), LifecycleError> {
        if names.is_empty() {
            return Err(LifecycleError::MissingArgument("dependencies"));
        }

        let manifest_name = &self.settings.project.manifest;
        let python = self.python();

        info!("Installing new dependencies: {}", names.join(" "));
        let packages: Vec<String> = names.iter().map(|name| self.quoted(name)).collect();
        self.run(
            &format!("{} -m pip install {}", python, packages.join(" ")),
            folder,
        )?;
        self.run(
            &format!("{} -m pip freeze > {}", python, self.quoted(manifest_name)),
            folder,
        )?;

        self.cache.record_fresh(&folder.join(manifest_name))?;
        Ok(())
    }

    /// Initializes the migration workspace unless its directory already exists.
    pub fn ensure_migration_scaffold(
        &self,
        profile: Profile,
        folder: &Path,
    ) -> Result<(), LifecycleError> {
        let migrations_dir = &self.settings.project.migrations_dir;
        if folder.join(migrations_dir).exists() {
            log::debug!("Migration workspace already present in {}", folder.display());
            return Ok(());
        }

        info!("Creating migration workspace in folder: {}", folder.display());
        self.switcher().activate_profile(profile, folder)?;
        self.run(
            &format!("{} init {}", self.migration_tool(), self.quoted(migrations_dir)),
            folder,
        )
    }

    /// Starts the delegated service and blocks until it exits.
    pub fn run_delegated_service(&self, profile: Profile, folder: &Path) -> Result<(), LifecycleError> {
        self.switcher().activate_profile(profile, folder)?;
        info!("Starting service with the '{}' environment", profile);
        self.run(
            &format!(
                "{} {}",
                self.python(),
                self.quoted(&self.settings.project.service_entry)
            ),
            folder,
        )
    }

    /// Runs the test suite under the `test` profile, optionally narrowed by `filter`.
    pub fn run_test_suite(&self, filter: Option<&str>, folder: &Path) -> Result<(), LifecycleError> {
        self.switcher().activate_profile(Profile::Test, folder)?;

        let mut command = format!("{} -m pytest", self.python());
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            command.push_str(" -k ");
            command.push_str(&self.quoted(filter));
        }
        self.run(&command, folder)
    }

    /// Runs one migration action under `profile`.
    ///
    /// `status` is not implemented and, like a zero `down` count, fails before
    /// the profile is activated.
    pub fn run_migration(
        &self,
        action: MigrationAction,
        profile: Profile,
        rollback_count: u32,
        folder: &Path,
    ) -> Result<(), LifecycleError> {
        let tool = self.migration_tool();
        let command = match action {
            MigrationAction::Status => return Err(LifecycleError::NotImplemented("migrate status")),
            MigrationAction::Down if rollback_count == 0 => {
                return Err(LifecycleError::InvalidRollbackCount(rollback_count));
            }
            MigrationAction::Up => format!("{} upgrade head", tool),
            MigrationAction::Down => format!("{} downgrade -{}", tool, rollback_count),
            MigrationAction::Update => format!(
                "{} revision --autogenerate -m {}",
                tool,
                self.quoted("auto update")
            ),
        };

        self.switcher().activate_profile(profile, folder)?;
        info!("Running migration action '{}'", action);
        self.run(&command, folder)
    }
}
