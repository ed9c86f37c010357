// src/core/environment.rs

use crate::{
    core::error::LifecycleError,
    models::Profile,
    system::{
        executor::{CommandRunner, ShellMode},
        host::HostProfile,
    },
};
use std::path::Path;

/// Makes one of the named profiles the active environment of a folder by
/// copying `.<profile>.env` over the active environment file.
#[derive(Debug)]
pub struct EnvironmentSwitcher<'a> {
    runner: &'a dyn CommandRunner,
    host: HostProfile,
    active_env_file: &'a str,
}

impl<'a> EnvironmentSwitcher<'a> {
    /// A switcher that overwrites `active_env_file` inside the managed folder.
    pub fn new(runner: &'a dyn CommandRunner, host: HostProfile, active_env_file: &'a str) -> Self {
        Self {
            runner,
            host,
            active_env_file,
        }
    }

    /// Validates `profile_name` against the closed profile set and activates it.
    /// An unknown name fails before any process is launched.
    pub fn activate(&self, profile_name: &str, folder: &Path) -> Result<(), LifecycleError> {
        let profile: Profile = profile_name.parse()?;
        self.activate_profile(profile, folder)
    }

    /// Copies the profile's source file over the active environment file,
    /// running the copy with `folder` as the working directory.
    pub fn activate_profile(&self, profile: Profile, folder: &Path) -> Result<(), LifecycleError> {
        log::debug!("Activating '{}' environment in '{}'", profile, folder.display());
        let command = self
            .host
            .copy_command(&profile.source_file(), self.active_env_file);
        self.runner.run(&command, Some(folder), ShellMode::Shell)?;
        Ok(())
    }
}
