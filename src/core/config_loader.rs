// src/core/config_loader.rs

use crate::{
    constants::PROJECT_CONFIG_FILENAME,
    core::paths::{self, PathError},
    models::ProjectSettings,
};
use std::{fs, path::Path};
use thiserror::Error;

/// Failures while loading `stagehand.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists (or was named explicitly) but could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Read {
        /// The config file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Invalid TOML or an unknown key.
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// The config file.
        path: String,
        /// The deserializer error.
        #[source]
        source: toml::de::Error,
    },
    /// A configured path could not be expanded.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Loads the project settings.
///
/// With `explicit` set, that file must exist. Otherwise `stagehand.toml` in
/// `base_dir` is used if present, and the built-in defaults if not. `~` and
/// environment variables in `folder` and `cache_dir` are expanded; relative
/// paths stay relative to the working directory, so markers mirror them
/// as written.
pub fn load_settings(base_dir: &Path, explicit: Option<&Path>) -> Result<ProjectSettings, ConfigError> {
    let (config_path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (base_dir.join(PROJECT_CONFIG_FILENAME), false),
    };

    let mut settings = if !required && !config_path.exists() {
        log::debug!(
            "No config file at '{}', using defaults",
            config_path.display()
        );
        ProjectSettings::default()
    } else {
        read_settings(&config_path)?
    };

    settings.folder = paths::expand_path(&settings.folder)?;
    settings.cache_dir = paths::expand_path(&settings.cache_dir)?;
    Ok(settings)
}

fn read_settings(config_path: &Path) -> Result<ProjectSettings, ConfigError> {
    let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Read {
        path: config_path.display().to_string(),
        source: e,
    })?;
    let settings = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: config_path.display().to_string(),
        source: e,
    })?;
    log::debug!("Loaded config from '{}'", config_path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_config_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings(dir.path(), None).unwrap();

        assert_eq!(settings.folder, Path::new("ntt_server"));
        assert_eq!(settings.cache_dir, Path::new("temp"));
        assert_eq!(settings.toolchain.venv_dir, "venv");
    }

    #[test]
    fn test_config_file_in_base_dir_is_used() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("stagehand.toml"),
            "folder = \"api\"\ncache_dir = \".cache\"\n",
        )
        .unwrap();

        let settings = load_settings(dir.path(), None).unwrap();

        assert_eq!(settings.folder, Path::new("api"));
        assert_eq!(settings.cache_dir, Path::new(".cache"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = load_settings(dir.path(), Some(&missing));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stagehand.toml"), "folder = [").unwrap();

        let result = load_settings(dir.path(), None);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_absolute_folder_kept() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let config = dir.path().join("custom.toml");
        fs::write(
            &config,
            format!("folder = {:?}\n", elsewhere.path().display().to_string()),
        )
        .unwrap();

        let settings = load_settings(dir.path(), Some(&config)).unwrap();
        assert_eq!(settings.folder, elsewhere.path());
    }
}
