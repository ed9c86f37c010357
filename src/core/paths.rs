// src/core/paths.rs

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while expanding a configured path.
#[derive(Error, Debug)]
pub enum PathError {
    /// The path cannot be expanded as text.
    #[error("Path '{0}' is not valid UTF-8 and cannot be expanded.")]
    NotUtf8(String),
    /// An unknown variable or an unresolvable home directory.
    #[error("Failed to expand path '{path}': {message}")]
    Expansion {
        /// The path as configured.
        path: String,
        /// The expander's explanation.
        message: String,
    },
}

/// Expands the home directory (`~`) and environment variables (`$VAR`, `${VAR}`)
/// in a configured path. Paths without either are returned unchanged.
pub fn expand_path(path: &Path) -> Result<PathBuf, PathError> {
    let raw = path
        .to_str()
        .ok_or_else(|| PathError::NotUtf8(path.display().to_string()))?;

    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        message: e.to_string(),
    })?;

    Ok(PathBuf::from(expanded.into_owned()))
}
