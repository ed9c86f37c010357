// src/core/mod.rs

/// mtime-based freshness markers.
pub mod cache;
/// `stagehand.toml` loading.
pub mod config_loader;
/// Active environment file switching.
pub mod environment;
/// Error taxonomy of the lifecycle layer.
pub mod error;
pub mod lifecycle;
/// Path expansion for configured locations.
pub mod paths;
/// Interpreter detection and environment executable paths.
pub mod toolchain;
