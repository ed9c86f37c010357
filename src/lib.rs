//! Lifecycle orchestration for one managed Python sub-project.
//!
//! `stagehand` keeps the sub-project's virtual environment in sync with its
//! dependency manifest, scaffolds the migration workspace, switches the active
//! environment file between profiles, and runs the service, the test suite and
//! migrations through the tools installed in that environment.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic))]

/// Command-line surface and dispatch.
pub mod cli;
/// Default names and file conventions.
pub mod constants;
/// Staleness cache, toolchain detection, environment switching and lifecycle operations.
pub mod core;
/// Runtime and configuration models.
pub mod models;
/// Process execution and host OS decisions.
pub mod system;
