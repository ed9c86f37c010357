// src/core/error.rs

use crate::{core::cache::CacheError, system::executor::ExecutionError};
use thiserror::Error;

/// Failures surfaced by the lifecycle operations and the dispatcher.
///
/// Three classes matter to callers: precondition violations (bad input that
/// slipped past argument validation), process failures (an external tool failed
/// or could not start) and explicitly unimplemented features.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// A profile name outside `dev`, `prod` and `test`.
    #[error("Invalid environment type '{0}'. Use 'dev', 'prod' or 'test'.")]
    InvalidProfile(String),
    /// A required argument was empty.
    #[error("Missing required argument: {0}.")]
    MissingArgument(&'static str),
    /// `migrate down` asked to revert zero revisions.
    #[error("Invalid rollback count {0}. At least one revision must be reverted.")]
    InvalidRollbackCount(u32),
    /// The named feature is declared but has no implementation.
    #[error("'{0}' is not implemented yet.")]
    NotImplemented(&'static str),
    /// An external command could not start or exited unsuccessfully.
    #[error(transparent)]
    Process(#[from] ExecutionError),
    /// A staleness marker could not be written.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl LifecycleError {
    /// Bad input, rejected before any process was launched.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidProfile(_) | Self::MissingArgument(_) | Self::InvalidRollbackCount(_)
        )
    }

    /// A declared feature without an implementation.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }

    /// An external tool failed or could not be started.
    pub fn is_process_failure(&self) -> bool {
        matches!(self, Self::Process(_))
    }
}
