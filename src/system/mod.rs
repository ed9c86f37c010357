//! # System Interaction Layer
//!
//! The boundary between the orchestration logic and the host operating system.
//!
//! ## Modules
//!
//! - **`executor`**: The process runner. Every external tool invocation (interpreter,
//!   package installer, migration tool, file copies) goes through its `CommandRunner`
//!   trait, synchronously and with inherited standard streams.
//! - **`host`**: The `HostProfile` capability that owns every OS-family decision:
//!   executable layout inside a virtual environment, copy syntax, shell program
//!   and argument quoting.

/// Process launching behind the `CommandRunner` seam.
pub mod executor;
/// OS-family decisions.
pub mod host;
