/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::Pid;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

// Re-export StorageError from storage module
pub use crate::storage::StorageError;

/// Registry-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process may have been removed or never existed. Check PID validity.")
    )]
    NotFound(Pid),

    #[error("Invalid priority {0} (must be 1-5)")]
    #[diagnostic(
        code(process::invalid_priority),
        help("Priority must be between 1 (most urgent) and 5 (least urgent).")
    )]
    InvalidPriority(u8),
}

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Process {0} not found in registry")]
    #[diagnostic(
        code(scheduler::process_not_found),
        help("Only registered processes can be admitted to the CPU queue.")
    )]
    NotFound(Pid),

    #[error("Process {0} is already queued")]
    #[diagnostic(
        code(scheduler::already_queued),
        help("A process can hold at most one position in the CPU queue.")
    )]
    AlreadyQueued(Pid),

    #[error("CPU queue is empty")]
    #[diagnostic(
        code(scheduler::queue_empty),
        help("Admit a process before dispatching.")
    )]
    Empty,
}

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SystemError {
    #[error("Process error: {0}")]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Storage error: {0}")]
    #[diagnostic(transparent)]
    Storage(#[from] StorageError),
}
