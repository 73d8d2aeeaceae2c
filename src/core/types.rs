/*!
 * Core Types
 * Common types used across the process manager
 */

/// Process ID type
pub type Pid = u32;

/// Priority level (1-5, lower is more urgent)
pub type Priority = u8;

/// Common result type for system-level operations
pub type SystemResult<T> = Result<T, super::errors::SystemError>;
