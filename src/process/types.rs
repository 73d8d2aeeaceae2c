/*!
 * Process Types
 * Common types for process management
 */

use crate::core::types::{Pid, Priority};
use serde::{Deserialize, Serialize};

/// Process operation result
pub type ProcessResult<T> = Result<T, crate::core::errors::ProcessError>;

/// Name reported for a PID that no longer resolves in the registry
pub const DELETED_NAME: &str = "[Deleted]";

/// Priority reported for a PID that no longer resolves in the registry
pub const PRIORITY_SENTINEL: i32 = -1;

/// Process metadata
///
/// Owned exclusively by the registry. The CPU queue and the memory stack
/// hold bare PIDs and resolve name/priority through the registry on demand,
/// so a priority change is visible everywhere immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    pub priority: Priority,
    /// True while the PID sits in the CPU queue. Maintained by the
    /// scheduler's admit/release operations, not by the registry.
    pub running: bool,
}

impl ProcessInfo {
    pub fn new(pid: Pid, name: String, priority: Priority) -> Self {
        Self {
            pid,
            name,
            priority,
            running: false,
        }
    }

    /// Human-readable state label
    pub fn state_label(&self) -> &'static str {
        if self.running {
            "Running"
        } else {
            "Ready"
        }
    }
}
