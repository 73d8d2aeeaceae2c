/*!
 * System Limits
 * Fixed bounds for priorities and memory blocks
 */

use super::types::Priority;

/// Most urgent priority a process can hold
pub const PRIORITY_MIN: Priority = 1;

/// Least urgent priority a process can hold
pub const PRIORITY_MAX: Priority = 5;

/// Maximum number of memory blocks the stack hands out
pub const MAX_MEMORY_BLOCKS: usize = 10;
