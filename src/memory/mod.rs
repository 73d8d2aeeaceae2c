/*!
 * Memory Management
 * Bounded LIFO stack of memory blocks keyed by owning PID
 */

use crate::core::limits::MAX_MEMORY_BLOCKS;
use crate::core::types::Pid;
use crate::process::ProcessRegistry;
use log::info;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Process {0} not found in registry")]
    #[diagnostic(
        code(memory::process_not_found),
        help("Only registered processes can hold memory blocks.")
    )]
    NotFound(Pid),

    #[error("Memory full ({used}/{capacity} blocks)")]
    #[diagnostic(
        code(memory::at_capacity),
        help("Free a block before assigning a new one.")
    )]
    AtCapacity { used: usize, capacity: usize },

    #[error("No memory blocks assigned")]
    #[diagnostic(
        code(memory::empty),
        help("Assign a block before freeing one.")
    )]
    Empty,
}

/// Block usage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BlockUsage {
    pub used: usize,
    pub capacity: usize,
}

/// Bounded LIFO stack of block-holding PIDs, capacity 10
///
/// Admission requires the PID to resolve in the registry, but nothing stops
/// the same PID from holding several blocks: `acquire` does not scan for
/// duplicates, so a double push inflates the used count with no
/// registry-side signal.
#[derive(Debug, Clone, Default)]
pub struct MemoryStack {
    blocks: Vec<Pid>,
}

impl MemoryStack {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Push a block for `pid` and return the updated usage
    pub fn acquire(&mut self, registry: &ProcessRegistry, pid: Pid) -> MemoryResult<BlockUsage> {
        if !registry.exists(pid) {
            return Err(MemoryError::NotFound(pid));
        }
        if self.blocks.len() >= MAX_MEMORY_BLOCKS {
            return Err(MemoryError::AtCapacity {
                used: self.blocks.len(),
                capacity: MAX_MEMORY_BLOCKS,
            });
        }
        self.blocks.push(pid);
        let usage = self.usage();
        info!(
            "Memory block assigned to '{}' ({}/{})",
            registry.name_of(pid),
            usage.used,
            usage.capacity
        );
        Ok(usage)
    }

    /// Pop the top block and return its owning PID
    pub fn release(&mut self, registry: &ProcessRegistry) -> MemoryResult<Pid> {
        let pid = self.blocks.pop().ok_or(MemoryError::Empty)?;
        info!(
            "Memory block freed from '{}' ({} free)",
            registry.name_of(pid),
            MAX_MEMORY_BLOCKS.saturating_sub(self.blocks.len())
        );
        Ok(pid)
    }

    pub fn usage(&self) -> BlockUsage {
        BlockUsage {
            used: self.blocks.len(),
            capacity: MAX_MEMORY_BLOCKS,
        }
    }

    /// Stack contents, top to bottom
    pub fn snapshot(&self) -> Vec<Pid> {
        self.blocks.iter().rev().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Rebuild from a snapshot, top-to-bottom order, bypassing the capacity
    /// check so a stack saved past capacity discipline restores verbatim.
    pub(crate) fn rebuild(&mut self, top_to_bottom: Vec<Pid>) {
        self.blocks = top_to_bottom.into_iter().rev().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_pids(count: usize) -> (ProcessRegistry, Vec<Pid>) {
        let mut registry = ProcessRegistry::new();
        let pids = (0..count)
            .map(|i| registry.add(format!("p{}", i), 3).unwrap())
            .collect();
        (registry, pids)
    }

    #[test]
    fn test_capacity_enforced_on_eleventh_block() {
        let (registry, pids) = registry_with_pids(11);
        let mut stack = MemoryStack::new();
        for pid in &pids[..10] {
            stack.acquire(&registry, *pid).unwrap();
        }
        assert_eq!(
            stack.acquire(&registry, pids[10]),
            Err(MemoryError::AtCapacity {
                used: 10,
                capacity: 10
            })
        );
        assert_eq!(stack.usage(), BlockUsage { used: 10, capacity: 10 });
    }

    #[test]
    fn test_acquire_unknown_pid() {
        let registry = ProcessRegistry::new();
        let mut stack = MemoryStack::new();
        assert_eq!(stack.acquire(&registry, 5), Err(MemoryError::NotFound(5)));
        assert_eq!(stack.usage().used, 0);
    }

    #[test]
    fn test_release_is_lifo() {
        let (registry, pids) = registry_with_pids(3);
        let mut stack = MemoryStack::new();
        for pid in &pids {
            stack.acquire(&registry, *pid).unwrap();
        }
        assert_eq!(stack.snapshot(), vec![pids[2], pids[1], pids[0]]);
        assert_eq!(stack.release(&registry).unwrap(), pids[2]);
        assert_eq!(stack.release(&registry).unwrap(), pids[1]);
        assert_eq!(stack.usage().used, 1);
    }

    #[test]
    fn test_release_empty_stack() {
        let registry = ProcessRegistry::new();
        let mut stack = MemoryStack::new();
        assert_eq!(stack.release(&registry), Err(MemoryError::Empty));
        assert_eq!(stack.usage().used, 0);
    }

    #[test]
    fn test_duplicate_pid_inflates_usage() {
        // Accepted design gap: no duplicate scan on acquire.
        let (registry, pids) = registry_with_pids(1);
        let mut stack = MemoryStack::new();
        stack.acquire(&registry, pids[0]).unwrap();
        stack.acquire(&registry, pids[0]).unwrap();
        assert_eq!(stack.usage().used, 2);
        assert_eq!(stack.snapshot(), vec![pids[0], pids[0]]);
    }

    #[test]
    fn test_rebuild_preserves_order_and_bypasses_capacity() {
        let (registry, pids) = registry_with_pids(12);
        let mut stack = MemoryStack::new();
        stack.rebuild(pids.clone());
        assert_eq!(stack.snapshot(), pids);
        assert_eq!(stack.usage().used, 12);
        // Over-capacity carryover still refuses new blocks
        assert!(matches!(
            stack.acquire(&registry, pids[0]),
            Err(MemoryError::AtCapacity { .. })
        ));
    }
}
