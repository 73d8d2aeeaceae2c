/*!
 * System State
 * Owned aggregate of the registry, CPU queue, and memory stack
 */

use crate::core::types::{Pid, Priority};
use crate::memory::{BlockUsage, MemoryResult, MemoryStack};
use crate::process::{ProcessInfo, ProcessRegistry, ProcessResult};
use crate::scheduler::{ReadyQueue, SchedulerResult};
use crate::storage::{self, StorageResult};
use std::path::Path;

/// The whole process-manager state with an explicit lifecycle: constructed
/// fresh or from a snapshot at startup, persisted at shutdown. The registry
/// is authoritative; queue and stack hold PIDs only.
#[derive(Debug, Clone, Default)]
pub struct System {
    pub registry: ProcessRegistry,
    pub queue: ReadyQueue,
    pub stack: MemoryStack,
}

impl System {
    pub fn new() -> Self {
        Self {
            registry: ProcessRegistry::new(),
            queue: ReadyQueue::new(),
            stack: MemoryStack::new(),
        }
    }

    /// Register a new process
    pub fn create(&mut self, name: impl Into<String>, priority: Priority) -> ProcessResult<Pid> {
        self.registry.add(name, priority)
    }

    /// Remove a process record; queue and stack membership is untouched
    pub fn terminate(&mut self, pid: Pid) -> ProcessResult<()> {
        self.registry.remove(pid)
    }

    /// Admit a process into the CPU queue
    pub fn admit(&mut self, pid: Pid) -> SchedulerResult<()> {
        self.queue.admit(&mut self.registry, pid)
    }

    /// Dispatch the front of the CPU queue
    pub fn dispatch(&mut self) -> SchedulerResult<Pid> {
        self.queue.release(&mut self.registry)
    }

    /// Assign a memory block to a process
    pub fn assign_block(&mut self, pid: Pid) -> MemoryResult<BlockUsage> {
        self.stack.acquire(&self.registry, pid)
    }

    /// Free the most recently assigned memory block
    pub fn free_block(&mut self) -> MemoryResult<Pid> {
        self.stack.release(&self.registry)
    }

    /// All process records, newest first
    pub fn processes(&self) -> &[ProcessInfo] {
        self.registry.list()
    }

    /// Persist the whole system to a snapshot file
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> StorageResult<()> {
        storage::save_to_path(path, self)
    }

    /// Boot a system from a snapshot file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        storage::load_from_path(path)
    }
}
