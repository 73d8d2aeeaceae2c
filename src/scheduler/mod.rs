/*!
 * CPU Scheduler
 * Priority-ordered ready queue over registry PIDs
 */

use crate::core::errors::SchedulerError;
use crate::core::types::Pid;
use crate::process::ProcessRegistry;
use log::{info, warn};

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Ready queue of PIDs, front = next to dispatch
///
/// Lower priority value means more urgent. Insertion order is not a heap:
/// a newly admitted PID whose priority strictly beats the head goes in
/// front; otherwise the queue is scanned forward while the next entry's
/// priority is <= the new one, and the PID lands after the last such entry.
/// Equal-priority admissions therefore jump ahead only at the very front.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    entries: Vec<Pid>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Admit a PID into the queue and mark the process running
    ///
    /// Priorities are resolved through the registry at admission time, so
    /// dangling entries already in the queue compare as the `-1` sentinel.
    pub fn admit(&mut self, registry: &mut ProcessRegistry, pid: Pid) -> SchedulerResult<()> {
        if !registry.exists(pid) {
            return Err(SchedulerError::NotFound(pid));
        }
        if self.contains(pid) {
            return Err(SchedulerError::AlreadyQueued(pid));
        }

        let priority = registry.priority_of(pid);
        if self.entries.is_empty() || priority < registry.priority_of(self.entries[0]) {
            self.entries.insert(0, pid);
        } else {
            let mut idx = 0;
            while idx + 1 < self.entries.len()
                && registry.priority_of(self.entries[idx + 1]) <= priority
            {
                idx += 1;
            }
            self.entries.insert(idx + 1, pid);
        }

        if let Some(proc) = registry.get_mut(pid) {
            proc.running = true;
        }
        info!("'{}' admitted to CPU queue (PID {})", registry.name_of(pid), pid);
        Ok(())
    }

    /// Remove and return the front PID, clearing its running flag
    pub fn release(&mut self, registry: &mut ProcessRegistry) -> SchedulerResult<Pid> {
        if self.entries.is_empty() {
            return Err(SchedulerError::Empty);
        }
        let pid = self.entries.remove(0);
        match registry.get_mut(pid) {
            Some(proc) => proc.running = false,
            // Removed from the registry while queued; nothing left to flag.
            None => warn!("Dispatched PID {} no longer resolves in registry", pid),
        }
        info!("Dispatched '{}' (PID {})", registry.name_of(pid), pid);
        Ok(pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.contains(&pid)
    }

    /// Queue contents, front to back
    pub fn snapshot(&self) -> Vec<Pid> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
