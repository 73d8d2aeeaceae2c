/*!
 * Process Registry
 * Owns all process records and assigns identifiers
 */

use super::types::{ProcessInfo, ProcessResult, DELETED_NAME, PRIORITY_SENTINEL};
use crate::core::errors::ProcessError;
use crate::core::limits::{PRIORITY_MAX, PRIORITY_MIN};
use crate::core::types::{Pid, Priority};
use log::info;

/// Registry of all known processes
///
/// The single source of truth for process identity. Records are kept
/// newest-first; PIDs are assigned from an append-only counter and are
/// never reused, even after deletion.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    records: Vec<ProcessInfo>,
    next_pid: Pid,
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_pid: 1,
        }
    }

    fn validate_priority(priority: Priority) -> ProcessResult<()> {
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
            return Err(ProcessError::InvalidPriority(priority));
        }
        Ok(())
    }

    /// Register a new process and return its PID
    ///
    /// The counter is untouched when the priority is rejected, so a failed
    /// add never burns an identifier.
    pub fn add(&mut self, name: impl Into<String>, priority: Priority) -> ProcessResult<Pid> {
        Self::validate_priority(priority)?;
        let name = name.into();
        let pid = self.next_pid;
        self.next_pid += 1;
        self.records.insert(0, ProcessInfo::new(pid, name.clone(), priority));
        info!("Process '{}' created (PID {})", name, pid);
        Ok(pid)
    }

    /// Remove a process record
    ///
    /// Does not touch CPU-queue or memory-stack membership; stale PIDs in
    /// those containers resolve through the sentinels below.
    pub fn remove(&mut self, pid: Pid) -> ProcessResult<()> {
        let idx = self
            .records
            .iter()
            .position(|p| p.pid == pid)
            .ok_or(ProcessError::NotFound(pid))?;
        self.records.remove(idx);
        info!("Process {} removed", pid);
        Ok(())
    }

    /// Overwrite a process priority in place
    pub fn set_priority(&mut self, pid: Pid, priority: Priority) -> ProcessResult<()> {
        Self::validate_priority(priority)?;
        let proc = self.get_mut(pid).ok_or(ProcessError::NotFound(pid))?;
        proc.priority = priority;
        info!("Process {} priority set to {}", pid, priority);
        Ok(())
    }

    pub fn exists(&self, pid: Pid) -> bool {
        self.records.iter().any(|p| p.pid == pid)
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessInfo> {
        self.records.iter().find(|p| p.pid == pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessInfo> {
        self.records.iter_mut().find(|p| p.pid == pid)
    }

    /// Priority of a PID, or `-1` when it no longer resolves
    ///
    /// The sentinel is load-bearing: queue-insertion scans compare through
    /// this accessor, so a dangling PID orders ahead of every live one.
    pub fn priority_of(&self, pid: Pid) -> i32 {
        self.get(pid)
            .map(|p| i32::from(p.priority))
            .unwrap_or(PRIORITY_SENTINEL)
    }

    /// Name of a PID, or `"[Deleted]"` when it no longer resolves
    pub fn name_of(&self, pid: Pid) -> String {
        self.get(pid)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| DELETED_NAME.to_string())
    }

    /// All records, most recently added first
    pub fn list(&self) -> &[ProcessInfo] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reinsert a record read back from a snapshot
    ///
    /// Inserts at the head like a live add and bumps the PID counter past
    /// the restored identifier so future adds never collide.
    pub(crate) fn restore(&mut self, info: ProcessInfo) {
        if info.pid >= self.next_pid {
            self.next_pid = info.pid + 1;
        }
        self.records.insert(0, info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_increasing_pids() {
        let mut registry = ProcessRegistry::new();
        let a = registry.add("init", 1).unwrap();
        let b = registry.add("shell", 3).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn test_pids_never_reused_after_removal() {
        let mut registry = ProcessRegistry::new();
        let a = registry.add("first", 2).unwrap();
        registry.remove(a).unwrap();
        let b = registry.add("second", 2).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_invalid_priority_leaves_counter_unchanged() {
        let mut registry = ProcessRegistry::new();
        assert_eq!(registry.add("low", 0), Err(ProcessError::InvalidPriority(0)));
        assert_eq!(registry.add("high", 6), Err(ProcessError::InvalidPriority(6)));
        assert_eq!(registry.add("ok", 3).unwrap(), 1);
    }

    #[test]
    fn test_list_is_newest_first() {
        let mut registry = ProcessRegistry::new();
        registry.add("a", 1).unwrap();
        registry.add("b", 2).unwrap();
        registry.add("c", 3).unwrap();
        let names: Vec<_> = registry.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn test_set_priority() {
        let mut registry = ProcessRegistry::new();
        let pid = registry.add("worker", 4).unwrap();
        registry.set_priority(pid, 1).unwrap();
        assert_eq!(registry.get(pid).unwrap().priority, 1);

        assert_eq!(
            registry.set_priority(pid, 9),
            Err(ProcessError::InvalidPriority(9))
        );
        assert_eq!(registry.set_priority(999, 2), Err(ProcessError::NotFound(999)));
    }

    #[test]
    fn test_sentinels_for_missing_pid() {
        let mut registry = ProcessRegistry::new();
        let pid = registry.add("ghost", 2).unwrap();
        registry.remove(pid).unwrap();
        assert_eq!(registry.priority_of(pid), -1);
        assert_eq!(registry.name_of(pid), "[Deleted]");
        assert!(!registry.exists(pid));
    }

    #[test]
    fn test_remove_missing_pid() {
        let mut registry = ProcessRegistry::new();
        assert_eq!(registry.remove(42), Err(ProcessError::NotFound(42)));
    }

    #[test]
    fn test_restore_bumps_counter() {
        let mut registry = ProcessRegistry::new();
        registry.restore(ProcessInfo::new(7, "restored".into(), 2));
        assert_eq!(registry.add("fresh", 1).unwrap(), 8);
    }
}
