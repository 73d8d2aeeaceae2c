/*!
 * Snapshot Storage
 * Flat-text persistence for the registry, CPU queue, and memory stack
 *
 * Layout, one token per line, fixed section order:
 *
 * ```text
 * <registryCount>
 * <pid> <name> <priority> <running: 0|1>   (four lines per record)
 * <queueCount>
 * <pid>                                    (front to back)
 * <stackCount>
 * <pid>                                    (top to bottom)
 * ```
 */

use crate::core::limits::MAX_MEMORY_BLOCKS;
use crate::core::types::{Pid, Priority};
use crate::memory::MemoryStack;
use crate::process::{ProcessInfo, ProcessRegistry};
use crate::scheduler::ReadyQueue;
use crate::system::System;
use log::debug;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Storage operation result
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum StorageError {
    #[error("Malformed snapshot at line {line}: {reason}")]
    #[diagnostic(
        code(storage::malformed_stream),
        help("The snapshot file is truncated or corrupt. Ignore it and start empty.")
    )]
    MalformedStream { line: usize, reason: String },

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(storage::io_error),
        help("Filesystem operation failed. Check file permissions and disk space.")
    )]
    Io(String),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Write all three containers in fixed section order
pub fn save<W: Write>(
    out: &mut W,
    registry: &ProcessRegistry,
    queue: &ReadyQueue,
    stack: &MemoryStack,
) -> StorageResult<()> {
    writeln!(out, "{}", registry.len())?;
    for proc in registry.list() {
        writeln!(out, "{}", proc.pid)?;
        writeln!(out, "{}", proc.name)?;
        writeln!(out, "{}", proc.priority)?;
        writeln!(out, "{}", u8::from(proc.running))?;
    }

    let queued = queue.snapshot();
    writeln!(out, "{}", queued.len())?;
    for pid in &queued {
        writeln!(out, "{}", pid)?;
    }

    let stacked = stack.snapshot();
    writeln!(out, "{}", stacked.len())?;
    for pid in &stacked {
        writeln!(out, "{}", pid)?;
    }
    Ok(())
}

/// Read the three sections back and rebuild a system
///
/// Registry records reinsert at the head, so record order comes back
/// reversed relative to the save (as the original file format always has).
/// Queue entries replay through `admit`, silently dropping PIDs that no
/// longer resolve; stack entries rebuild verbatim, bypassing the capacity
/// check so pre-save state is preserved exactly.
pub fn load<R: BufRead>(input: R) -> StorageResult<System> {
    let mut reader = FieldReader::new(input);
    let mut system = System::new();

    let process_count: usize = reader.next_field("process count")?;
    for _ in 0..process_count {
        let pid: Pid = reader.next_field("pid")?;
        let name = reader.next_line("process name")?;
        let priority: Priority = reader.next_field("priority")?;
        let running: u8 = reader.next_field("running flag")?;
        let mut info = ProcessInfo::new(pid, name, priority);
        info.running = running == 1;
        system.registry.restore(info);
    }

    let queue_count: usize = reader.next_field("queue count")?;
    for _ in 0..queue_count {
        let pid: Pid = reader.next_field("queued pid")?;
        if let Err(err) = system.queue.admit(&mut system.registry, pid) {
            debug!("Dropping queued PID {} from snapshot: {}", pid, err);
        }
    }

    let stack_count: usize = reader.next_field("stack count")?;
    // The count comes from an untrusted file; cap the allocation hint so a
    // lying value cannot abort the process before the entries are read.
    let mut blocks = Vec::with_capacity(stack_count.min(MAX_MEMORY_BLOCKS));
    for _ in 0..stack_count {
        let pid: Pid = reader.next_field("stacked pid")?;
        if system.registry.exists(pid) {
            blocks.push(pid);
        } else {
            debug!("Dropping stacked PID {} from snapshot: not in registry", pid);
        }
    }
    system.stack.rebuild(blocks);

    Ok(system)
}

/// Save a system snapshot to a file
pub fn save_to_path<P: AsRef<Path>>(path: P, system: &System) -> StorageResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    save(&mut out, &system.registry, &system.queue, &system.stack)?;
    out.flush()?;
    Ok(())
}

/// Load a system snapshot from a file
pub fn load_from_path<P: AsRef<Path>>(path: P) -> StorageResult<System> {
    let file = File::open(path)?;
    load(BufReader::new(file))
}

/// Line-oriented field reader that tracks position for diagnostics
struct FieldReader<R> {
    inner: R,
    line: usize,
}

impl<R: BufRead> FieldReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, line: 0 }
    }

    fn next_line(&mut self, what: &str) -> StorageResult<String> {
        let mut buf = String::new();
        let read = self.inner.read_line(&mut buf)?;
        self.line += 1;
        if read == 0 {
            return Err(StorageError::MalformedStream {
                line: self.line,
                reason: format!("unexpected end of stream while reading {}", what),
            });
        }
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(buf)
    }

    fn next_field<T: FromStr>(&mut self, what: &str) -> StorageResult<T> {
        let raw = self.next_line(what)?;
        raw.trim().parse().map_err(|_| StorageError::MalformedStream {
            line: self.line,
            reason: format!("expected {}, got '{}'", what, raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_exact_layout() {
        let mut system = System::new();
        let a = system.registry.add("init", 1).unwrap();
        let b = system.registry.add("logger", 4).unwrap();
        system.queue.admit(&mut system.registry, a).unwrap();
        system.stack.acquire(&system.registry, b).unwrap();

        let mut buf = Vec::new();
        save(&mut buf, &system.registry, &system.queue, &system.stack).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // Registry newest-first, then queue front-to-back, then stack
        // top-to-bottom, one token per line.
        assert_eq!(text, "2\n2\nlogger\n4\n0\n1\ninit\n1\n1\n1\n1\n1\n2\n");
    }

    #[test]
    fn test_load_rejects_non_numeric_count() {
        let err = load("banana\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::MalformedStream { line: 1, .. }));
    }

    #[test]
    fn test_load_rejects_truncated_stream() {
        // One record promised, stream ends mid-record.
        let err = load("1\n3\nonly-a-name\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::MalformedStream { .. }));
    }

    #[test]
    fn test_load_huge_stack_count_is_an_error_not_an_abort() {
        // A lying count must surface as MalformedStream once the promised
        // entries run out, never as an allocation failure.
        let err = load("0\n0\n99999999999999\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::MalformedStream { .. }));
    }

    #[test]
    fn test_load_rejects_missing_sections() {
        let err = load("0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::MalformedStream { .. }));
    }

    #[test]
    fn test_load_empty_sections() {
        let system = load("0\n0\n0\n".as_bytes()).unwrap();
        assert!(system.registry.is_empty());
        assert!(system.queue.is_empty());
        assert!(system.stack.is_empty());
    }

    #[test]
    fn test_load_preserves_name_with_spaces() {
        let system = load("1\n1\nbackground worker\n2\n0\n0\n0\n".as_bytes()).unwrap();
        assert_eq!(system.registry.name_of(1), "background worker");
    }

    #[test]
    fn test_load_bumps_pid_counter_past_restored_ids() {
        let mut system = load("1\n9\ndaemon\n2\n0\n0\n0\n".as_bytes()).unwrap();
        assert_eq!(system.registry.add("next", 1).unwrap(), 10);
    }

    #[test]
    fn test_load_drops_unresolvable_queue_and_stack_pids() {
        // Queue and stack reference PID 5, which is not in the registry.
        let system = load("1\n1\ninit\n1\n0\n2\n5\n1\n2\n5\n1\n".as_bytes()).unwrap();
        assert_eq!(system.queue.snapshot(), vec![1]);
        assert_eq!(system.stack.snapshot(), vec![1]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_from_path("/nonexistent/procmgr.dat").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
