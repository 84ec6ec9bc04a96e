//! Single-flight read coalescing per physical file.
//!
//! Concurrent lookups frequently target the same byte range: every word
//! sharing a three-letter prefix reads the same index bucket. The Piper
//! deduplicates those reads. The first caller for a task id performs the
//! physical read; callers arriving while it is in flight park on the
//! task's cell and receive a clone of the same result. The entry is
//! removed once the read resolves, so only overlapping callers coalesce.
//!
//! The file handle is a scoped resource guarded by the same lock as the
//! task map: opened when the first task needs it, shared by overlapping
//! tasks through positioned reads, dropped when the last outstanding
//! task completes. At most one descriptor per file is ever open.

use ahash::AHashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::error::Result;

/// Read coalescer bound to one on-disk file.
pub struct Piper {
    path: PathBuf,
    state: Mutex<PiperState>,
    physical_reads: AtomicU64,
}

struct PiperState {
    tasks: AHashMap<String, Arc<TaskCell>>,
    handle: Option<Arc<File>>,
    /// In-flight task count; the handle closes when this returns to zero
    outstanding: usize,
}

/// Shared slot a task's waiters park on.
struct TaskCell {
    slot: Mutex<Option<Result<Arc<str>>>>,
    ready: Condvar,
}

impl TaskCell {
    fn new() -> Self {
        TaskCell {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }
}

impl Piper {
    pub fn new(path: PathBuf) -> Self {
        Piper {
            path,
            state: Mutex::new(PiperState {
                tasks: AHashMap::new(),
                handle: None,
                outstanding: 0,
            }),
            physical_reads: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` for `task_id`, coalescing with any in-flight run of the
    /// same id. `op` executes at most once per coalesced group; every
    /// caller gets the same result.
    pub fn run<F>(&self, task_id: &str, op: F) -> Result<Arc<str>>
    where
        F: FnOnce(&File) -> Result<String>,
    {
        let (cell, file) = {
            let mut state = self.state.lock().unwrap();
            if let Some(cell) = state.tasks.get(task_id) {
                let cell = Arc::clone(cell);
                drop(state);
                return Self::wait(&cell);
            }
            let file = match &state.handle {
                Some(file) => Arc::clone(file),
                None => {
                    let file = Arc::new(File::open(&self.path)?);
                    state.handle = Some(Arc::clone(&file));
                    file
                }
            };
            let cell = Arc::new(TaskCell::new());
            state.tasks.insert(task_id.to_string(), Arc::clone(&cell));
            state.outstanding += 1;
            (cell, file)
        };

        // leader path: one physical read, outside the lock
        let result = op(&file).map(Arc::<str>::from);
        self.physical_reads.fetch_add(1, Ordering::Relaxed);
        drop(file);

        {
            let mut slot = cell.slot.lock().unwrap();
            *slot = Some(result.clone());
            cell.ready.notify_all();
        }

        let mut state = self.state.lock().unwrap();
        state.tasks.remove(task_id);
        state.outstanding -= 1;
        if state.outstanding == 0 {
            // last ref to the shared handle; descriptor closes here
            state.handle = None;
        }
        drop(state);

        result
    }

    fn wait(cell: &TaskCell) -> Result<Arc<str>> {
        let mut slot = cell.slot.lock().unwrap();
        loop {
            if let Some(result) = slot.as_ref() {
                return result.clone();
            }
            slot = cell.ready.wait(slot).unwrap();
        }
    }

    /// Number of physical reads issued so far.
    pub fn physical_reads(&self) -> u64 {
        self.physical_reads.load(Ordering::Relaxed)
    }

    /// Number of tasks currently in flight.
    pub fn in_flight(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    #[cfg(test)]
    fn has_open_handle(&self) -> bool {
        self.state.lock().unwrap().handle.is_some()
    }

    #[cfg(test)]
    fn waiters(&self, task_id: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .tasks
            .get(task_id)
            .map(|cell| Arc::strong_count(cell).saturating_sub(2))
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for Piper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Piper")
            .field("path", &self.path)
            .field("physical_reads", &self.physical_reads())
            .finish()
    }
}

/// Positioned read that does not move any shared cursor.
#[cfg(unix)]
pub(crate) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

#[cfg(windows)]
pub(crate) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

/// Fill `buf` from `offset`, retrying partial reads. EOF before the
/// buffer fills is an error.
pub(crate) fn read_exact_at(file: &File, buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = read_at(file, &mut buf[filled..], offset)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read past end of file",
            ));
        }
        filled += n;
        offset += n as u64;
    }
    Ok(())
}
