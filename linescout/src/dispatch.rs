use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::{debug, info, warn};

use crate::config::{FilenameMode, SearchJob};
use crate::errors::{DispatchError, ScanError};
use crate::walk::PathSet;

/// Shared next-index into the path array.
///
/// Created fresh for every dispatch call. Workers claim entries one at a
/// time; once the cursor reaches the end it never advances further, and each
/// index is handed out exactly once.
#[derive(Debug)]
struct TraversalCursor {
    next: Mutex<usize>,
    len: usize,
}

impl TraversalCursor {
    fn new(len: usize) -> Self {
        Self {
            next: Mutex::new(0),
            len,
        }
    }

    /// Atomically reads and advances the cursor. The lock is held only for
    /// the read-and-advance; the caller scans outside of it.
    fn claim(&self) -> Option<usize> {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        if *next >= self.len {
            return None;
        }
        let index = *next;
        *next += 1;
        Some(index)
    }
}

/// Whether output lines for a file in a set of `len` files carry the
/// file-name prefix. Pure function of its inputs; `len` is fixed when
/// dispatch starts.
pub fn show_filename(mode: FilenameMode, len: usize) -> bool {
    match mode {
        FilenameMode::Auto => len > 1,
        FilenameMode::Always => true,
        FilenameMode::Never => false,
    }
}

/// Scans every path in `paths` for `job.pattern`, fanning per-file work out
/// over `job.thread_count` workers.
///
/// Each worker repeatedly claims the next path under the cursor lock and
/// invokes `report` outside of it, so file I/O from different workers
/// proceeds in parallel. `report` receives
/// `(path, pattern, line_numbers, show_filename)` and is called once per
/// claimed path, never concurrently for the same path.
///
/// A failing `report` call stops that worker's claiming loop but leaves
/// sibling workers running to cursor exhaustion; the failure surfaces as
/// [`DispatchError::ReportFailed`] after every worker has been joined. The
/// call blocks until all workers have terminated.
pub fn dispatch<F>(paths: &PathSet, job: &SearchJob, report: F) -> Result<(), DispatchError>
where
    F: Fn(&Path, &str, bool, bool) -> Result<(), ScanError> + Sync,
{
    let len = paths.len();
    if len == 0 {
        return Err(DispatchError::EmptyPathSet);
    }

    let workers = job.thread_count.get();
    let cursor = TraversalCursor::new(len);
    let show = show_filename(job.filename_mode, len);
    let entries = paths.as_slice();

    info!("dispatching {} file(s) across {} worker(s)", len, workers);

    let mut spawn_error = None;
    let mut failed = false;

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let spawned = thread::Builder::new()
                .name(format!("scan-worker-{}", i))
                .spawn_scoped(scope, || worker_loop(&cursor, entries, job, show, &report));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        for handle in handles {
            match handle.join() {
                Ok(worker_failed) => failed |= worker_failed,
                // A panicked worker counts as a failed one.
                Err(_) => failed = true,
            }
        }
    });

    if let Some(e) = spawn_error {
        return Err(DispatchError::SpawnFailed(e));
    }
    if failed {
        return Err(DispatchError::ReportFailed);
    }

    debug!("dispatch finished");
    Ok(())
}

/// Claim-until-exhausted loop run by each worker. Returns whether this worker
/// recorded a failure.
fn worker_loop<F>(
    cursor: &TraversalCursor,
    entries: &[PathBuf],
    job: &SearchJob,
    show: bool,
    report: &F,
) -> bool
where
    F: Fn(&Path, &str, bool, bool) -> Result<(), ScanError> + Sync,
{
    while let Some(index) = cursor.claim() {
        let path = &entries[index];
        debug!("claimed {}", path.display());

        if let Err(e) = report(path, &job.pattern, job.line_numbers, show) {
            warn!("{}", e);
            return true;
        }
    }
    false
}
