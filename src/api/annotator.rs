//! Background nearest-point lookup for the cursor.
//!
//! The interactive thread posts cursor positions without waiting; one worker
//! thread scans the traces for the newest position only and publishes the
//! result for the next timer poll.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, Scope, ScopedJoinHandle};

use tracing::{debug, trace, warn};

use crate::core::{ClosestPoint, Projector, TraceCollection};
use crate::error::{PlotError, PlotResult};

/// Invoked on the worker after each published scan, with no lock held.
pub type ResolvedCallback<'scope> = Box<dyn Fn(Option<ClosestPoint>) + Send + 'scope>;

#[derive(Debug, Clone, Copy)]
struct CursorRequest {
    x: f64,
    y: f64,
    projector: Projector,
}

#[derive(Debug)]
struct WorkerState {
    trigger: u64,
    last_trigger: u64,
    request: Option<CursorRequest>,
    keep_running: bool,
    result: Option<ClosestPoint>,
    scans: u64,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<WorkerState>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, WorkerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owner of the lookup worker.
///
/// The worker borrows the trace collection for `'scope`, so the data cannot
/// be dropped before the worker is joined. Dropping the annotator stops and
/// joins the worker.
pub struct Annotator<'scope> {
    shared: Arc<Shared>,
    worker: Option<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope> Annotator<'scope> {
    /// Starts the worker inside `scope`.
    pub fn spawn<'env>(
        scope: &'scope Scope<'scope, 'env>,
        traces: &'scope TraceCollection<'scope>,
        on_resolved: Option<ResolvedCallback<'scope>>,
    ) -> PlotResult<Self> {
        let annotator = Self::spawn_with_lookup(
            scope,
            move |request: &CursorRequest| {
                traces.find_closest_point(&request.projector, request.x, request.y)
            },
            on_resolved,
        )?;
        debug!(traces = traces.len(), "annotator started");
        Ok(annotator)
    }

    fn spawn_with_lookup<'env, F>(
        scope: &'scope Scope<'scope, 'env>,
        lookup: F,
        on_resolved: Option<ResolvedCallback<'scope>>,
    ) -> PlotResult<Self>
    where
        F: Fn(&CursorRequest) -> Option<ClosestPoint> + Send + 'scope,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(WorkerState {
                trigger: 0,
                last_trigger: 0,
                request: None,
                keep_running: true,
                result: None,
                scans: 0,
            }),
            wake: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("plot2d-annotator".to_owned())
            .spawn_scoped(scope, move || {
                run_worker(&worker_shared, &lookup, on_resolved.as_ref());
            })
            .map_err(PlotError::WorkerSpawn)?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Posts a new cursor position in data coordinates.
    ///
    /// Never waits for a scan. Positions posted while a scan runs replace
    /// each other; only the newest one is scanned next.
    pub fn notify_cursor_change(&self, x: f64, y: f64, projector: Projector) {
        let mut state = self.shared.lock();
        state.request = Some(CursorRequest { x, y, projector });
        state.trigger += 1;
        drop(state);
        self.shared.wake.notify_one();
    }

    /// Result of the most recent finished scan.
    #[must_use]
    pub fn get_highlighted_point(&self) -> Option<ClosestPoint> {
        self.shared.lock().result
    }

    /// Number of scans completed so far.
    #[must_use]
    pub fn scan_count(&self) -> u64 {
        self.shared.lock().scans
    }

    /// Whether a posted position has not been scanned yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        let state = self.shared.lock();
        state.trigger != state.last_trigger
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stops and joins the worker. A second call is an error.
    pub fn shutdown(&mut self) -> PlotResult<()> {
        let worker = self.worker.take().ok_or(PlotError::AnnotatorAlreadyShutdown)?;
        self.shared.lock().keep_running = false;
        self.shared.wake.notify_one();
        worker.join().map_err(|_| PlotError::WorkerPanicked)?;
        debug!("annotator stopped");
        Ok(())
    }
}

impl Drop for Annotator<'_> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            if let Err(err) = self.shutdown() {
                warn!(error = %err, "annotator shutdown on drop failed");
            }
        }
    }
}

impl std::fmt::Debug for Annotator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("running", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}

fn run_worker<F>(shared: &Shared, lookup: &F, on_resolved: Option<&ResolvedCallback<'_>>)
where
    F: Fn(&CursorRequest) -> Option<ClosestPoint>,
{
    let mut state = shared.lock();
    loop {
        if !state.keep_running {
            return;
        }
        if state.trigger == state.last_trigger {
            state = shared.wake.wait(state).unwrap_or_else(PoisonError::into_inner);
            continue;
        }

        let trigger = state.trigger;
        let request = state.request;
        drop(state);

        let result = request.and_then(|request| scan(lookup, request));

        let mut published = shared.lock();
        published.result = result;
        published.last_trigger = trigger;
        published.scans += 1;
        trace!(trigger, scans = published.scans, found = result.is_some(), "annotator scan done");
        drop(published);

        if let Some(callback) = on_resolved {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(result)));
            if outcome.is_err() {
                warn!("resolved-point callback panicked");
            }
        }

        state = shared.lock();
    }
}

fn scan<F>(lookup: &F, request: CursorRequest) -> Option<ClosestPoint>
where
    F: Fn(&CursorRequest) -> Option<ClosestPoint>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| lookup(&request)));
    match outcome {
        Ok(found) => found,
        Err(_) => {
            warn!(x = request.x, y = request.y, "closest point scan panicked, reporting no result");
            None
        }
    }
}
