// Long-lived search service with one dedicated worker thread.
//
// Architecture: a single worker thread fed by an `mpsc` channel.
//
// - **Caller side** (`PathfinderService`): `submit()` cancels whatever
//   search is current, hands the request a fresh `CancelToken`, queues a
//   `Job` and returns a `PathHandle`. At most one search is ever "current";
//   a new submission always supersedes the previous one.
// - **Worker thread**: pulls jobs in order. A job whose token was cancelled
//   while it sat in the queue resolves immediately to a `Cancelled` failure
//   with zero nodes evaluated. Otherwise it runs the search (and the
//   smoother, if asked) and sends the result back on the job's own reply
//   channel.
//
// `is_busy()` counts jobs submitted but not yet resolved. The worker
// decrements the count before replying, so a caller that has just received
// its last result already sees the service as idle.
//
// Shutdown: `shutdown()` (also run by `Drop`) cancels the current search,
// drops the job sender so the worker's `recv()` loop ends, then joins the
// thread. Handles whose job never ran resolve to `Cancelled`.
//
// The world is shared with the worker behind an `Arc` and must not change
// while a search is in flight; nothing here enforces that.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use voxelpath_core::cancel::CancelToken;
use voxelpath_core::config::{PathfinderConfig, SmoothingConfig};
use voxelpath_core::goal::Goal;
use voxelpath_core::path::{FailureReason, PathResult};
use voxelpath_core::search::find_path;
use voxelpath_core::types::{MovementMode, VoxelCoord};
use voxelpath_core::world::GridAccess;

use crate::request::SearchRequest;

/// Unit of work sent to the worker thread.
struct Job {
    id: u64,
    request: SearchRequest,
    cancel: CancelToken,
    reply: Sender<PathResult>,
}

/// Result of a job that never produced one: cancelled in the queue, or the
/// worker went away.
fn cancelled() -> PathResult {
    PathResult::failure(FailureReason::Cancelled, 0, 0)
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Pending result of one submitted request.
pub struct PathHandle {
    id: u64,
    rx: Receiver<PathResult>,
    result: Option<PathResult>,
}

impl PathHandle {
    /// Id assigned at submission, increasing per service.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the result arrives.
    pub fn wait(mut self) -> PathResult {
        if let Some(result) = self.result.take() {
            return result;
        }
        self.rx.recv().unwrap_or_else(|_| cancelled())
    }

    /// Block for at most `timeout`. `None` if the search is still running.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<PathResult> {
        if self.result.is_none() {
            match self.rx.recv_timeout(timeout) {
                Ok(result) => self.result = Some(result),
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => self.result = Some(cancelled()),
            }
        }
        self.result.clone()
    }

    /// The result if it has already arrived.
    pub fn try_result(&mut self) -> Option<PathResult> {
        if self.result.is_none() {
            match self.rx.try_recv() {
                Ok(result) => self.result = Some(result),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => self.result = Some(cancelled()),
            }
        }
        self.result.clone()
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Owns the worker thread and the "current search" slot.
pub struct PathfinderService<W: GridAccess + Send + Sync + 'static> {
    config: PathfinderConfig,
    jobs: Option<Sender<Job>>,
    current: Option<CancelToken>,
    pending: Arc<AtomicUsize>,
    next_id: u64,
    worker: Option<thread::JoinHandle<()>>,
    world: Arc<W>,
}

impl<W: GridAccess + Send + Sync + 'static> PathfinderService<W> {
    /// Spawn the worker thread. Fails only if the OS refuses the thread.
    pub fn new(world: Arc<W>, config: PathfinderConfig) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker_world = Arc::clone(&world);
        let worker_pending = Arc::clone(&pending);
        let smoothing = config.smoothing.clone();
        let worker = thread::Builder::new()
            .name("voxelpath-search".into())
            .spawn(move || run_worker(worker_world, smoothing, rx, worker_pending))?;
        info!("[Service] worker started");

        Ok(Self {
            config,
            jobs: Some(tx),
            current: None,
            pending,
            next_id: 1,
            worker: Some(worker),
            world,
        })
    }

    /// The world searches run against.
    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    /// Queue `request`, cancelling the current search first.
    pub fn submit(&mut self, request: SearchRequest) -> PathHandle {
        self.cancel();

        let id = self.next_id;
        self.next_id += 1;
        let (reply, rx) = mpsc::channel();
        let handle = PathHandle {
            id,
            rx,
            result: None,
        };

        let Some(jobs) = &self.jobs else {
            warn!("[Service] job {id} submitted after shutdown");
            drop(reply);
            return handle;
        };

        let cancel = CancelToken::new();
        self.pending.fetch_add(1, Ordering::SeqCst);
        debug!(
            "[Service] job {id}: {} -> {} ({}, max {} nodes, smooth={})",
            request.start, request.goal, request.mode, request.max_nodes, request.smooth
        );
        let job = Job {
            id,
            request,
            cancel: cancel.clone(),
            reply,
        };
        if jobs.send(job).is_err() {
            // Worker is gone; the dropped reply resolves the handle.
            self.pending.fetch_sub(1, Ordering::SeqCst);
            warn!("[Service] worker unavailable, job {id} dropped");
            return handle;
        }
        self.current = Some(cancel);
        handle
    }

    /// Whether any submitted request is still unresolved.
    pub fn is_busy(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Cancel the current search, if any. Its handle resolves to a
    /// `Cancelled` failure once the worker notices.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// Cancel, stop accepting work and join the worker.
    pub fn shutdown(&mut self) {
        self.cancel();
        self.jobs = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("[Service] worker thread panicked");
            }
            info!("[Service] worker stopped");
        }
    }

    // --- Convenience entry points ---

    /// Ground search to `goal`. `max_nodes` falls back to the configured
    /// budget.
    pub fn find_path(&mut self, start: VoxelCoord, goal: Goal, max_nodes: Option<u32>) -> PathHandle {
        self.submit_with(start, goal, max_nodes, MovementMode::Ground, false)
    }

    /// Flight search to `goal`.
    pub fn find_path_3d(&mut self, start: VoxelCoord, goal: Goal, max_nodes: Option<u32>) -> PathHandle {
        self.submit_with(start, goal, max_nodes, MovementMode::Flight, false)
    }

    /// Ground search, smoothed on success.
    pub fn find_smoothed_path(
        &mut self,
        start: VoxelCoord,
        goal: Goal,
        max_nodes: Option<u32>,
    ) -> PathHandle {
        self.submit_with(start, goal, max_nodes, MovementMode::Ground, true)
    }

    /// Flight search, smoothed on success.
    pub fn find_smoothed_path_3d(
        &mut self,
        start: VoxelCoord,
        goal: Goal,
        max_nodes: Option<u32>,
    ) -> PathHandle {
        self.submit_with(start, goal, max_nodes, MovementMode::Flight, true)
    }

    fn submit_with(
        &mut self,
        start: VoxelCoord,
        goal: Goal,
        max_nodes: Option<u32>,
        mode: MovementMode,
        smooth: bool,
    ) -> PathHandle {
        let request = SearchRequest::with_config(start, goal, &self.config.search)
            .max_nodes(max_nodes.unwrap_or(self.config.search.max_nodes))
            .mode(mode)
            .smoothed(smooth);
        self.submit(request)
    }
}

impl<W: GridAccess + Send + Sync + 'static> Drop for PathfinderService<W> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Worker loop. Runs until every job sender is dropped.
fn run_worker<W: GridAccess + ?Sized>(
    world: Arc<W>,
    smoothing: SmoothingConfig,
    jobs: Receiver<Job>,
    pending: Arc<AtomicUsize>,
) {
    while let Ok(job) = jobs.recv() {
        let result = if job.cancel.is_cancelled() {
            debug!("[Service] job {} cancelled before it started", job.id);
            cancelled()
        } else {
            run_job(&*world, &job, &smoothing)
        };
        pending.fetch_sub(1, Ordering::SeqCst);
        // The caller may have dropped its handle.
        let _ = job.reply.send(result);
    }
}

fn run_job<W: GridAccess + ?Sized>(world: &W, job: &Job, smoothing: &SmoothingConfig) -> PathResult {
    let request = &job.request;
    let result = find_path(
        world,
        request.start,
        request.goal,
        &request.search_config(),
        &job.cancel,
    );
    if request.smooth && result.success {
        result.smoothed(world, request.mode, smoothing)
    } else {
        result
    }
}
