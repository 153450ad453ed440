//! Loader Controller
//!
//! State machine tying a source list, a reveal cursor and a tick scheduler
//! together. Every transition publishes a fresh [`Projection`] through a
//! watch channel; subscribers only ever see complete snapshots.
//!
//! ```text
//!            start (reset, advance, arm)
//!   Idle ─────────────────────────────────▶ Running ──┐
//!    ▲                                        │       │ tick (advance, re-arm)
//!    └──────────── stop (cancel timer) ───────┘ ◀─────┘
//! ```

use super::error::LoaderResult;
use super::projector::{project, Projection};
use super::scheduler::{DelayRange, Scheduler, TimerHandle};
use super::types::{LoaderOptions, LoaderState, SourceList};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use uuid::Uuid;

/// Progressive loader revealing a fixed list a few rows at a time.
///
/// Owns its timer: dropping the loader (or calling [`Loader::dispose`])
/// cancels any armed tick, so no row is published after teardown.
pub struct Loader<R> {
    shared: Arc<Shared<R>>,
}

struct Shared<R> {
    id: Uuid,
    source: SourceList<R>,
    options: LoaderOptions,
    scheduler: Scheduler,
    inner: Mutex<Inner>,
    status: Status,
    publisher: watch::Sender<Projection<R>>,
}

struct Inner {
    state: LoaderState,
    cursor: usize,
    /// Bumped on every start and stop; ticks from an older epoch are stale
    epoch: u64,
    timer: Option<TimerHandle>,
    started: bool,
    disposed: bool,
}

/// Copy of the observable `Inner` fields for the getters.
///
/// Stored under the `inner` lock before anything is published and read
/// without it, so a caller holding a watch borrow never waits on a tick
/// that is waiting to publish.
#[derive(Default)]
struct Status {
    running: AtomicBool,
    cursor: AtomicUsize,
    started: AtomicBool,
    disposed: AtomicBool,
}

impl Status {
    fn store(&self, inner: &Inner) {
        self.cursor.store(inner.cursor, Ordering::Release);
        self.started.store(inner.started, Ordering::Release);
        self.disposed.store(inner.disposed, Ordering::Release);
        self.running
            .store(inner.state == LoaderState::Running, Ordering::Release);
    }
}

impl<R> Loader<R>
where
    R: Send + Sync + 'static,
{
    /// Create a loader over `source`.
    ///
    /// Fails on invalid options or when called outside a tokio runtime.
    /// With `auto_start` the loader is already running when returned.
    pub fn new(source: SourceList<R>, options: LoaderOptions) -> LoaderResult<Self> {
        options.validate()?;
        let range = DelayRange::new(options.min_delay_ms, options.max_delay_ms)?;
        let scheduler = Scheduler::new(range, options.seed)?;
        let (publisher, _) = watch::channel(Projection::NotStarted);

        let inner = Inner {
            state: LoaderState::Idle,
            cursor: options.start_at.min(source.len()),
            epoch: 0,
            timer: None,
            started: false,
            disposed: false,
        };
        let status = Status::default();
        status.store(&inner);

        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            inner: Mutex::new(inner),
            status,
            source,
            options,
            scheduler,
            publisher,
        });

        tracing::debug!(
            loader_id = %shared.id,
            len = shared.source.len(),
            step = shared.options.step,
            "Loader created"
        );

        let loader = Self { shared };
        if loader.shared.options.auto_start {
            loader.start();
        }
        Ok(loader)
    }

    /// Begin revealing rows. No-op while already running.
    ///
    /// The first batch is published before this returns; later batches
    /// follow on jittered ticks.
    pub fn start(&self) {
        let shared = &self.shared;
        let mut inner = shared.lock();

        if inner.disposed {
            tracing::warn!(loader_id = %shared.id, "Ignoring start on a disposed loader");
            return;
        }
        if inner.state == LoaderState::Running {
            tracing::debug!(loader_id = %shared.id, "Loader already running");
            return;
        }

        inner.state = LoaderState::Running;
        inner.started = true;
        inner.epoch += 1;
        inner.cursor = shared.options.start_at.min(shared.source.len());

        shared.advance(&mut inner);
        shared.status.store(&inner);
        shared.publish(&inner);
        Shared::arm_next(shared, &mut inner);

        tracing::info!(
            loader_id = %shared.id,
            cursor = inner.cursor,
            len = shared.source.len(),
            "Loader started"
        );
    }

    /// Stop revealing rows. No-op while idle.
    ///
    /// A manually toggled loader goes back to the not-started projection;
    /// an auto-started loader keeps what it has shown so far.
    pub fn stop(&self) {
        let shared = &self.shared;
        let mut inner = shared.lock();

        if inner.state == LoaderState::Idle {
            return;
        }
        shared.halt(&mut inner);

        if !shared.options.auto_start {
            inner.started = false;
            shared.status.store(&inner);
            shared.publish(&inner);
        }

        tracing::info!(loader_id = %shared.id, cursor = inner.cursor, "Loader stopped");
    }

    /// Stop for good. Later calls to [`Loader::start`] are ignored and the
    /// last published projection is left in place.
    pub fn dispose(&self) {
        let shared = &self.shared;
        let mut inner = shared.lock();

        if inner.disposed {
            return;
        }
        if inner.state == LoaderState::Running {
            shared.halt(&mut inner);
        }
        inner.disposed = true;
        shared.status.store(&inner);

        tracing::info!(loader_id = %shared.id, "Loader disposed");
    }

    /// Subscribe to published projections.
    ///
    /// The getters below never wait on a publish, so they are safe to call
    /// while a borrow is held. `start` and `stop` publish and must not be
    /// called from a thread that holds one.
    pub fn subscribe(&self) -> watch::Receiver<Projection<R>> {
        self.shared.publisher.subscribe()
    }

    /// Latest published projection
    pub fn snapshot(&self) -> Projection<R> {
        self.shared.publisher.borrow().clone()
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn state(&self) -> LoaderState {
        if self.shared.status.running.load(Ordering::Acquire) {
            LoaderState::Running
        } else {
            LoaderState::Idle
        }
    }

    pub fn cursor(&self) -> usize {
        self.shared.status.cursor.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.shared.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.source.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.status.disposed.load(Ordering::Acquire)
    }

    /// All rows revealed. Ticks keep firing as no-ops until stopped.
    pub fn is_complete(&self) -> bool {
        let status = &self.shared.status;
        status.started.load(Ordering::Acquire)
            && status.cursor.load(Ordering::Acquire) == self.shared.source.len()
    }

    /// Armed timers that have not fired yet (0 or 1)
    pub fn pending_ticks(&self) -> usize {
        self.shared.scheduler.outstanding()
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.shared.options
    }

    pub fn source(&self) -> &SourceList<R> {
        &self.shared.source
    }
}

impl<R> Drop for Loader<R> {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        inner.disposed = true;
        inner.state = LoaderState::Idle;
        inner.epoch += 1;
        self.shared.scheduler.cancel(inner.timer.take());
        self.shared.status.store(&inner);
    }
}

impl<R> Shared<R> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the cursor forward by one step. Returns false at the end.
    fn advance(&self, inner: &mut Inner) -> bool {
        let next = (inner.cursor + self.options.step).min(self.source.len());
        if next == inner.cursor {
            return false;
        }
        inner.cursor = next;
        true
    }

    fn publish(&self, inner: &Inner) {
        self.publisher
            .send_replace(project(&self.source, inner.cursor, inner.started));
    }

    /// Leave the running state and cancel the armed tick
    fn halt(&self, inner: &mut Inner) {
        inner.state = LoaderState::Idle;
        inner.epoch += 1;
        self.scheduler.cancel(inner.timer.take());
        self.status.store(inner);
    }
}

impl<R> Shared<R>
where
    R: Send + Sync + 'static,
{
    fn arm_next(shared: &Arc<Self>, inner: &mut Inner) {
        let weak: Weak<Self> = Arc::downgrade(shared);
        let epoch = inner.epoch;
        inner.timer = Some(shared.scheduler.arm(move || {
            if let Some(shared) = weak.upgrade() {
                Shared::on_tick(&shared, epoch);
            }
        }));
    }

    fn on_tick(shared: &Arc<Self>, epoch: u64) {
        let mut inner = shared.lock();

        if inner.state != LoaderState::Running || inner.epoch != epoch {
            tracing::debug!(
                loader_id = %shared.id,
                tick_epoch = epoch,
                current_epoch = inner.epoch,
                "Dropping stale tick"
            );
            return;
        }

        if shared.advance(&mut inner) {
            shared.status.store(&inner);
            shared.publish(&inner);
            tracing::debug!(
                loader_id = %shared.id,
                cursor = inner.cursor,
                len = shared.source.len(),
                "Revealed rows"
            );
        }
        Shared::arm_next(shared, &mut inner);
    }
}
