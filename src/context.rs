//! The slow execution context that owns application state.
//!
//! The fast context handles pointer input and mutates retained nodes
//! directly. Anything it needs to tell the slow context is handed off through
//! a [`Background`] without waiting: tasks are queued on a bounded channel
//! and executed in order on a dedicated thread. If the queue is full, the
//! task is dropped instead of blocking the fast context.

use std::cell::Cell;
use std::fmt::{self, Display};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::utils::Lazy;

/// The queue capacity used by [`Background::spawn()`].
pub const DEFAULT_CAPACITY: usize = 256;

static SHARED: Lazy<Background> = Lazy::new(Background::spawn);

thread_local! {
    static IS_BACKGROUND_THREAD: Cell<bool> = const { Cell::new(false) };
}

enum BackgroundTask {
    Run(Box<dyn FnOnce() + Send>),
    Flush(mpsc::Sender<()>),
}

/// A handle to a slow execution context.
///
/// Cloning produces another handle to the same context. The context's
/// thread exits once every handle has been dropped and its queue drained.
#[derive(Clone)]
pub struct Background {
    name: &'static str,
    sender: SyncSender<BackgroundTask>,
}

impl Background {
    /// Spawns a context with a queue of [`DEFAULT_CAPACITY`] tasks.
    #[must_use]
    pub fn spawn() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Spawns a context whose queue holds up to `capacity` pending tasks.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::named("background", capacity)
    }

    /// Spawns a context whose thread is named `name`.
    #[must_use]
    pub fn named(name: &'static str, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        let spawned = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run(&receiver));
        match spawned {
            Ok(_) => debug!(name, capacity, "spawned background context"),
            // The receiver was dropped along with the closure, so every
            // dispatch reports a disconnected context.
            Err(err) => warn!("unable to spawn {name} thread: {err}"),
        }
        Self { name, sender }
    }

    /// Returns a context shared by the whole process.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Returns true if the calling thread belongs to a background context.
    #[must_use]
    pub fn is_current() -> bool {
        IS_BACKGROUND_THREAD.get()
    }

    /// Queues `task` without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue is full or the context has shut down.
    /// The task is dropped in either case.
    pub fn dispatch<F>(&self, task: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        match self.sender.try_send(BackgroundTask::Run(Box::new(task))) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DispatchError::Full),
            Err(TrySendError::Disconnected(_)) => Err(DispatchError::Disconnected),
        }
    }

    /// Returns a function that forwards each value it is called with to
    /// `callback` on this context.
    ///
    /// Values that cannot be queued are logged and dropped.
    pub fn run_on_background<T, F>(&self, callback: F) -> impl Fn(&T) + Send + Sync + 'static
    where
        T: Clone + Send + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        let context = self.clone();
        let callback = Arc::new(callback);
        move |value: &T| {
            let callback = callback.clone();
            let value = value.clone();
            if let Err(err) = context.dispatch(move || callback(value)) {
                warn!(context = context.name, "dropping notification: {err}");
            }
        }
    }

    /// Blocks until every task queued before this call has run.
    ///
    /// Returns false if the context has shut down. This must not be called
    /// from the context's own thread.
    pub fn flush(&self) -> bool {
        let (done, wait) = mpsc::channel();
        if self.sender.send(BackgroundTask::Flush(done)).is_err() {
            return false;
        }
        wait.recv().is_ok()
    }
}

impl fmt::Debug for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Background")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn run(receiver: &mpsc::Receiver<BackgroundTask>) {
    IS_BACKGROUND_THREAD.set(true);

    let mut executed = 0_usize;
    while let Ok(task) = receiver.recv() {
        match task {
            BackgroundTask::Run(task) => {
                task();
                executed += 1;
            }
            BackgroundTask::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    trace!("{executed} background tasks executed");
}

/// An error queueing a task on a [`Background`] context.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DispatchError {
    /// The queue is at capacity.
    Full,
    /// The context's thread is no longer running.
    Disconnected,
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Full => f.write_str("background queue is full"),
            DispatchError::Disconnected => f.write_str("background context is not running"),
        }
    }
}

impl std::error::Error for DispatchError {}

#[test]
fn tasks_run_in_order_off_thread() {
    use parking_lot::Mutex;

    let background = Background::spawn();
    let seen = Arc::new(Mutex::new(Vec::new()));
    for index in 0..10 {
        let seen = seen.clone();
        background
            .dispatch(move || seen.lock().push((index, Background::is_current())))
            .expect("queue has room");
    }
    assert!(background.flush());
    let seen = seen.lock();
    assert_eq!(seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    assert!(seen.iter().all(|(_, on_background)| *on_background));
    assert!(!Background::is_current());
}

#[test]
fn full_queues_drop_instead_of_blocking() {
    let background = Background::with_capacity(1);
    let (release, gate) = mpsc::channel::<()>();
    let (started, wait_started) = mpsc::channel::<()>();
    background
        .dispatch(move || {
            let _ = started.send(());
            let _ = gate.recv();
        })
        .expect("queue has room");
    wait_started.recv().expect("task started");

    // The thread is busy: one task fits in the queue, the next is dropped.
    assert_eq!(background.dispatch(|| {}), Ok(()));
    assert_eq!(background.dispatch(|| {}), Err(DispatchError::Full));

    release.send(()).expect("task waiting");
    assert!(background.flush());
}

#[test]
fn forwarded_callbacks_receive_values() {
    use parking_lot::Mutex;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let forward = Background::shared().run_on_background({
        let seen = seen.clone();
        move |value: f64| seen.lock().push(value)
    });
    forward(&1.);
    forward(&2.);
    assert!(Background::shared().flush());
    assert_eq!(*seen.lock(), [1., 2.]);
}

#[test]
fn named_contexts_run_on_their_own_thread() {
    let background = Background::named("tandem-named", 4);
    let (sender, names) = mpsc::channel();
    background
        .dispatch(move || {
            let _ = sender.send(std::thread::current().name().map(str::to_string));
        })
        .expect("context spawned");
    assert_eq!(
        names.recv().expect("task ran"),
        Some(String::from("tandem-named"))
    );
}
