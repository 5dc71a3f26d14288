use parking_lot::Mutex;
use tracing::debug;

type Hook = Box<dyn FnOnce() + Send + 'static>;

/// Host-owned registry of callbacks to run when the process (or a request)
/// ends.
///
/// The library never installs global handlers; the host creates one of these,
/// hands it to [`Client::enable_auto_flush_on_shutdown`](crate::Client::enable_auto_flush_on_shutdown)
/// and calls [`ShutdownHooks::run`] at the end of its lifecycle. Hooks still
/// pending when the registry is dropped run at that point. Each hook runs at
/// most once.
///
/// ```
/// use statsd_queue::ShutdownHooks;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let hooks = ShutdownHooks::new();
/// let runs = Arc::new(AtomicUsize::new(0));
/// let counter = runs.clone();
/// hooks.register(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
/// hooks.run();
/// hooks.run();
/// assert_eq!(1, runs.load(Ordering::SeqCst));
/// ```
#[derive(Default)]
pub struct ShutdownHooks {
    hooks: Mutex<Vec<Hook>>,
}

impl std::fmt::Debug for ShutdownHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHooks")
            .field("pending", &self.len())
            .finish()
    }
}

impl ShutdownHooks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook to run on shutdown.
    pub fn register(&self, hook: impl FnOnce() + Send + 'static) {
        self.hooks.lock().push(Box::new(hook));
    }

    /// Number of hooks not yet run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.lock().len()
    }

    /// True when no hook is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.lock().is_empty()
    }

    /// Runs and discards every pending hook in registration order.
    pub fn run(&self) {
        // release the lock first so hooks may register follow-ups
        let hooks = std::mem::take(&mut *self.hooks.lock());
        if !hooks.is_empty() {
            debug!("running {} shutdown hooks", hooks.len());
        }
        for hook in hooks {
            hook();
        }
    }
}

impl Drop for ShutdownHooks {
    fn drop(&mut self) {
        self.run();
    }
}
