//! Timer-based debouncing on the tokio runtime

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

type Sink<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Forwards only the last value of each burst of calls
///
/// Every [`call`](Self::call) aborts the pending timer and schedules a new one;
/// the sink runs once `quiet` has elapsed without another call. Must be used
/// from within a tokio runtime.
pub struct Debouncer<T> {
    quiet: Duration,
    sink: Sink<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration, sink: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            quiet,
            sink: Arc::new(sink),
            pending: Mutex::new(None),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Schedule `value`, superseding any value still waiting
    pub fn call(&self, value: T) {
        let mut pending = self.pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let sink = Arc::clone(&self.sink);
        let quiet = self.quiet;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            sink(value);
        }));
    }

    /// Whether a value is waiting for its quiet interval to elapse
    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// A value still waiting when the debouncer goes away is dropped with it
impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
