//! Cancellable handles for in-flight operations
//!
//! Every load returns a [`Task`]. Cancelling it does two things: it tells
//! whatever lower-level work the load wraps to stop, and it permanently
//! suppresses the load's completion, even if that work still finishes.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback receiving the result of an asynchronous operation
pub type Completion<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Anything that can be told to stop
pub trait Cancellable: Send + Sync {
    fn cancel(&self);
}

impl Cancellable for tokio::task::AbortHandle {
    fn cancel(&self) {
        self.abort();
    }
}

/// Opaque handle to one in-flight asynchronous operation
#[derive(Clone)]
pub struct Task {
    inner: Arc<dyn Cancellable>,
}

impl Task {
    pub fn new(inner: impl Cancellable + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Task for an operation that has nothing to stop
    pub fn noop() -> Self {
        Self::new(Noop)
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

impl<C: Cancellable + 'static> From<Arc<C>> for Task {
    fn from(inner: Arc<C>) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

struct Noop;

impl Cancellable for Noop {
    fn cancel(&self) {}
}

/// Holds a completion until it is either delivered or cancelled, and forwards
/// cancellation to the task currently doing the work.
///
/// The wrapped task can be replaced while the operation runs (a fallback
/// taking over from a failed primary); wrapping a task after cancellation
/// cancels it straight away.
pub struct CompletionTask<T> {
    completion: Mutex<Option<Completion<T>>>,
    wrapped: Mutex<Option<Task>>,
    cancelled: AtomicBool,
}

impl<T: Send + 'static> CompletionTask<T> {
    pub fn new(completion: Completion<T>) -> Arc<Self> {
        Arc::new(Self {
            completion: Mutex::new(Some(completion)),
            wrapped: Mutex::new(None),
            cancelled: AtomicBool::new(false),
        })
    }

    /// Deliver `result` unless the task was cancelled or already completed
    pub fn complete(&self, result: T) {
        let completion = self.completion.lock().take();
        self.wrapped.lock().take();
        if let Some(completion) = completion {
            completion(result);
        }
    }

    /// Make `task` the one that receives cancellation
    pub fn wrap(&self, task: Task) {
        if self.is_cancelled() {
            task.cancel();
            return;
        }
        if self.completion.lock().is_none() {
            // already delivered
            return;
        }
        *self.wrapped.lock() = Some(task);
        // cancel() may have run between the check and the store
        if self.is_cancelled() {
            if let Some(task) = self.wrapped.lock().take() {
                task.cancel();
            }
        }
    }

    /// Install the task that started the operation.
    ///
    /// Unlike [`CompletionTask::wrap`] this never replaces a task installed
    /// by the operation's own callback, which may have run on another thread
    /// before the starting call returned.
    pub fn wrap_initial(&self, task: Task) {
        if self.is_cancelled() {
            task.cancel();
            return;
        }
        if self.completion.lock().is_none() {
            return;
        }
        {
            let mut wrapped = self.wrapped.lock();
            if wrapped.is_some() {
                return;
            }
            *wrapped = Some(task);
        }
        if self.is_cancelled() {
            if let Some(task) = self.wrapped.lock().take() {
                task.cancel();
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl<T: Send + 'static> Cancellable for CompletionTask<T> {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.completion.lock().take();
        let wrapped = self.wrapped.lock().take();
        if let Some(task) = wrapped {
            task.cancel();
        }
    }
}
