//! Delivery of results on the main context
//!
//! [`main_queue`] binds a queue to the calling thread. Completions wrapped by
//! [`MainQueueDispatchDecorator`] run inline when they fire on that thread
//! and are posted to its [`MainLoop`] otherwise.

use feed_core::{
    Completion, CompletionTask, FeedImageDataLoader, FeedImageDataResult, FeedLoader, FeedResult,
    Liveness, Task,
};
use std::future::Future;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tokio::sync::mpsc;
use tracing::warn;
use url::Url;

/// Unit of work posted to a [`DispatchContext`]
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Context that results must be delivered on
pub trait DispatchContext: Send + Sync {
    /// Whether the caller is already running on this context
    fn is_current(&self) -> bool;
    /// Run `job` on this context later
    fn post(&self, job: Job);
}

/// Posting side of the main context
#[derive(Clone)]
pub struct MainQueue {
    sender: mpsc::UnboundedSender<Job>,
    thread: ThreadId,
}

/// Receiving side of the main context; runs posted jobs on its thread
pub struct MainLoop {
    receiver: mpsc::UnboundedReceiver<Job>,
    // pinned to the thread that created it
    _thread_bound: PhantomData<Rc<()>>,
}

/// Create the main context for the current thread
pub fn main_queue() -> (MainQueue, MainLoop) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let queue = MainQueue {
        sender,
        thread: thread::current().id(),
    };
    let main_loop = MainLoop {
        receiver,
        _thread_bound: PhantomData,
    };
    (queue, main_loop)
}

impl DispatchContext for MainQueue {
    fn is_current(&self) -> bool {
        thread::current().id() == self.thread
    }

    fn post(&self, job: Job) {
        if self.sender.send(job).is_err() {
            warn!("Main loop stopped, dropping delivery");
        }
    }
}

impl MainLoop {
    /// Run every job that is already queued; returns how many ran
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Run posted jobs until `until` resolves
    pub async fn run_until<F: Future>(&mut self, until: F) -> F::Output {
        tokio::pin!(until);
        loop {
            tokio::select! {
                output = &mut until => return output,
                Some(job) = self.receiver.recv() => job(),
            }
        }
    }
}

/// Wrap `completion` so it runs on `context`
pub fn dispatch<D, R>(context: Arc<D>, completion: Completion<R>) -> Completion<R>
where
    D: DispatchContext + ?Sized + 'static,
    R: Send + 'static,
{
    Box::new(move |result| {
        if context.is_current() {
            completion(result);
        } else {
            context.post(Box::new(move || completion(result)));
        }
    })
}

/// Delivers the decoratee's results on `context`
///
/// A result is dropped if the load was cancelled or the decorator dropped
/// before the main context got to run it.
pub struct MainQueueDispatchDecorator<T: ?Sized, D: ?Sized> {
    decoratee: Arc<T>,
    context: Arc<D>,
    liveness: Liveness,
}

impl<T: ?Sized, D: DispatchContext + ?Sized + 'static> MainQueueDispatchDecorator<T, D> {
    pub fn new(decoratee: Arc<T>, context: Arc<D>) -> Self {
        Self {
            decoratee,
            context,
            liveness: Liveness::new(),
        }
    }

    fn deliver_on_context<R: Send + 'static>(
        &self,
        task: &Arc<CompletionTask<R>>,
    ) -> Completion<R> {
        let delivery = Arc::clone(task);
        let token = self.liveness.token();
        dispatch(
            Arc::clone(&self.context),
            Box::new(move |result| {
                if token.is_alive() {
                    delivery.complete(result);
                }
            }),
        )
    }
}

impl<T, D> FeedLoader for MainQueueDispatchDecorator<T, D>
where
    T: FeedLoader + ?Sized,
    D: DispatchContext + ?Sized + 'static,
{
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task {
        let task = CompletionTask::new(completion);
        let inner = self.decoratee.load_feed(self.deliver_on_context(&task));
        task.wrap_initial(inner);
        task.into()
    }
}

impl<T, D> FeedImageDataLoader for MainQueueDispatchDecorator<T, D>
where
    T: FeedImageDataLoader + ?Sized,
    D: DispatchContext + ?Sized + 'static,
{
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task {
        let task = CompletionTask::new(completion);
        let inner = self
            .decoratee
            .load_image_data(url, self.deliver_on_context(&task));
        task.wrap_initial(inner);
        task.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sink, FeedImageDataLoaderSpy, FeedLoaderSpy};
    use feed_core::testing::{any_data, any_url, unique_feed};
    use parking_lot::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[test]
    fn test_completion_on_main_thread_runs_inline() {
        let (queue, mut main_loop) = main_queue();
        let loader = Arc::new(FeedLoaderSpy::default());
        let sut = MainQueueDispatchDecorator::new(Arc::clone(&loader), Arc::new(queue));
        let (completion, received) = sink();

        let _task = sut.load_feed(completion);
        loader.complete(Ok(unique_feed()));

        assert_eq!(received.lock().len(), 1);
        assert_eq!(main_loop.run_pending(), 0);
    }

    #[test]
    fn test_completion_off_main_thread_is_posted_to_main_loop() {
        let (queue, mut main_loop) = main_queue();
        let loader = Arc::new(FeedImageDataLoaderSpy::default());
        let sut = MainQueueDispatchDecorator::new(Arc::clone(&loader), Arc::new(queue));
        let delivered_on = Arc::new(Mutex::new(None));
        let received = Arc::new(Mutex::new(Vec::new()));

        let (thread_sink, result_sink) = (Arc::clone(&delivered_on), Arc::clone(&received));
        let _task = sut.load_image_data(
            &any_url(),
            Box::new(move |result| {
                *thread_sink.lock() = Some(thread::current().id());
                result_sink.lock().push(result);
            }),
        );
        let background = Arc::clone(&loader);
        thread::spawn(move || background.complete(Ok(any_data())))
            .join()
            .unwrap();

        assert!(received.lock().is_empty());
        assert_eq!(main_loop.run_pending(), 1);
        assert_eq!(*received.lock(), vec![Ok(any_data())]);
        assert_eq!(*delivered_on.lock(), Some(thread::current().id()));
    }

    #[test]
    fn test_cancel_forwards_to_decoratee() {
        let (queue, _main_loop) = main_queue();
        let loader = Arc::new(FeedLoaderSpy::default());
        let sut = MainQueueDispatchDecorator::new(Arc::clone(&loader), Arc::new(queue));
        let (completion, _received) = sink::<FeedResult>();

        sut.load_feed(completion).cancel();

        assert_eq!(loader.cancels.count(), 1);
    }

    #[test]
    fn test_post_after_main_loop_dropped_drops_job() {
        let (queue, main_loop) = main_queue();
        drop(main_loop);
        let ran = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&ran);
        queue.post(Box::new(move || *flag.lock() = true));

        assert!(!*ran.lock());
    }

    #[tokio::test]
    async fn test_run_until_runs_jobs_while_waiting() {
        let (queue, mut main_loop) = main_queue();
        let (tx, rx) = oneshot::channel();

        thread::spawn(move || {
            queue.post(Box::new(move || {
                let _ = tx.send(thread::current().id());
            }));
        });

        let ran_on = tokio::time::timeout(Duration::from_secs(2), main_loop.run_until(rx))
            .await
            .expect("posted job never ran")
            .unwrap();
        assert_eq!(ran_on, thread::current().id());
    }

    #[test]
    fn test_posted_result_is_not_delivered_after_decorator_dropped() {
        let (queue, mut main_loop) = main_queue();
        let loader = Arc::new(FeedLoaderSpy::default());
        let sut = MainQueueDispatchDecorator::new(Arc::clone(&loader), Arc::new(queue));
        let (completion, received) = sink();

        let _task = sut.load_feed(completion);
        drop(sut);
        let background = Arc::clone(&loader);
        thread::spawn(move || background.complete(Ok(unique_feed())))
            .join()
            .unwrap();
        main_loop.run_pending();

        assert!(received.lock().is_empty());
    }

    #[test]
    fn test_inline_result_is_not_delivered_after_decorator_dropped() {
        let (queue, _main_loop) = main_queue();
        let loader = Arc::new(FeedImageDataLoaderSpy::default());
        let sut = MainQueueDispatchDecorator::new(Arc::clone(&loader), Arc::new(queue));
        let (completion, received) = sink();

        let _task = sut.load_image_data(&any_url(), completion);
        drop(sut);
        loader.complete(Ok(any_data()));

        assert!(received.lock().is_empty());
    }

    #[test]
    fn test_cancel_after_result_was_posted_suppresses_delivery() {
        let (queue, mut main_loop) = main_queue();
        let loader = Arc::new(FeedLoaderSpy::default());
        let sut = MainQueueDispatchDecorator::new(Arc::clone(&loader), Arc::new(queue));
        let (completion, received) = sink();

        let task = sut.load_feed(completion);
        let background = Arc::clone(&loader);
        thread::spawn(move || background.complete(Ok(unique_feed())))
            .join()
            .unwrap();
        task.cancel();

        assert_eq!(main_loop.run_pending(), 1);
        assert!(received.lock().is_empty());
    }
}
