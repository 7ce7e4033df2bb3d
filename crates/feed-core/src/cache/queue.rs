//! Submission-ordered executor for store operations
//!
//! Operations run on a tokio runtime in the order they were submitted.
//! Reads may overlap each other; a write waits for every earlier operation
//! to finish and blocks every later one until it is done (barrier).

use crate::in_flight::InFlight;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write,
}

struct Operation {
    access: Access,
    name: &'static str,
    run: BoxFuture<'static, ()>,
}

#[derive(Clone)]
pub struct StoreQueue {
    label: &'static str,
    sender: mpsc::UnboundedSender<Operation>,
    pending: Arc<InFlight>,
}

impl StoreQueue {
    /// Start the queue's worker on `runtime`
    pub fn new(label: &'static str, runtime: &Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(InFlight::new());
        runtime.spawn(run_operations(label, receiver, Arc::clone(&pending)));
        Self {
            label,
            sender,
            pending,
        }
    }

    /// Submit an operation that may run alongside other reads
    pub fn read<F>(&self, name: &'static str, operation: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.submit(Access::Read, name, operation.boxed());
    }

    /// Submit a side effect; it runs alone
    pub fn write<F>(&self, name: &'static str, operation: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.submit(Access::Write, name, operation.boxed());
    }

    /// Resolves once every submitted operation, including ones submitted by
    /// the completions of earlier operations, has finished
    pub async fn wait_idle(&self) {
        self.pending.wait_idle().await;
    }

    fn submit(&self, access: Access, name: &'static str, run: BoxFuture<'static, ()>) {
        self.pending.begin();
        let operation = Operation { access, name, run };
        if self.sender.send(operation).is_err() {
            warn!(queue = self.label, operation = name, "Store queue stopped, dropping operation");
            self.pending.finish();
        }
    }
}

async fn run_operations(
    label: &'static str,
    mut receiver: mpsc::UnboundedReceiver<Operation>,
    pending: Arc<InFlight>,
) {
    let lock = Arc::new(RwLock::new(()));

    while let Some(operation) = receiver.recv().await {
        debug!(queue = label, operation = operation.name, access = ?operation.access, "Running store operation");
        match operation.access {
            Access::Read => {
                let guard = Arc::clone(&lock).read_owned().await;
                let pending = Arc::clone(&pending);
                tokio::spawn(async move {
                    operation.run.await;
                    drop(guard);
                    pending.finish();
                });
            }
            Access::Write => {
                let _guard = Arc::clone(&lock).write_owned().await;
                operation.run.await;
                pending.finish();
            }
        }
    }

    debug!(queue = label, "Store queue closed");
}
