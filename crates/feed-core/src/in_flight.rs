//! Counter of unfinished operations that can be awaited until it drains

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolves once the count is zero, including work begun while waiting
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.idle.notified();
            if self.count() == 0 {
                return;
            }
            idle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_idle_returns_immediately_when_nothing_in_flight() {
        let in_flight = InFlight::new();
        tokio::time::timeout(Duration::from_secs(1), in_flight.wait_idle())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_idle_waits_for_last_finish() {
        let in_flight = Arc::new(InFlight::new());
        in_flight.begin();
        in_flight.begin();

        let worker = Arc::clone(&in_flight);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            worker.finish();
            tokio::time::sleep(Duration::from_millis(10)).await;
            worker.finish();
        });

        tokio::time::timeout(Duration::from_secs(2), in_flight.wait_idle())
            .await
            .unwrap();
        assert_eq!(in_flight.count(), 0);
    }
}
