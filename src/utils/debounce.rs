//! Cancellable delayed task.
//!
//! Scheduling replaces any pending task, so only the last call within the
//! delay window runs. Dropping the debouncer cancels the pending task.
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `task` after the delay unless another call supersedes it first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Aborts the pending task. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!("debounced task cancelled");
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter_task(counter: &Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_after_delay() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(counter_task(&hits, 1));

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn later_schedule_supersedes_earlier() {
        let value = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(counter_task(&value, 1));
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(counter_task(&value, 2));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(value.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(101)).await;
        assert_eq!(value.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_stop_pending_work() {
        let value = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.schedule(counter_task(&value, 1));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        debouncer.schedule(counter_task(&value, 2));
        drop(debouncer);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(value.load(Ordering::SeqCst), 0);
    }
}
