//! Scatter/gather primitive for stage fan-out

use std::future::Future;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// A registry of outstanding concurrent tasks with a precise drain barrier.
///
/// [`register`](Self::register) spawns work immediately;
/// [`drain_all`](Self::drain_all) blocks until every registered task has
/// delivered, in any completion order. The pool never interprets what a task
/// produced — success and failure bookkeeping belongs to the task itself,
/// written onto the record it owns. The pool's guarantee is liveness with a
/// precise count: no task is lost, none is counted twice, and a drain
/// returns exactly once the count reaches zero.
pub struct TaskPool<T> {
    tasks: JoinSet<T>,
}

impl<T: Send + 'static> TaskPool<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    /// Number of tasks registered and not yet drained.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Spawn `future` and track it until the next drain.
    pub fn register<F>(&mut self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.tasks.spawn(future);
    }

    /// Block until every registered task has delivered.
    ///
    /// Values come back in completion order. A panicked task is logged and
    /// still counted as delivered, so one bad worker cannot stall the
    /// barrier or skew the count.
    pub async fn drain_all(&mut self, label: &str) -> Vec<T> {
        debug!("{label} ({} outstanding)", self.tasks.len());

        let mut delivered = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(value) => delivered.push(value),
                Err(e) => warn!("worker task lost: {e}"),
            }
        }
        delivered
    }
}

impl<T: Send + 'static> Default for TaskPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
