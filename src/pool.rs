//! Bounded worker pool shared by the discovery and download stages.
//!
//! A pool run loads every item into one shared queue, starts a fixed number
//! of workers that pull from it until it is empty, and funnels each worker's
//! result into a single result channel. Results arrive in completion order.
//!
//! # Example
//!
//! ```
//! use soundtrack_core::pool::WorkerPool;
//!
//! # async fn example() {
//! let doubled = WorkerPool::new(2).run(vec![1, 2, 3], |n| async move { n * 2 }).await;
//! assert_eq!(doubled.len(), 3);
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

/// Fixed-size set of workers draining a shared queue.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
    pause: Duration,
}

/// A pool run in progress.
///
/// Results can be consumed incrementally with [`next`](Self::next); call
/// [`join`](Self::join) afterwards to reap the workers.
#[derive(Debug)]
pub struct PoolRun<R> {
    results: mpsc::UnboundedReceiver<R>,
    workers: JoinSet<()>,
}

impl WorkerPool {
    /// Creates a pool with `workers` concurrent workers and no pause.
    ///
    /// A value of zero is treated as one; callers validate user input
    /// before it reaches the pool.
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            pause: Duration::ZERO,
        }
    }

    /// Sets the pause each worker takes after finishing an item.
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the per-worker pause between items.
    #[must_use]
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Processes every item and returns all results in completion order.
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, work: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let expected = items.len();
        let mut run = self.spawn(items, work);
        let mut results = Vec::with_capacity(expected);
        while let Some(result) = run.next().await {
            results.push(result);
        }
        run.join().await;
        results
    }

    /// Starts the workers and returns a handle yielding results as they complete.
    ///
    /// No more than `min(workers, items.len())` workers are started, so at no
    /// instant are more than `workers` items in flight.
    pub fn spawn<T, R, F, Fut>(&self, items: Vec<T>, work: F) -> PoolRun<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let item_count = items.len();
        let worker_count = self.workers.min(item_count);

        let (job_tx, job_rx) = mpsc::unbounded_channel();
        for item in items {
            // The receiver is alive until the workers finish, so this cannot fail.
            let _ = job_tx.send(item);
        }
        // Closing the sending side lets workers observe an empty queue.
        drop(job_tx);

        let jobs = Arc::new(Mutex::new(job_rx));
        let work = Arc::new(work);
        let (result_tx, results) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();

        debug!(
            items = item_count,
            workers = worker_count,
            pause_ms = self.pause.as_millis(),
            "starting worker pool"
        );

        for worker_idx in 0..worker_count {
            let jobs = Arc::clone(&jobs);
            let work = Arc::clone(&work);
            let result_tx = result_tx.clone();
            let pause = self.pause;

            workers.spawn(async move {
                loop {
                    let next = {
                        let mut queue = jobs.lock().await;
                        queue.recv().await
                    };

                    let Some(item) = next else {
                        trace!(worker = worker_idx, "worker terminating (queue drained)");
                        break;
                    };

                    let result = work(item).await;
                    if result_tx.send(result).is_err() {
                        debug!(worker = worker_idx, "result receiver dropped; stopping worker");
                        break;
                    }

                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }
            });
        }

        PoolRun { results, workers }
    }
}

impl<R> PoolRun<R> {
    /// Waits for the next finished item.
    ///
    /// Returns `None` once every worker has exited and all results were taken.
    pub async fn next(&mut self) -> Option<R> {
        self.results.recv().await
    }

    /// Waits for every worker to exit. A panicking worker is logged, not propagated.
    pub async fn join(mut self) {
        while let Some(joined) = self.workers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "pool worker panicked");
            }
        }
    }
}
