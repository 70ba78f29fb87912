//! Semaphore-gated task pool.
//!
//! [`BoundedPool::run_all`] spawns every future on a [`JoinSet`] but lets
//! at most `cap` of them past the semaphore at once, then waits for all of
//! them. One task failing never cancels the others.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

pub struct BoundedPool {
    permits: Arc<Semaphore>,
    cap: usize,
}

impl BoundedPool {
    /// A cap of zero is treated as one.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            permits: Arc::new(Semaphore::new(cap)),
            cap,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Run all tasks with at most `cap` in flight and collect their outputs
    /// in completion order. Tasks that panic are logged and left out.
    pub async fn run_all<I, F, T>(&self, tasks: I) -> Vec<T>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let mut set = JoinSet::new();
        for task in tasks {
            let permits = Arc::clone(&self.permits);
            set.spawn(async move {
                // The semaphore is never closed, so acquisition only waits.
                let _permit = permits.acquire_owned().await.ok();
                task.await
            });
        }

        let mut results = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(output) => results.push(output),
                Err(err) => error!(category = "sync", error = %err, "pool task failed"),
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_never_exceeds_cap() {
        let pool = BoundedPool::new(3);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks = (0..20).map(|i| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                i
            }
        });

        let mut results = pool.run_all(tasks).await;
        results.sort();
        assert_eq!(results, (0..20).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_panicking_task_does_not_stop_others() {
        let pool = BoundedPool::new(2);
        let tasks = (0..5).map(|i| async move {
            if i == 2 {
                panic!("boom");
            }
            i
        });

        let mut results = pool.run_all(tasks).await;
        results.sort();
        assert_eq!(results, vec![0, 1, 3, 4]);
    }

    #[tokio::test]
    async fn test_zero_cap_clamped() {
        let pool = BoundedPool::new(0);
        assert_eq!(pool.capacity(), 1);
        let results = pool.run_all((0..3).map(|i| async move { i * 2 })).await;
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pool = BoundedPool::new(4);
        let results: Vec<u8> = pool
            .run_all(Vec::<std::future::Ready<u8>>::new())
            .await;
        assert!(results.is_empty());
    }
}
