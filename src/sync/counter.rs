//! # ServedCounter: the global termination predicate.
//!
//! Counts fully-served customers under its own lock. Tellers read it before deciding
//! to park or close, and the teller that serves the last customer runs the
//! completion hook while still holding the lock.
//!
//! ## Rules
//! - Monotonic: the count only increases, by one per served customer.
//! - Bounded: it never exceeds `total`.
//! - Never nested with the work-queue lock in either order.

use tokio::sync::Mutex;

/// Lock-guarded count of served customers.
#[derive(Debug)]
pub struct ServedCounter {
    served: Mutex<usize>,
    total: usize,
}

impl ServedCounter {
    /// Creates a counter that completes after `total` customers.
    pub fn new(total: usize) -> Self {
        Self {
            served: Mutex::new(0),
            total,
        }
    }

    /// Number of customers the bank expects.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Current count.
    pub async fn get(&self) -> usize {
        *self.served.lock().await
    }

    /// True once every expected customer has been served.
    pub async fn is_complete(&self) -> bool {
        *self.served.lock().await >= self.total
    }

    /// Holds the counter lock until the guard is dropped.
    #[cfg(test)]
    pub(crate) async fn hold(&self) -> tokio::sync::MutexGuard<'_, usize> {
        self.served.lock().await
    }

    /// Records one served customer and returns the new count.
    ///
    /// If this increment reaches `total`, `on_complete` runs before the lock is
    /// released; otherwise it is dropped unused.
    pub async fn record<F: FnOnce()>(&self, on_complete: F) -> usize {
        let mut served = self.served.lock().await;
        debug_assert!(*served < self.total, "served count would exceed total");
        if *served >= self.total {
            return *served;
        }
        *served += 1;
        if *served == self.total {
            on_complete();
        }
        *served
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_zero_total_is_complete_immediately() {
        let counter = ServedCounter::new(0);
        assert!(counter.is_complete().await);
        assert_eq!(counter.get().await, 0);
    }

    #[tokio::test]
    async fn test_hook_runs_only_on_last_increment() {
        let counter = ServedCounter::new(3);
        let fired = AtomicUsize::new(0);

        for expected in 1..=3 {
            let n = counter
                .record(|| {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
                .await;
            assert_eq!(n, expected);
        }
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(counter.is_complete().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_records_reach_total_exactly() {
        let counter = Arc::new(ServedCounter::new(64));
        let fired = Arc::new(AtomicUsize::new(0));
        let mut set = tokio::task::JoinSet::new();

        for _ in 0..64 {
            let counter = Arc::clone(&counter);
            let fired = Arc::clone(&fired);
            set.spawn(async move {
                counter
                    .record(|| {
                        fired.fetch_add(1, Ordering::SeqCst);
                    })
                    .await
            });
        }
        let mut seen = Vec::new();
        while let Some(res) = set.join_next().await {
            seen.push(res.unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=64).collect::<Vec<_>>());
        assert_eq!(counter.get().await, 64);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
