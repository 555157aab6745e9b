//! # StartupBarrier: countdown gate opened by the tellers.
//!
//! Counts down from the number of tellers. Each teller calls [`StartupBarrier::arrive`]
//! once it is ready; when the count hits zero every waiter (customers and the
//! bank-open observer) is released at once. Arrivals beyond zero are ignored.
//!
//! Built on a [`watch`] channel: the flag flips to `true` exactly once and late
//! waiters see it immediately.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::{select, sync::watch};
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;

/// Countdown latch released when `parties` arrivals have been recorded.
#[derive(Debug)]
pub struct StartupBarrier {
    remaining: AtomicUsize,
    open: watch::Sender<bool>,
}

impl StartupBarrier {
    /// Creates a barrier waiting for `parties` arrivals (`0` = already open).
    pub fn new(parties: usize) -> Self {
        let (open, _rx) = watch::channel(parties == 0);
        Self {
            remaining: AtomicUsize::new(parties),
            open,
        }
    }

    /// Records one arrival. Returns `true` for the arrival that opened the barrier.
    pub fn arrive(&self) -> bool {
        let prev = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match prev {
            Ok(1) => {
                self.open.send_replace(true);
                true
            }
            _ => false,
        }
    }

    /// Arrivals still missing.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }

    /// True once the count reached zero.
    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    /// Waits until the barrier opens.
    pub async fn wait(&self) {
        let mut rx = self.open.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|open| *open).await;
    }

    /// Like [`wait`](Self::wait), but gives up when `token` is cancelled.
    pub async fn wait_or_cancel(&self, token: &CancellationToken) -> Result<(), AgentError> {
        select! {
            biased;
            _ = token.cancelled() => Err(AgentError::Canceled),
            _ = self.wait() => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_zero_parties_is_open() {
        let barrier = StartupBarrier::new(0);
        assert!(barrier.is_open());
        barrier.wait().await;
        assert!(!barrier.arrive());
    }

    #[tokio::test]
    async fn test_last_arrival_opens() {
        let barrier = StartupBarrier::new(3);
        assert!(!barrier.arrive());
        assert!(!barrier.arrive());
        assert!(!barrier.is_open());
        assert!(barrier.arrive());
        assert!(barrier.is_open());
        assert_eq!(barrier.remaining(), 0);

        // Extra arrivals are ignored.
        assert!(!barrier.arrive());
        assert_eq!(barrier.remaining(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_all_waiters_released_together() {
        let barrier = Arc::new(StartupBarrier::new(2));
        let passed = Arc::new(AtomicUsize::new(0));
        let mut set = tokio::task::JoinSet::new();
        for _ in 0..5 {
            let barrier = Arc::clone(&barrier);
            let passed = Arc::clone(&passed);
            set.spawn(async move {
                barrier.wait().await;
                passed.fetch_add(1, Ordering::SeqCst);
            });
        }

        barrier.arrive();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(
            passed.load(Ordering::SeqCst),
            0,
            "waiters passed a half-open barrier"
        );

        barrier.arrive();
        tokio::time::timeout(Duration::from_secs(2), async {
            while let Some(res) = set.join_next().await {
                res.unwrap();
            }
        })
        .await
        .expect("waiters were not released");
        assert_eq!(passed.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_cancel_while_closed() {
        let barrier = StartupBarrier::new(1);
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            barrier.wait_or_cancel(&token).await,
            Err(AgentError::Canceled)
        );
    }
}
