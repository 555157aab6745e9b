//! # ResourceGate: counting semaphore with scoped, instrumented permits.
//!
//! A gate bounds how many agents occupy a named resource at once (the door, the
//! manager, the safe). Acquisition returns a [`GatePass`]; dropping the pass is the
//! release, so a permit is returned exactly once on every exit path, including
//! cancellation and unwinding.
//!
//! ## Cancellation
//! ```text
//! acquire_or_cancel(token)
//!   select! {
//!     token.cancelled()   → Err(Canceled)    (nothing held, nothing released)
//!     semaphore.acquire() → Ok(GatePass)     (held += 1, peak updated)
//!   }
//! ```
//! Dropping a pending `acquire()` future never leaks a permit; tokio hands any
//! permit it had already assigned back to the semaphore.
//!
//! ## Instrumentation
//! `held` is incremented only after a permit is granted and decremented before the
//! permit is returned, so `held <= capacity` holds at every instant and `peak` is a
//! faithful upper bound on simultaneous occupancy.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::{
    select,
    sync::{Semaphore, SemaphorePermit},
};
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;

/// Counting semaphore guarding one named resource.
#[derive(Debug)]
pub struct ResourceGate {
    name: &'static str,
    capacity: usize,
    permits: Semaphore,
    held: AtomicUsize,
    peak: AtomicUsize,
}

impl ResourceGate {
    /// Creates a gate with `capacity` permits.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            permits: Semaphore::new(capacity),
            held: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Waits for a permit.
    ///
    /// Fails with [`AgentError::Canceled`] only if the gate was closed.
    pub async fn acquire(&self) -> Result<GatePass<'_>, AgentError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_closed| AgentError::Canceled)?;
        Ok(self.admit(permit))
    }

    /// Waits for a permit unless `token` is cancelled first.
    pub async fn acquire_or_cancel(
        &self,
        token: &CancellationToken,
    ) -> Result<GatePass<'_>, AgentError> {
        select! {
            biased;
            _ = token.cancelled() => Err(AgentError::Canceled),
            res = self.permits.acquire() => match res {
                Ok(permit) => Ok(self.admit(permit)),
                Err(_closed) => Err(AgentError::Canceled),
            },
        }
    }

    /// Closes the gate: current and future waiters fail, held passes stay valid.
    pub fn close(&self) {
        self.permits.close();
    }

    fn admit<'a>(&'a self, permit: SemaphorePermit<'a>) -> GatePass<'a> {
        let now = self.held.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        GatePass {
            _permit: permit,
            held: &self.held,
        }
    }

    /// Gate name (`door`, `manager`, `safe`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configured number of permits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Agents holding a pass right now.
    pub fn held(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous holders ever observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Proof of occupancy; dropping it releases the permit.
#[must_use = "dropping a GatePass releases the gate immediately"]
#[derive(Debug)]
pub struct GatePass<'a> {
    _permit: SemaphorePermit<'a>,
    held: &'a AtomicUsize,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        // Runs before `_permit` is dropped.
        self.held.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_pass_drop_releases_permit() {
        let gate = ResourceGate::new("safe", 2);
        let a = gate.acquire().await.unwrap();
        let b = gate.acquire().await.unwrap();
        assert_eq!(gate.held(), 2);
        assert_eq!(gate.available(), 0);

        drop(a);
        assert_eq!(gate.held(), 1);
        assert_eq!(gate.available(), 1);
        drop(b);
        assert_eq!(gate.held(), 0);
        assert_eq!(gate.peak(), 2);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_holds_nothing() {
        let gate = ResourceGate::new("manager", 1);
        let token = CancellationToken::new();
        let _busy = gate.acquire().await.unwrap();

        let waiter = gate.acquire_or_cancel(&token);
        tokio::pin!(waiter);
        assert!(
            tokio::time::timeout(Duration::from_millis(20), &mut waiter)
                .await
                .is_err()
        );

        token.cancel();
        assert_eq!(waiter.await.unwrap_err(), AgentError::Canceled);
        assert_eq!(gate.held(), 1);
        assert_eq!(gate.peak(), 1);
    }

    #[tokio::test]
    async fn test_closed_gate_rejects_waiters() {
        let gate = ResourceGate::new("door", 1);
        assert_eq!(gate.name(), "door");
        gate.close();
        assert_eq!(gate.acquire().await.unwrap_err(), AgentError::Canceled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_capacity_never_exceeded_under_contention() {
        let gate = Arc::new(ResourceGate::new("safe", 2));
        let mut set = tokio::task::JoinSet::new();

        for _ in 0..32 {
            let gate = Arc::clone(&gate);
            set.spawn(async move {
                for _ in 0..10 {
                    let _pass = gate.acquire().await.unwrap();
                    assert!(gate.held() <= 2);
                    tokio::task::yield_now().await;
                }
            });
        }
        while let Some(res) = set.join_next().await {
            res.unwrap();
        }

        assert_eq!(gate.held(), 0);
        assert!(gate.peak() <= 2, "peak {} exceeds capacity", gate.peak());
        assert_eq!(gate.available(), 2);
    }
}
