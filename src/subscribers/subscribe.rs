//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for consuming the bank's event log.
//!
//! Each subscriber gets:
//! - **Dedicated worker task**, so its writes are serialized (never interleaved)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::SubscriberPanicked`)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only** and publishes
//!   `EventKind::SubscriberOverflow`.
//! - Events are processed sequentially (FIFO) per subscriber, in bus order.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use bankfloor::{Event, EventKind, Subscribe};
//!
//! struct Withdrawals;
//!
//! #[async_trait]
//! impl Subscribe for Withdrawals {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::ManagerEntered) {
//!             // count manager visits, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "withdrawals" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Consumer of the bank's event log.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's own worker task, never from an agent.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (clamped to at least 1).
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
