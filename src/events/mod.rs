//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to the lifecycle trace of a bank run.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Bank`, every `Teller` and `Customer`, the agent runner,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumer**: the bank's listener, which updates `AliveTracker` and fans out
//!   to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
