//! # Event subscribers for the bank's event log.
//!
//! ## Architecture
//! ```text
//! Agents ── publish(Event) ──► Bus ──► bank listener ──► SubscriberSet
//!                                                            │
//!                                              ┌─────────────┼─────────────┐
//!                                              ▼             ▼             ▼
//!                                          LogWriter      Journal       Custom
//! ```
//!
//! ## Built-in subscribers
//! - [`Journal`] records the trace in memory (tests, inspection)
//! - `LogWriter` prints a human-readable trace (feature `logging`)

mod journal;
#[cfg(any(test, feature = "logging"))]
mod log;
mod set;
mod subscribe;

pub use journal::Journal;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
