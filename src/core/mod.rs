//! Runtime core: the bank coordinator and what it is made of.
//!
//! Internal modules:
//! - [`bank`]: spawns tellers and customers, closes the bank, handles shutdown;
//! - [`builder`]: validates a [`Config`] and builds a [`Bank`];
//! - [`floor`]: the shared gates, queue, counter and barrier;
//! - [`runner`]: runs one agent and reports a cancelled exit;
//! - [`alive`]: tracks which agents are still running;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod alive;
mod bank;
mod builder;
mod config;
mod floor;
pub(crate) mod runner;
mod shutdown;

pub use bank::{Bank, Report};
pub use builder::BankBuilder;
pub use config::Config;
pub use floor::Floor;
