//! # Bank configuration.
//!
//! Provides [`Config`], every knob of a bank run in one place.
//!
//! Config is used in two ways:
//! 1. **Validation**: `Bank::builder(config).build()` calls [`Config::validate`]
//! 2. **Floor construction**: gate capacities, queue, counter and barrier are sized from it
//!
//! ## Sentinel values
//! - `customers = 0` → valid; tellers open and close immediately
//! - `transactions = None` → each customer picks deposit/withdraw uniformly at random

use std::time::Duration;

use crate::agents::Transaction;
use crate::error::ConfigError;
use crate::policies::DelayRange;

/// Global configuration for a bank run.
///
/// Defines:
/// - **Agents**: how many tellers and customers
/// - **Gates**: capacity of the door, the manager and the safe
/// - **Timing**: arrival stagger and simulated work in front of the manager and in the safe
/// - **Runtime**: shutdown grace and event bus capacity
///
/// ## Notes
/// All fields are public. Call [`Config::validate`] (the builder does) before use.
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of teller agents (must be at least 1).
    pub tellers: usize,

    /// Number of customer agents.
    pub customers: usize,

    /// How many customers may be inside the bank at once.
    pub door_capacity: usize,

    /// How many tellers may talk to the manager at once.
    pub manager_capacity: usize,

    /// How many tellers may be in the safe at once.
    pub safe_capacity: usize,

    /// Pause between two customer spawns.
    pub arrival: DelayRange,

    /// Time a teller holds the manager gate for a withdrawal.
    pub manager_delay: DelayRange,

    /// Time a teller holds the safe gate.
    pub safe_delay: DelayRange,

    /// Fixed transaction per customer, indexed by customer id.
    ///
    /// - `None` → random choice per customer
    /// - `Some(v)` → `v.len()` must equal `customers`
    pub transactions: Option<Vec<Transaction>>,

    /// Maximum time to wait for agents after a shutdown request.
    ///
    /// When a shutdown signal is received:
    /// - Every agent's token is cancelled
    /// - The bank waits up to `grace` for them to exit
    /// - If that times out, `run` returns `RuntimeError::GraceExceeded`
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// A listener lagging more than `bus_capacity` events behind skips the oldest ones.
    /// The bank's listener then hands subscribers a `SubscriberOverflow` event naming
    /// how many were skipped; the skipped events are lost for subscribers and for the
    /// liveness tracking used to name stuck agents.
    pub bus_capacity: usize,
}

impl Config {
    /// Checks that the configuration describes a bank that can terminate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tellers == 0 {
            return Err(ConfigError::NoTellers);
        }
        for (field, count) in [("tellers", self.tellers), ("customers", self.customers)] {
            if u32::try_from(count).is_err() {
                return Err(ConfigError::TooManyAgents { field });
            }
        }
        for (gate, capacity) in [
            ("door", self.door_capacity),
            ("manager", self.manager_capacity),
            ("safe", self.safe_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::ZeroCapacity { gate });
            }
        }
        for (field, range) in [
            ("arrival", self.arrival),
            ("manager_delay", self.manager_delay),
            ("safe_delay", self.safe_delay),
        ] {
            if !range.is_valid() {
                return Err(ConfigError::InvertedRange { field });
            }
        }
        if let Some(fixed) = &self.transactions {
            if fixed.len() != self.customers {
                return Err(ConfigError::TransactionCount {
                    expected: self.customers,
                    got: fixed.len(),
                });
            }
        }
        Ok(())
    }

    /// Transaction for customer `id`: the fixed one if configured, otherwise random.
    pub fn transaction_for(&self, id: usize) -> Transaction {
        self.transactions
            .as_ref()
            .and_then(|fixed| fixed.get(id).copied())
            .unwrap_or_else(Transaction::random)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Same configuration with every simulated delay set to zero.
    ///
    /// Handy for tests that only care about the protocol.
    pub fn without_delays(mut self) -> Self {
        self.arrival = DelayRange::ZERO;
        self.manager_delay = DelayRange::ZERO;
        self.safe_delay = DelayRange::ZERO;
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tellers = 3`, `customers = 50`
    /// - `door = 2`, `manager = 1`, `safe = 2`
    /// - `arrival = 1..=5ms`, `manager_delay = 5..=30ms`, `safe_delay = 10..=50ms`
    /// - `transactions = None` (random)
    /// - `grace = 10s`, `bus_capacity = 4096`
    fn default() -> Self {
        Self {
            tellers: 3,
            customers: 50,
            door_capacity: 2,
            manager_capacity: 1,
            safe_capacity: 2,
            arrival: DelayRange::millis(1, 5),
            manager_delay: DelayRange::millis(5, 30),
            safe_delay: DelayRange::millis(10, 50),
            transactions: None,
            grace: Duration::from_secs(10),
            bus_capacity: 4096,
        }
    }
}
