//! # Floor: everything the agents share.
//!
//! One `Floor` is built per bank run and handed to every agent behind an `Arc`.
//! It replaces process-wide statics: the gates, the work queue, the served counter,
//! the startup barrier, the event bus and the configuration all live here.
//!
//! ```text
//!                 ┌──────────────── Arc<Floor> ────────────────┐
//!                 │ door   manager   safe      (ResourceGate)  │
//!   Customer ───► │ queue                      (WorkQueue)     │ ◄─── Teller
//!                 │ served                     (ServedCounter) │
//!                 │ barrier                    (StartupBarrier)│
//!                 │ bus, cfg                                   │
//!                 └────────────────────────────────────────────┘
//! ```

use crate::{
    core::config::Config,
    events::{Bus, Event},
    sync::{ResourceGate, ServedCounter, StartupBarrier, WorkQueue},
};

/// Shared coordination context of one bank run.
#[derive(Debug)]
pub struct Floor {
    /// Bounds how many customers are inside.
    pub door: ResourceGate,
    /// Bounds how many tellers talk to the manager.
    pub manager: ResourceGate,
    /// Bounds how many tellers are in the safe.
    pub safe: ResourceGate,
    /// Pending customers.
    pub queue: WorkQueue,
    /// Customers fully served so far.
    pub served: ServedCounter,
    /// Released once every teller is ready.
    pub barrier: StartupBarrier,
    pub(crate) bus: Bus,
    cfg: Config,
}

impl Floor {
    /// Builds the shared context from an already validated configuration.
    pub fn new(cfg: Config, bus: Bus) -> Self {
        Self {
            door: ResourceGate::new("door", cfg.door_capacity),
            manager: ResourceGate::new("manager", cfg.manager_capacity),
            safe: ResourceGate::new("safe", cfg.safe_capacity),
            queue: WorkQueue::new(),
            served: ServedCounter::new(cfg.customers),
            barrier: StartupBarrier::new(cfg.tellers),
            bus,
            cfg,
        }
    }

    /// Configuration this floor was built from.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Publishes an event on the bank's bus.
    #[inline]
    pub(crate) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }
}
