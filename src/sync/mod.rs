//! Synchronization primitives shared by tellers and customers.
//!
//! ## Contents
//! - [`ResourceGate`] / [`GatePass`] counting semaphore with scoped release (door, manager, safe)
//! - [`WorkQueue`] / [`Ticket`] / [`Dequeue`] FIFO handoff with guarded wait and broadcast wake
//! - [`CompletionSignal`] / [`CompletionSender`] one-shot "you are served" signal per customer
//! - [`ServedCounter`] lock-guarded termination predicate
//! - [`StartupBarrier`] countdown released once every teller is ready
//!
//! ## Lock discipline
//! The queue lock and the counter lock are never held at the same time. Gates need
//! no external lock. Tellers acquire `manager` strictly before `safe`.
//!
//! Every blocking call has a `*_or_cancel` variant taking a `CancellationToken`;
//! on cancellation it returns `AgentError::Canceled` holding nothing.

mod barrier;
mod counter;
mod gate;
mod queue;
mod signal;

pub use barrier::StartupBarrier;
pub use counter::ServedCounter;
pub use gate::{GatePass, ResourceGate};
pub use queue::{Dequeue, Ticket, WorkQueue};
pub use signal::{CompletionSender, CompletionSignal, completion};
