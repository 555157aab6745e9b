//! Bank agents.
//!
//! This module defines the [`Agent`] trait and its two implementations:
//! [`Teller`] (consumer) and [`Customer`] (producer), plus the [`Transaction`]
//! a customer requests and the [`AgentId`] both are known by.

mod agent;
mod customer;
mod teller;
mod transaction;

pub use agent::{Agent, AgentId};
pub use customer::Customer;
pub use teller::Teller;
pub use transaction::Transaction;
