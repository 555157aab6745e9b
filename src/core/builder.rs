use std::sync::Arc;

use crate::{
    core::{bank::Bank, config::Config},
    error::RuntimeError,
    subscribers::Subscribe,
};

/// Builder for constructing a [`Bank`] with optional subscribers.
pub struct BankBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl BankBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive every bank event through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber to those already set.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Validates the configuration and builds the bank.
    ///
    /// Nothing is spawned until [`Bank::run`].
    pub fn build(self) -> Result<Bank, RuntimeError> {
        self.cfg.validate()?;
        Ok(Bank::new_internal(self.cfg, self.subscribers))
    }
}
