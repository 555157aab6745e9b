//! # Bank: spawns the agents, closes the floor, and handles shutdown.
//!
//! The [`Bank`] owns the event bus, the shared [`Floor`], the subscriber list and
//! a runtime cancellation token. [`Bank::run`] plays one whole day at the bank.
//!
//! ## Key responsibilities
//! - subscribe to the [`Bus`] and **fan-out** events via [`SubscriberSet`]
//! - spawn every teller, then every customer with a sampled arrival gap
//! - once every customer has left, wake the tellers parked on the empty queue
//! - handle OS termination signals and [`Bank::shutdown_token`] with a grace period
//!
//! ## High-level architecture
//! ```text
//! run():
//!   listener: Bus.subscribe() ─► AliveTracker::update ─► SubscriberSet::emit
//!
//!   tellers:   Teller[0..T]   ──► run_agent(teller, runtime_token.child_token())
//!   observer:  barrier.wait() ──► publish(BankOpen)
//!   customers: Customer[0..C] ──► run_agent(customer, child), pause(arrival) between
//!
//! Normal close:
//!   join all customers ─► queue.wake_all() ─► join all tellers ─► publish(BankClosed)
//!
//! Shutdown path (OS signal or shutdown_token):
//!   publish(ShutdownRequested) ─► runtime_token.cancel()
//!   wait_all_with_grace(cfg.grace):
//!     ├─ Ok (all joined)  → publish(AllStoppedWithin), publish(BankClosed)
//!     └─ Timeout exceeded → publish(GraceExceeded), Err(GraceExceeded{ stuck })
//! ```
//!
//! The listener stops after the first terminal event and drains every subscriber
//! queue before `run` returns, so a [`Journal`](crate::Journal) holds the full trace.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use bankfloor::{Bank, Config, Journal, Subscribe};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { tellers: 2, customers: 6, ..Config::default() }.without_delays();
//!     let journal = Journal::arc();
//!
//!     let bank = Bank::builder(cfg)
//!         .with_subscribers(vec![journal.clone() as Arc<dyn Subscribe>])
//!         .build()?;
//!
//!     let report = bank.run().await?;
//!     assert_eq!(report.served, 6);
//!     assert!(report.is_complete());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::{
    sync::broadcast::error::RecvError,
    task::{JoinHandle, JoinSet},
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    agents::{Customer, Teller},
    core::{
        alive::AliveTracker,
        builder::BankBuilder,
        config::Config,
        floor::Floor,
        runner::{pause, run_agent},
        shutdown,
    },
    error::{AgentError, RuntimeError},
    events::{Bus, Event, EventKind},
    subscribers::{Subscribe, SubscriberSet},
};

type Agents = JoinSet<Result<(), AgentError>>;

/// Summary of one bank run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Configured number of tellers.
    pub tellers: usize,
    /// Configured number of customers.
    pub customers: usize,
    /// Customers whose transaction was completed.
    pub served: usize,
    /// Tellers that closed normally.
    pub tellers_closed: usize,
    /// Customers that left normally.
    pub customers_left: usize,
    /// Most customers ever inside at once.
    pub door_peak: usize,
    /// Most tellers ever with the manager at once.
    pub manager_peak: usize,
    /// Most tellers ever in the safe at once.
    pub safe_peak: usize,
    /// Tickets put in line.
    pub enqueued: u64,
    /// Tickets taken by tellers.
    pub dequeued: u64,
}

impl Report {
    /// True if every customer was served and every agent finished normally.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.served == self.customers
            && self.customers_left == self.customers
            && self.tellers_closed == self.tellers
    }
}

#[derive(Default)]
struct Tally {
    tellers_closed: usize,
    customers_left: usize,
}

/// Coordinates tellers and customers, event delivery, and graceful shutdown.
pub struct Bank {
    cfg: Config,
    bus: Bus,
    floor: Arc<Floor>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    alive: Arc<AliveTracker>,
    runtime_token: CancellationToken,
}

impl Bank {
    /// Starts building a bank from `cfg`.
    #[must_use]
    pub fn builder(cfg: Config) -> BankBuilder {
        BankBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let floor = Arc::new(Floor::new(cfg.clone(), bus.clone()));
        Self {
            cfg,
            bus,
            floor,
            subscribers,
            alive: Arc::new(AliveTracker::new()),
            runtime_token: CancellationToken::new(),
        }
    }

    /// Token that, once cancelled, shuts the bank down like an OS signal would.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.runtime_token.clone()
    }

    /// Shared state of this bank (gates, queue, counters).
    #[must_use]
    pub fn floor(&self) -> Arc<Floor> {
        Arc::clone(&self.floor)
    }

    /// Runs the bank until every customer has been served and every teller has closed,
    /// or until a shutdown is requested.
    ///
    /// A requested shutdown that finishes within [`Config::grace`] still returns `Ok`;
    /// the report then shows who did not finish normally.
    pub async fn run(self) -> Result<Report, RuntimeError> {
        let listener = self.spawn_listener();
        let mut tellers = Agents::new();
        let mut customers = Agents::new();
        let mut tally = Tally::default();

        self.spawn_tellers(&mut tellers);
        let opening = self.spawn_open_observer();

        // A cancelled token also lets `admit_and_close` finish, so the shutdown
        // branches must win when both are ready.
        let interrupted = tokio::select! {
            biased;
            _ = shutdown::os_signal() => true,
            _ = self.runtime_token.cancelled() => true,
            _ = self.admit_and_close(&mut tellers, &mut customers, &mut tally) => false,
        };

        let outcome = if interrupted {
            self.bus.publish(Event::new(EventKind::ShutdownRequested));
            self.runtime_token.cancel();
            // Nobody new gets a pass once the bank is closing.
            for gate in [&self.floor.door, &self.floor.manager, &self.floor.safe] {
                gate.close();
            }
            opening.abort();
            self.wait_all_with_grace(&mut tellers, &mut customers, &mut tally)
                .await
        } else {
            let _ = opening.await;
            Ok(())
        };

        if let Err(e) = outcome {
            let _ = listener.await;
            return Err(e);
        }

        let report = self.report(&tally).await;
        self.bus.publish(
            Event::new(EventKind::BankClosed).with_reason(format!(
                "served={}/{} tellers_closed={}",
                report.served, report.customers, report.tellers_closed
            )),
        );
        let _ = listener.await;
        Ok(report)
    }

    /// Subscribes to the bus and feeds the alive tracker and subscribers until a terminal event.
    fn spawn_listener(&self) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());
        let alive = Arc::clone(&self.alive);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        alive.update(&ev).await;
                        set.emit(&ev);
                        if ev.kind.is_terminal() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        set.emit(&Event::listener_lagged(skipped));
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }

    fn spawn_tellers(&self, set: &mut Agents) {
        // `Config::validate` keeps both counts within u32.
        for id in (0u32..).take(self.cfg.tellers) {
            let teller = Teller::new(id, Arc::clone(&self.floor));
            set.spawn(run_agent(
                teller,
                self.runtime_token.child_token(),
                self.bus.clone(),
            ));
        }
    }

    /// Publishes `BankOpen` once every teller has reported ready.
    fn spawn_open_observer(&self) -> JoinHandle<()> {
        let floor = Arc::clone(&self.floor);
        let token = self.runtime_token.child_token();
        tokio::spawn(async move {
            if floor.barrier.wait_or_cancel(&token).await.is_ok() {
                floor.publish(Event::new(EventKind::BankOpen));
            }
        })
    }

    /// Lets customers in, waits for all of them, then closes the tellers.
    async fn admit_and_close(
        &self,
        tellers: &mut Agents,
        customers: &mut Agents,
        tally: &mut Tally,
    ) {
        for (id, index) in (0u32..).zip(0..self.cfg.customers) {
            let customer = Customer::new(
                id,
                self.cfg.transaction_for(index),
                Arc::clone(&self.floor),
            );
            customers.spawn(run_agent(
                customer,
                self.runtime_token.child_token(),
                self.bus.clone(),
            ));

            let last = index + 1 == self.cfg.customers;
            if !last && pause(self.cfg.arrival, &self.runtime_token).await.is_err() {
                return;
            }
        }

        tally.customers_left += drain(customers).await;
        // Tellers parked on an empty queue must re-check the served count.
        self.floor.queue.wake_all();
        tally.tellers_closed += drain(tellers).await;
    }

    /// Waits for all agents to finish within the configured grace period.
    async fn wait_all_with_grace(
        &self,
        tellers: &mut Agents,
        customers: &mut Agents,
        tally: &mut Tally,
    ) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async {
            tally.customers_left += drain(customers).await;
            tally.tellers_closed += drain(tellers).await;
        };

        match time::timeout(grace, done).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                let stuck = self.alive.snapshot().await;
                self.bus.publish(
                    Event::new(EventKind::GraceExceeded).with_reason(stuck.join(",")),
                );
                tellers.abort_all();
                customers.abort_all();
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }

    async fn report(&self, tally: &Tally) -> Report {
        let floor = &self.floor;
        Report {
            tellers: self.cfg.tellers,
            customers: self.cfg.customers,
            served: floor.served.get().await,
            tellers_closed: tally.tellers_closed,
            customers_left: tally.customers_left,
            door_peak: floor.door.peak(),
            manager_peak: floor.manager.peak(),
            safe_peak: floor.safe.peak(),
            enqueued: floor.queue.enqueued(),
            dequeued: floor.queue.dequeued(),
        }
    }
}

/// Joins every task in `set`, returning how many finished with `Ok`.
async fn drain(set: &mut Agents) -> usize {
    let mut ok = 0;
    while let Some(res) = set.join_next().await {
        if matches!(res, Ok(Ok(()))) {
            ok += 1;
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::{
        agents::Transaction, error::ConfigError, policies::DelayRange, subscribers::Journal,
    };

    const LIVENESS: Duration = Duration::from_secs(20);

    fn bank_with_journal(cfg: Config) -> (Bank, Arc<Journal>) {
        let journal = Journal::arc();
        let bank = Bank::builder(cfg)
            .with_subscriber(journal.clone())
            .build()
            .expect("valid config");
        (bank, journal)
    }

    async fn run_bounded(bank: Bank) -> Result<Report, RuntimeError> {
        time::timeout(LIVENESS, bank.run())
            .await
            .expect("bank did not finish in time")
    }

    fn max_seq(events: &[Event]) -> u64 {
        events.iter().map(|ev| ev.seq).max().unwrap_or(0)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_single_teller_serves_both_then_closes() {
        let cfg = Config {
            tellers: 1,
            customers: 2,
            transactions: Some(vec![Transaction::Withdraw, Transaction::Deposit]),
            ..Config::default()
        }
        .without_delays();
        let (bank, journal) = bank_with_journal(cfg);

        let report = run_bounded(bank).await.expect("run ok");
        assert_eq!(report.served, 2);
        assert!(report.is_complete());
        assert_eq!(report.manager_peak, 1);

        let done = journal.of_kind(EventKind::TransactionDone).await;
        let closing = journal.of_kind(EventKind::TellerClosing).await;
        assert_eq!(done.len(), 2);
        assert_eq!(closing.len(), 1);
        assert!(closing[0].seq > max_seq(&done));

        // Only the withdrawal visits the manager.
        let manager = journal.of_kind(EventKind::ManagerEntered).await;
        assert_eq!(manager.len(), 1);
        assert_eq!(manager[0].customer, Some(0));
    }

    #[tokio::test]
    async fn test_no_customers_every_teller_closes() {
        let cfg = Config {
            tellers: 3,
            customers: 0,
            ..Config::default()
        };
        let (bank, journal) = bank_with_journal(cfg);

        let report = run_bounded(bank).await.expect("run ok");
        assert_eq!(report.served, 0);
        assert_eq!(report.tellers_closed, 3);
        assert_eq!(journal.count(EventKind::TellerClosing).await, 3);
        assert_eq!(journal.count(EventKind::TellerServing).await, 0);
        assert_eq!(journal.count(EventKind::BankClosed).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_busy_day_respects_capacities() {
        let cfg = Config {
            tellers: 3,
            customers: 50,
            arrival: DelayRange::millis(0, 1),
            manager_delay: DelayRange::millis(0, 2),
            safe_delay: DelayRange::millis(0, 2),
            ..Config::default()
        };
        let (bank, journal) = bank_with_journal(cfg);
        let floor = bank.floor();

        let report = run_bounded(bank).await.expect("run ok");
        assert!(report.is_complete());
        assert!(report.door_peak <= 2);
        assert!(report.manager_peak <= 1);
        assert!(report.safe_peak <= 2);
        assert_eq!(report.enqueued, 50);
        assert_eq!(report.dequeued, 50);
        assert_eq!(floor.door.held(), 0);
        assert_eq!(floor.safe.held(), 0);

        let events = journal.events().await;
        let mut done: HashMap<u32, u64> = HashMap::new();
        let mut leaving: HashMap<u32, u64> = HashMap::new();
        for ev in &events {
            let Some(c) = ev.customer else { continue };
            match ev.kind {
                EventKind::TransactionDone => {
                    assert!(done.insert(c, ev.seq).is_none(), "customer {c} served twice");
                }
                EventKind::CustomerLeaving => {
                    assert!(leaving.insert(c, ev.seq).is_none(), "customer {c} left twice");
                }
                _ => {}
            }
        }
        assert_eq!(done.len(), 50);
        assert_eq!(leaving.len(), 50);
        for (c, left) in &leaving {
            assert!(*left > done[c], "customer {c} left before being served");
        }

        let last_done = done.values().copied().max().unwrap_or(0);
        for ev in events.iter().filter(|ev| ev.kind == EventKind::TellerClosing) {
            assert!(ev.seq > last_done);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_token_stops_parked_agents() {
        let cfg = Config {
            tellers: 2,
            customers: 5,
            arrival: DelayRange::ZERO,
            safe_delay: DelayRange::fixed(Duration::from_secs(60)),
            grace: Duration::from_secs(5),
            ..Config::default()
        };
        let (bank, journal) = bank_with_journal(cfg);
        let floor = bank.floor();
        let token = bank.shutdown_token();

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let report = run_bounded(bank).await.expect("stopped within grace");
        assert!(!report.is_complete());
        assert_eq!(report.served, 0);
        assert_eq!(floor.door.held(), 0);
        assert_eq!(floor.safe.held(), 0);

        assert_eq!(journal.count(EventKind::ShutdownRequested).await, 1);
        assert_eq!(journal.count(EventKind::AllStoppedWithin).await, 1);
        assert_eq!(journal.count(EventKind::BankClosed).await, 1);
        assert!(journal.count(EventKind::AgentCancelled).await >= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_run_always_reports_shutdown() {
        for _ in 0..100 {
            let cfg = Config {
                tellers: 2,
                customers: 5,
                arrival: DelayRange::ZERO,
                safe_delay: DelayRange::fixed(Duration::from_secs(60)),
                ..Config::default()
            };
            let (bank, journal) = bank_with_journal(cfg);
            let token = bank.shutdown_token();
            tokio::spawn(async move {
                time::sleep(Duration::from_millis(5)).await;
                token.cancel();
            });

            let report = run_bounded(bank).await.expect("stopped within grace");
            assert_eq!(report.served, 0);
            assert_eq!(journal.count(EventKind::ShutdownRequested).await, 1);
            assert_eq!(journal.count(EventKind::AllStoppedWithin).await, 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_grace_exceeded_names_stuck_tellers() {
        let cfg = Config {
            tellers: 2,
            customers: 2,
            grace: Duration::from_millis(100),
            ..Config::default()
        }
        .without_delays();
        let (bank, journal) = bank_with_journal(cfg);
        let floor = bank.floor();
        let token = bank.shutdown_token();

        // Tellers block on the served counter, which does not observe cancellation.
        let guard = floor.served.hold().await;
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let res = run_bounded(bank).await;
        drop(guard);

        match res {
            Err(RuntimeError::GraceExceeded { grace, stuck }) => {
                assert_eq!(grace, Duration::from_millis(100));
                assert!(stuck.contains(&"teller-0".to_string()), "stuck: {stuck:?}");
                assert!(stuck.contains(&"teller-1".to_string()), "stuck: {stuck:?}");
            }
            other => panic!("expected GraceExceeded, got {other:?}"),
        }
        assert_eq!(journal.count(EventKind::GraceExceeded).await, 1);
        assert_eq!(journal.count(EventKind::AllStoppedWithin).await, 0);
        assert_eq!(journal.count(EventKind::BankClosed).await, 0);
    }

    #[tokio::test]
    async fn test_listener_reports_skipped_events() {
        let cfg = Config {
            bus_capacity: 1,
            ..Config::default()
        };
        let (bank, journal) = bank_with_journal(cfg);
        let listener = bank.spawn_listener();

        for id in 0..4 {
            bank.bus
                .publish(Event::new(EventKind::TellerReady).with_teller(id));
        }
        bank.bus.publish(Event::new(EventKind::BankClosed));
        listener.await.expect("listener");

        let notices = journal.of_kind(EventKind::SubscriberOverflow).await;
        assert_eq!(notices.len(), 1);
        assert!(
            notices[0]
                .reason
                .as_deref()
                .is_some_and(|r| r.contains("skipped=4"))
        );
        assert_eq!(journal.count(EventKind::TellerReady).await, 0);
        assert_eq!(journal.count(EventKind::BankClosed).await, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_run() {
        let cfg = Config {
            safe_capacity: 0,
            ..Config::default()
        };
        let err = Bank::builder(cfg).build().err().expect("rejected");
        assert!(matches!(
            err,
            RuntimeError::InvalidConfig(ConfigError::ZeroCapacity { gate: "safe" })
        ));
    }
}
