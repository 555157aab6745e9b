//! # LogWriter: human-readable bank trace on stdout.
//!
//! Prints one sentence per event. Because a subscriber has exactly one worker,
//! lines never interleave.
//!
//! ## Example output
//! ```text
//! Teller 0 is ready to serve.
//! Bank is now open.
//! Customer 3 is going to the bank.
//! Customer 3 has entered the bank.
//! Teller 1 is serving Customer 3.
//! Teller 1 is going to the manager.
//! Teller 1 informs Customer 3 that the transaction is done.
//! Customer 3 is leaving the bank.
//! Teller 1 has no more customers and is closing.
//! Bank is now closed.
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render(e: &Event) -> String {
        let t = e.teller.unwrap_or_default();
        let c = e.customer.unwrap_or_default();
        let tx = e.transaction.map(|kind| kind.as_noun()).unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::TellerReady => format!("Teller {t} is ready to serve."),
            EventKind::TellerServing => format!("Teller {t} is serving Customer {c}."),
            EventKind::TransactionRequested => {
                format!("Customer {c} asks Teller {t} for a {tx} transaction.")
            }
            EventKind::ManagerRequested => format!("Teller {t} is going to the manager."),
            EventKind::ManagerEntered => {
                format!("Teller {t} is getting the manager's permission.")
            }
            EventKind::ManagerDone => format!("Teller {t} got the manager's permission."),
            EventKind::SafeRequested => format!("Teller {t} is going to the safe."),
            EventKind::SafeEntered => format!("Teller {t} is entering the safe."),
            EventKind::SafeDone => {
                format!("Teller {t} has completed the transaction in the safe.")
            }
            EventKind::TransactionDone => {
                format!("Teller {t} informs Customer {c} that the {tx} is done.")
            }
            EventKind::TellerClosing => {
                format!("Teller {t} has no more customers and is closing.")
            }
            EventKind::CustomerArriving => format!("Customer {c} is going to the bank."),
            EventKind::CustomerEntered => format!("Customer {c} has entered the bank."),
            EventKind::CustomerQueued => format!("Customer {c} is getting in line."),
            EventKind::CustomerLeaving => format!("Customer {c} is leaving the bank."),
            EventKind::BankOpen => "Bank is now open.".to_string(),
            EventKind::BankClosed => format!("Bank is now closed. {reason}"),
            EventKind::AgentCancelled => match (e.teller, e.customer) {
                (Some(t), _) => format!("Teller {t} was cancelled ({reason})."),
                (None, _) => format!("Customer {c} was cancelled ({reason})."),
            },
            EventKind::ShutdownRequested => "[shutdown-requested]".to_string(),
            EventKind::AllStoppedWithin => "[all-stopped-within-grace]".to_string(),
            EventKind::GraceExceeded => format!("[grace-exceeded] {reason}"),
            EventKind::SubscriberOverflow => format!("[subscriber-overflow] {reason}"),
            EventKind::SubscriberPanicked => format!("[subscriber-panicked] {reason}"),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
