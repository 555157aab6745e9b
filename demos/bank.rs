//! One day at the bank, printed as it happens.
//!
//! ```text
//! cargo run --example bank --features logging -- [customers] [tellers]
//! ```
//! Ctrl-C closes the bank early; agents get `Config::grace` to wind down.

use std::sync::Arc;

use anyhow::Context;
use bankfloor::{Bank, Config, LogWriter, Subscribe};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let mut cfg = Config::default();
    if let Some(customers) = args.next() {
        cfg.customers = customers.parse().context("customers must be a number")?;
    }
    if let Some(tellers) = args.next() {
        cfg.tellers = tellers.parse().context("tellers must be a number")?;
    }

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let report = Bank::builder(cfg).with_subscribers(subs).build()?.run().await?;

    println!(
        "served {}/{} customers; peaks: door={} manager={} safe={}",
        report.served, report.customers, report.door_peak, report.manager_peak, report.safe_peak
    );
    Ok(())
}
