use std::time::Duration;

use chrono::Local;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::{
    error::{FetchError, NotifyError},
    models::{Quote, TokenWatch},
    services::{condition, ledger::AlertLedger, message::AlertMessage},
};

/// Where quotes come from.
#[allow(async_fn_in_trait)]
pub trait PriceSource {
    async fn fetch_quote(&self, address: &str) -> Result<Quote, FetchError>;
}

/// Where alerts go.
#[allow(async_fn_in_trait)]
pub trait AlertSink {
    async fn deliver(&self, message: &AlertMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopRule {
    /// Keep polling until every watch has fired once.
    #[default]
    AllFired,
    /// Stop as soon as any alert is delivered.
    FirstAlert,
}

#[derive(Debug, Clone)]
pub struct MonitorPlan {
    pub watches: Vec<TokenWatch>,
    pub interval: Duration,
    pub stop_rule: StopRule,
    pub max_cycles: Option<u64>,
}

impl MonitorPlan {
    pub fn new(watches: Vec<TokenWatch>, interval: Duration) -> Self {
        Self {
            watches,
            interval,
            stop_rule: StopRule::AllFired,
            max_cycles: None,
        }
    }

    pub fn with_stop_rule(mut self, stop_rule: StopRule) -> Self {
        self.stop_rule = stop_rule;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }
}

/// What happened to the pending watches during one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub checked: usize,
    pub unavailable: usize,
    pub triggered: usize,
    pub delivery_failures: usize,
    pub fired: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cycles: u64,
    pub notifications_sent: usize,
    pub completed: bool,
    pub ledger: AlertLedger,
}

/// One pass over every watch that has not fired yet, in configured order.
pub async fn run_cycle<P, N>(
    source: &P,
    sink: &N,
    watches: &[TokenWatch],
    ledger: &mut AlertLedger,
) -> CycleReport
where
    P: PriceSource,
    N: AlertSink,
{
    let mut report = CycleReport::default();

    for watch in watches {
        if ledger.has_fired(&watch.address) {
            continue;
        }
        report.checked += 1;

        let quote = match source.fetch_quote(&watch.address).await {
            Ok(q) => q,
            Err(e) => {
                warn!(token = %watch.label(), error = %e, "could not fetch price, retrying next cycle");
                report.unavailable += 1;
                continue;
            }
        };

        log_status(watch, &quote);

        if !condition::is_triggered(watch, &quote) {
            continue;
        }
        report.triggered += 1;

        let name = watch.display_name().unwrap_or(&quote.symbol);
        info!(
            token = name,
            price = quote.price,
            target = watch.target_price,
            "🚨 TARGET REACHED: {} {} ${}",
            name,
            watch.direction.phrase(),
            watch.target_price
        );

        let message = AlertMessage::compose(watch, &quote, Local::now().time());
        match sink.deliver(&message).await {
            Ok(()) => {
                ledger.mark_fired(&watch.address);
                report.fired.push(watch.address.clone());
                info!(token = %quote.symbol, "✅ alert sent");
            }
            Err(e) => {
                report.delivery_failures += 1;
                error!(token = %quote.symbol, error = %e, "❌ failed to send alert");
            }
        }
    }

    report
}

fn log_status(watch: &TokenWatch, quote: &Quote) {
    let name = watch.display_name().unwrap_or(&quote.symbol);
    match condition::progress_pct(watch, quote) {
        Some(pct) => info!(
            "{}: ${:.6} | Target: {}${} ({:.1}%)",
            name,
            quote.price,
            watch.direction.comparator(),
            watch.target_price,
            pct
        ),
        None => info!(
            "{}: ${:.6} | Target: {}${}",
            name,
            quote.price,
            watch.direction.comparator(),
            watch.target_price
        ),
    }
}

/// Drives cycles until the stop rule holds, sleeping `plan.interval` in between.
///
/// The ledger is taken by value and handed back in the summary.
pub async fn run<P, N>(source: &P, sink: &N, plan: &MonitorPlan, mut ledger: AlertLedger) -> RunSummary
where
    P: PriceSource,
    N: AlertSink,
{
    let mut cycles = 0u64;
    let mut notifications_sent = 0usize;

    loop {
        cycles += 1;
        debug!(cycle = cycles, "checking prices");

        let report = run_cycle(source, sink, &plan.watches, &mut ledger).await;
        notifications_sent += report.fired.len();

        let done = match plan.stop_rule {
            StopRule::AllFired => ledger.all_fired(&plan.watches),
            StopRule::FirstAlert => notifications_sent > 0,
        };

        if done {
            info!(cycles, sent = notifications_sent, "✅ all alerts have been sent, exiting");
            return RunSummary {
                cycles,
                notifications_sent,
                completed: true,
                ledger,
            };
        }

        if plan.max_cycles.is_some_and(|max| cycles >= max) {
            warn!(cycles, sent = notifications_sent, "cycle limit reached before all alerts fired");
            return RunSummary {
                cycles,
                notifications_sent,
                completed: false,
                ledger,
            };
        }

        time::sleep(plan.interval).await;
    }
}
