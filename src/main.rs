use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use price_alert::{
    AlertLedger, AppError, Direction, MonitorPlan, StopRule, TokenWatch, config,
    services::{alert_monitor, dexscreener::DexScreenerClient, pushover::PushoverClient},
};

#[derive(Parser, Debug)]
#[command(name = "price-alert", about = "Push a one-shot alert when a token crosses its target price")]
struct Cli {
    /// Seconds between price checks (overrides CHECK_INTERVAL)
    #[arg(long, global = true)]
    interval: Option<u64>,

    /// Give up after this many cycles
    #[arg(long, global = true)]
    max_cycles: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch one token; exits after its alert is delivered (default)
    Watch {
        /// Token mint address (overrides TOKEN_ADDRESS)
        #[arg(long)]
        address: Option<String>,
        /// Target price in USD (overrides TARGET_PRICE)
        #[arg(long)]
        target: Option<f64>,
        /// above | below (overrides DIRECTION)
        #[arg(long)]
        direction: Option<Direction>,
    },
    /// Watch every token in a JSON watchlist; exits once all have alerted
    Watchlist {
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = config::load()?;

    let (watches, stop_rule) = match cli.command {
        Some(Command::Watchlist { path }) => (config::load_watchlist(&path)?, StopRule::AllFired),
        Some(Command::Watch {
            address,
            target,
            direction,
        }) => {
            let mut watch = settings.single_watch();
            if let Some(address) = address {
                watch.address = address;
            }
            if let Some(target) = target {
                watch.target_price = target;
            }
            if let Some(direction) = direction {
                watch.direction = direction;
            }
            (vec![watch], StopRule::FirstAlert)
        }
        None => (vec![settings.single_watch()], StopRule::FirstAlert),
    };
    config::validate_watchlist(&watches)?;

    let interval = cli
        .interval
        .map(Duration::from_secs)
        .unwrap_or(settings.check_interval);

    let source = DexScreenerClient::new(settings.dexscreener_url.clone(), settings.request_timeout)?;
    let sink = PushoverClient::new(
        settings.pushover_url.clone(),
        settings.pushover_api_token.clone(),
        settings.pushover_user_key.clone(),
        settings.request_timeout,
    )?;

    if !sink.has_credentials() {
        warn!("PUSHOVER_USER_KEY / PUSHOVER_API_TOKEN not set; alerts will fail until they are");
    }

    print_banner(&watches, interval);

    let plan = MonitorPlan::new(watches, interval)
        .with_stop_rule(stop_rule)
        .with_max_cycles(cli.max_cycles);

    let summary = alert_monitor::run(&source, &sink, &plan, AlertLedger::new()).await;
    info!(
        cycles = summary.cycles,
        sent = summary.notifications_sent,
        fired = summary.ledger.fired_count(),
        completed = summary.completed,
        "monitor stopped"
    );

    Ok(())
}

fn print_banner(watches: &[TokenWatch], interval: Duration) {
    info!("🔍 Solana token price monitor");
    info!("Monitoring {} token(s), check interval {}s", watches.len(), interval.as_secs());
    for w in watches {
        info!("  • {}: {} ${}", w.label(), w.direction.comparator(), w.target_price);
    }
}
