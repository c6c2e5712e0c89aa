//! Library entrypoint for price-alert.
//!
//! The binary in `main.rs` only wires configuration to these modules; keeping
//! them here lets the integration tests under `tests/` drive the monitor loop
//! with scripted price sources and notification sinks.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{AppError, ConfigError, FetchError, NotifyError};
pub use models::{Direction, Quote, TokenWatch};
pub use services::alert_monitor::{AlertSink, MonitorPlan, PriceSource, RunSummary, StopRule};
pub use services::ledger::AlertLedger;
pub use services::message::AlertMessage;
