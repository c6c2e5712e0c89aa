pub mod dexscreener;
pub mod pushover;
pub mod alert_monitor;

pub mod condition;
pub mod ledger;
pub mod message;
