use chrono::NaiveTime;

use crate::models::{Quote, TokenWatch};

/// Human-readable alert text, independent of the delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub title: String,
    pub body: String,
}

impl AlertMessage {
    pub fn compose(watch: &TokenWatch, quote: &Quote, at: NaiveTime) -> Self {
        let emoji = watch.direction.emoji();

        let title = format!("{emoji} PRICE ALERT: {}", quote.symbol);
        let body = format!(
            "{emoji} {} {} ${}!\n\nCurrent price: ${:.6}\nTime: {}",
            quote.symbol,
            watch.direction.phrase(),
            watch.target_price,
            quote.price,
            at.format("%H:%M:%S"),
        );

        Self { title, body }
    }
}
