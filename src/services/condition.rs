use crate::models::{Direction, Quote, TokenWatch};

/// True when a single sample satisfies the watch; no debounce.
pub fn is_triggered(watch: &TokenWatch, quote: &Quote) -> bool {
    watch.direction.is_met(quote.price, watch.target_price)
}

/// How far an upward watch is toward its target, in percent.
pub fn progress_pct(watch: &TokenWatch, quote: &Quote) -> Option<f64> {
    match watch.direction {
        Direction::Above if watch.target_price > 0.0 => {
            Some(quote.price / watch.target_price * 100.0)
        }
        _ => None,
    }
}
