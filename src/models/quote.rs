use serde::{Deserialize, Serialize};

/// Price snapshot for one token, produced fresh every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub symbol: String,
    pub name: String,
}
