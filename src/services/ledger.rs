use std::collections::HashSet;

use crate::models::TokenWatch;

/// Which tokens already fired their one-shot alert in this process.
///
/// Entries are only ever added; there is no way to un-fire a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertLedger {
    fired: HashSet<String>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self, address: &str) -> bool {
        self.fired.contains(address)
    }

    /// Returns true if the token was newly marked.
    pub fn mark_fired(&mut self, address: &str) -> bool {
        self.fired.insert(address.to_string())
    }

    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }

    pub fn all_fired(&self, watches: &[TokenWatch]) -> bool {
        watches.iter().all(|w| self.has_fired(&w.address))
    }
}
