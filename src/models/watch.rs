use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Fire when price >= target.
    Above,
    /// Fire when price <= target.
    Below,
}

impl Direction {
    pub fn is_met(self, price: f64, target: f64) -> bool {
        match self {
            Direction::Above => price >= target,
            Direction::Below => price <= target,
        }
    }

    pub fn comparator(self) -> &'static str {
        match self {
            Direction::Above => "≥",
            Direction::Below => "≤",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Direction::Above => "🚀",
            Direction::Below => "📉",
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Direction::Above => "reached",
            Direction::Below => "dropped to",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Above => f.write_str("above"),
            Direction::Below => f.write_str("below"),
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" => Ok(Direction::Above),
            "below" => Ok(Direction::Below),
            _ => Err(ConfigError::InvalidDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenWatch {
    pub address: String,

    #[serde(rename = "target")]
    pub target_price: f64,

    pub direction: Direction,

    #[serde(default)]
    pub name: Option<String>,
}

impl TokenWatch {
    pub fn new(address: impl Into<String>, target_price: f64, direction: Direction) -> Self {
        Self {
            address: address.into(),
            target_price,
            direction,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Rejects watches that could never be evaluated meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if !self.target_price.is_finite() || self.target_price <= 0.0 {
            return Err(ConfigError::InvalidTarget {
                address: self.address.clone(),
                target: self.target_price,
            });
        }
        Ok(())
    }

    /// Configured nickname; blank names count as unset.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Name used in logs before any quote is known.
    pub fn label(&self) -> String {
        match self.display_name() {
            Some(name) => name.to_string(),
            None => format!("{}...", self.address.chars().take(10).collect::<String>()),
        }
    }
}
