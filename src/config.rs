use std::{collections::HashSet, env, fs, path::Path, str::FromStr, time::Duration};

use crate::{
    error::ConfigError,
    models::{Direction, TokenWatch},
    services::{dexscreener, pushover},
};

pub const DEFAULT_TOKEN_ADDRESS: &str = "Cm6fNnMk7NfzStP9CZpsQA2v3jjzbcYGAxdJySmHpump";

#[derive(Debug, Clone)]
pub struct Settings {
    pub pushover_user_key: String,
    pub pushover_api_token: String,

    pub dexscreener_url: String,
    pub pushover_url: String,

    pub check_interval: Duration,
    pub request_timeout: Duration,

    // single-token mode
    pub token_address: String,
    pub target_price: f64,
    pub direction: Direction,
}

impl Settings {
    pub fn single_watch(&self) -> TokenWatch {
        TokenWatch::new(self.token_address.clone(), self.target_price, self.direction)
    }
}

pub fn load() -> Result<Settings, ConfigError> {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    from_lookup(|key| env::var(key).ok())
}

/// Builds settings from any key/value source; unset keys fall back to defaults.
pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

    let check_interval = Duration::from_secs(parse_or(&lookup, "CHECK_INTERVAL", 30u64)?);
    let request_timeout = Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10u64)?);

    let target_price = parse_or(&lookup, "TARGET_PRICE", 0.03f64)?;
    let direction = match lookup("DIRECTION") {
        Some(raw) => raw.parse()?,
        None => Direction::Above,
    };

    Ok(Settings {
        pushover_user_key: text("PUSHOVER_USER_KEY", ""),
        pushover_api_token: text("PUSHOVER_API_TOKEN", ""),
        dexscreener_url: text("DEXSCREENER_URL", dexscreener::DEFAULT_BASE_URL),
        pushover_url: text("PUSHOVER_URL", pushover::DEFAULT_BASE_URL),
        check_interval,
        request_timeout,
        token_address: text("TOKEN_ADDRESS", DEFAULT_TOKEN_ADDRESS),
        target_price,
        direction,
    })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Reads a JSON array of watches, e.g.
/// `[{"address": "...", "target": 0.027, "direction": "above", "name": "MyMemeCoin"}]`.
pub fn load_watchlist(path: impl AsRef<Path>) -> Result<Vec<TokenWatch>, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadWatchlist {
        path: display.clone(),
        source,
    })?;

    let watches: Vec<TokenWatch> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseWatchlist {
            path: display,
            source,
        })?;

    validate_watchlist(&watches)?;
    Ok(watches)
}

pub fn validate_watchlist(watches: &[TokenWatch]) -> Result<(), ConfigError> {
    if watches.is_empty() {
        return Err(ConfigError::EmptyWatchlist);
    }

    let mut seen = HashSet::new();
    for w in watches {
        w.validate()?;
        if !seen.insert(w.address.as_str()) {
            return Err(ConfigError::DuplicateToken(w.address.clone()));
        }
    }
    Ok(())
}
