use reqwest::StatusCode;
use thiserror::Error;

/// Why a quote could not be produced this cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("price source returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not decode price response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no trading pairs listed for token")]
    NoPairs,

    #[error("pair is missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid price {0:?}")]
    InvalidPrice(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("PUSHOVER_USER_KEY / PUSHOVER_API_TOKEN are missing in .env")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("notification service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("notification rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("target price for {address} must be a positive number, got {target}")]
    InvalidTarget { address: String, target: f64 },

    #[error("unknown direction {0:?} (expected \"above\" or \"below\")")]
    InvalidDirection(String),

    #[error("token address must not be empty")]
    EmptyAddress,

    #[error("watchlist is empty")]
    EmptyWatchlist,

    #[error("token {0} is listed more than once")]
    DuplicateToken(String),

    #[error("cannot read watchlist {path}: {source}")]
    ReadWatchlist {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse watchlist {path}: {source}")]
    ParseWatchlist {
        path: String,
        source: serde_json::Error,
    },
}

/// Fatal startup failures; everything after startup is retried by the loop.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
