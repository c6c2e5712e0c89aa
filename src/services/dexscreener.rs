use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{error::FetchError, models::Quote, services::alert_monitor::PriceSource};

pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com";

#[derive(Clone)]
pub struct DexScreenerClient {
    http: Client,
    base_url: String,
}

impl DexScreenerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn token_pairs(&self, address: &str) -> Result<TokenPairsResponse, FetchError> {
        let url = format!("{}/latest/dex/tokens/{}", self.base_url, address);
        let res = self.http.get(&url).send().await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice::<TokenPairsResponse>(&bytes)?)
    }

    /// Quote from the first listed pair, which DexScreener orders by liquidity.
    pub async fn quote(&self, address: &str) -> Result<Quote, FetchError> {
        self.token_pairs(address).await?.into_quote()
    }
}

impl PriceSource for DexScreenerClient {
    async fn fetch_quote(&self, address: &str) -> Result<Quote, FetchError> {
        self.quote(address).await
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TokenPairsResponse {
    #[serde(default)]
    pub pairs: Option<Vec<Pair>>,
}

impl TokenPairsResponse {
    pub fn into_quote(self) -> Result<Quote, FetchError> {
        let pair = self
            .pairs
            .and_then(|pairs| pairs.into_iter().next())
            .ok_or(FetchError::NoPairs)?;

        let price = pair
            .price_usd
            .ok_or(FetchError::MissingField("priceUsd"))?
            .to_f64()?;

        let base = pair.base_token.unwrap_or_default();

        Ok(Quote {
            price,
            symbol: base.symbol.unwrap_or_else(|| "???".to_string()),
            name: base.name.unwrap_or_else(|| "Unknown".to_string()),
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Pair {
    #[serde(rename = "priceUsd", default)]
    pub price_usd: Option<PriceField>,

    #[serde(rename = "baseToken", default)]
    pub base_token: Option<BaseToken>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BaseToken {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub symbol: Option<String>,
}

/// DexScreener sends prices as decimal strings; some mirrors send plain numbers.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    fn to_f64(&self) -> Result<f64, FetchError> {
        let price = match self {
            PriceField::Number(n) => *n,
            PriceField::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FetchError::InvalidPrice(s.clone()))?,
        };

        if !price.is_finite() || price < 0.0 {
            return Err(FetchError::InvalidPrice(price.to_string()));
        }
        Ok(price)
    }
}
