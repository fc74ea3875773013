//! ETH Price Feed
//!
//! Spot ETH/USD from the CoinGecko simple-price endpoint. The price is a
//! display aid only: any failure yields `None` and amounts fall back to ETH.

use alloy_primitives::U256;
use alloy_primitives::utils::{format_ether, parse_ether};
use reqwest::{Client, Url};

use crate::error::{ClientError, ClientResult};

pub const COINGECKO_ETH_USD: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=usd";

#[derive(Clone)]
pub struct PriceFeed {
    http: Client,
    url: Url,
}

impl PriceFeed {
    pub fn new(http: Client, url: Url) -> Self {
        Self { http, url }
    }

    pub fn coingecko() -> ClientResult<Self> {
        let url = Url::parse(COINGECKO_ETH_USD)
            .map_err(|e| ClientError::Config(format!("price url: {e}")))?;
        Ok(Self::new(Client::new(), url))
    }

    /// Current ETH price in USD, `None` if it could not be loaded
    pub async fn eth_usd(&self) -> Option<f64> {
        let response = match self.http.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Price request failed");
                return None;
            }
        };
        match response.json::<serde_json::Value>().await {
            Ok(body) => parse_eth_usd(&body),
            Err(e) => {
                tracing::warn!(error = %e, "Price response unreadable");
                None
            }
        }
    }
}

/// `{ "ethereum": { "usd": 2512.3 } }` -> `2512.3`
pub fn parse_eth_usd(body: &serde_json::Value) -> Option<f64> {
    body.get("ethereum")?
        .get("usd")?
        .as_f64()
        .filter(|price| price.is_finite() && *price > 0.0)
}

pub fn wei_to_eth(wei: U256) -> f64 {
    format_ether(wei).parse().unwrap_or(0.0)
}

/// `"0.500000 ETH"` or `"0.500000 ETH ($1250.00 USD)"`
pub fn format_amount(wei: U256, eth_usd: Option<f64>) -> String {
    let eth = wei_to_eth(wei);
    match eth_usd {
        Some(price) => format!("{eth:.6} ETH (${:.2} USD)", eth * price),
        None => format!("{eth:.6} ETH"),
    }
}

/// Convert a USD rent into wei at `eth_usd`. A price is required.
pub fn wei_from_usd(usd: f64, eth_usd: Option<f64>) -> ClientResult<U256> {
    let price = eth_usd.ok_or_else(|| ClientError::Config("ETH price not loaded.".to_string()))?;
    if usd.is_nan() || usd <= 0.0 || price.is_nan() || price <= 0.0 {
        return Err(ClientError::Config(
            "Rent amount must be greater than 0.".to_string(),
        ));
    }
    let eth = usd / price;
    parse_ether(&format!("{eth:.18}"))
        .map_err(|e| ClientError::Config(format!("rent value too precise: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_eth_usd() {
        assert_eq!(parse_eth_usd(&json!({ "ethereum": { "usd": 2500.5 } })), Some(2500.5));
        assert_eq!(parse_eth_usd(&json!({ "ethereum": {} })), None);
        assert_eq!(parse_eth_usd(&json!({ "error": "rate limited" })), None);
        assert_eq!(parse_eth_usd(&json!({ "ethereum": { "usd": 0 } })), None);
    }

    #[test]
    fn test_format_amount() {
        let half = U256::from(500_000_000_000_000_000u64);
        assert_eq!(format_amount(half, None), "0.500000 ETH");
        assert_eq!(format_amount(half, Some(2000.0)), "0.500000 ETH ($1000.00 USD)");
        assert_eq!(format_amount(U256::ZERO, None), "0.000000 ETH");
    }

    #[test]
    fn test_wei_from_usd() {
        let wei = wei_from_usd(1000.0, Some(2000.0)).unwrap();
        assert_eq!(wei, U256::from(500_000_000_000_000_000u64));

        assert!(wei_from_usd(1000.0, None).is_err());
        assert!(wei_from_usd(0.0, Some(2000.0)).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_feed_degrades_to_none() {
        let feed = PriceFeed::new(
            Client::new(),
            Url::parse("http://127.0.0.1:9/price").unwrap(),
        );
        assert_eq!(feed.eth_usd().await, None);
    }
}
