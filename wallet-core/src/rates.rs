//! External BTC/USD rate source
//!
//! The live client fetches the spot price from the CoinGecko simple-price
//! endpoint and caches the last rate for a configurable TTL. A fetch
//! failure after a successful one falls back to the stale cached rate;
//! only a failure with no cached rate at all surfaces as an error.

use crate::config::RateSourceConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Provider of the current BTC price in USD.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Current price of one bitcoin in US dollars.
    async fn btc_usd(&self) -> Result<f64>;
}

#[derive(Debug, Deserialize)]
struct PriceQuote {
    usd: f64,
}

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: f64,
    fetched_at: Instant,
}

/// CoinGecko-backed rate source with a single-entry TTL cache.
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
    ttl: Duration,
    cache: Mutex<Option<CachedRate>>,
}

impl CoinGeckoClient {
    /// Build a client from configuration.
    pub fn new(config: &RateSourceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            ttl: Duration::from_secs(config.cache_ttl_secs),
            cache: Mutex::new(None),
        })
    }

    async fn fetch(&self) -> Result<f64> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("ids", "bitcoin"), ("vs_currencies", "usd")])
            .send()
            .await?
            .error_for_status()?;

        let quotes: HashMap<String, PriceQuote> = response.json().await?;
        let quote = quotes
            .get("bitcoin")
            .ok_or_else(|| Error::RateUnavailable("no bitcoin quote in response".to_string()))?;

        Ok(quote.usd)
    }
}

#[async_trait]
impl RateSource for CoinGeckoClient {
    async fn btc_usd(&self) -> Result<f64> {
        if let Some(cached) = *self.cache.lock() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.rate);
            }
        }

        match self.fetch().await {
            Ok(rate) => {
                debug!(rate, "fetched btc/usd rate");
                *self.cache.lock() = Some(CachedRate {
                    rate,
                    fetched_at: Instant::now(),
                });
                Ok(rate)
            }
            Err(err) => {
                // Stale data beats no data for display-only conversions.
                if let Some(cached) = *self.cache.lock() {
                    warn!(error = %err, "rate fetch failed, serving stale rate");
                    return Ok(cached.rate);
                }
                Err(err)
            }
        }
    }
}

/// Fixed rate source for tests and offline runs.
pub struct FixedRate(
    /// The rate to always return
    pub f64,
);

#[async_trait]
impl RateSource for FixedRate {
    async fn btc_usd(&self) -> Result<f64> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_rate() {
        let source = FixedRate(60_000.0);
        assert_eq!(source.btc_usd().await.unwrap(), 60_000.0);
    }

    #[test]
    fn test_quote_parsing() {
        let body = r#"{"bitcoin":{"usd":64123.5}}"#;
        let quotes: HashMap<String, PriceQuote> = serde_json::from_str(body).unwrap();
        assert_eq!(quotes["bitcoin"].usd, 64123.5);
    }
}
