//! Binance spot ticker adapter

use serde::Deserialize;

use super::{json_error, parse_decimal, SourceAdapter};
use crate::types::{SourceError, SourceId};

const DEFAULT_URL: &str = "https://api.binance.com/api/v3/ticker/price?symbol=BTCUSDT";

/// `{"symbol":"BTCUSDT","price":"60123.45000000"}`
#[derive(Deserialize)]
struct BinanceTicker<'a> {
    price: &'a str,
}

/// Adapter for the Binance `ticker/price` endpoint
pub struct BinanceAdapter {
    url: String,
}

impl BinanceAdapter {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_URL)
    }

    /// Point the adapter at another endpoint (for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for BinanceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for BinanceAdapter {
    fn id(&self) -> SourceId {
        SourceId::Binance
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn parse(&self, body: &mut [u8]) -> Result<f64, SourceError> {
        let ticker: BinanceTicker = simd_json::from_slice(body).map_err(json_error)?;
        parse_decimal(ticker.price)
    }
}
