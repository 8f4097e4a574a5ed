//! CoinGecko simple price adapter

use serde::Deserialize;

use super::{json_error, validate_price, SourceAdapter};
use crate::types::{SourceError, SourceId};

const DEFAULT_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd";

/// `{"bitcoin":{"usd":60098}}`, the only adapter whose price is a JSON number
#[derive(Deserialize)]
struct SimplePrice {
    bitcoin: CurrencyPrices,
}

#[derive(Deserialize)]
struct CurrencyPrices {
    usd: f64,
}

pub struct CoinGeckoAdapter {
    url: String,
}

impl CoinGeckoAdapter {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for CoinGeckoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for CoinGeckoAdapter {
    fn id(&self) -> SourceId {
        SourceId::CoinGecko
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn parse(&self, body: &mut [u8]) -> Result<f64, SourceError> {
        let response: SimplePrice = simd_json::from_slice(body).map_err(json_error)?;
        validate_price(response.bitcoin.usd)
    }
}
