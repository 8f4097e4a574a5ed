//! CryptoCompare price adapter

use serde::Deserialize;

use super::{json_error, validate_price, SourceAdapter};
use crate::types::{SourceError, SourceId};

const DEFAULT_URL: &str = "https://min-api.cryptocompare.com/data/price?fsym=BTC&tsyms=USD";

#[derive(Deserialize)]
struct PriceResponse {
    #[serde(rename = "USD")]
    usd: f64,
}

pub struct CryptoCompareAdapter {
    url: String,
}

impl CryptoCompareAdapter {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for CryptoCompareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for CryptoCompareAdapter {
    fn id(&self) -> SourceId {
        SourceId::CryptoCompare
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn parse(&self, body: &mut [u8]) -> Result<f64, SourceError> {
        let response: PriceResponse = simd_json::from_slice(body).map_err(json_error)?;
        validate_price(response.usd)
    }
}
