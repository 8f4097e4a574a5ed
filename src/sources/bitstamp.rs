//! Bitstamp ticker adapter

use serde::Deserialize;

use super::{json_error, parse_decimal, SourceAdapter};
use crate::types::{SourceError, SourceId};

const DEFAULT_URL: &str = "https://www.bitstamp.net/api/v2/ticker/btcusd/";

/// Bitstamp ticker; only the `last` trade price is used
#[derive(Deserialize)]
struct Ticker<'a> {
    last: &'a str,
}

pub struct BitstampAdapter {
    url: String,
}

impl BitstampAdapter {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for BitstampAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for BitstampAdapter {
    fn id(&self) -> SourceId {
        SourceId::Bitstamp
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn parse(&self, body: &mut [u8]) -> Result<f64, SourceError> {
        let ticker: Ticker = simd_json::from_slice(body).map_err(json_error)?;
        parse_decimal(ticker.last)
    }
}
