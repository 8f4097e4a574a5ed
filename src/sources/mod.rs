//! Exchange price adapters
//!
//! Each adapter knows the response shape of one public ticker endpoint and
//! turns a raw body into a validated price. Adapters never perform I/O; the
//! fetcher hands them the bytes.

pub mod binance;
pub mod bitstamp;
pub mod coinbase;
pub mod coingecko;
pub mod cryptocompare;

pub use binance::BinanceAdapter;
pub use bitstamp::BitstampAdapter;
pub use coinbase::CoinbaseAdapter;
pub use coingecko::CoinGeckoAdapter;
pub use cryptocompare::CryptoCompareAdapter;

use crate::types::{SourceError, SourceId};

/// Trait for exchange price adapters
pub trait SourceAdapter: Send + Sync {
    /// Identifier of the exchange this adapter reads
    fn id(&self) -> SourceId;

    /// Endpoint returning the JSON ticker
    fn url(&self) -> &str;

    /// Extract a validated price from a response body.
    ///
    /// The body is taken mutably because `simd-json` parses in place.
    fn parse(&self, body: &mut [u8]) -> Result<f64, SourceError>;
}

/// Parse a decimal price sent as a JSON string (e.g. `"60123.45"`)
pub(crate) fn parse_decimal(text: &str) -> Result<f64, SourceError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| SourceError::Parse(format!("not a number: {:?}", text)))?;
    validate_price(value)
}

/// Reject zero, negative and non-finite prices
pub(crate) fn validate_price(value: f64) -> Result<f64, SourceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SourceError::Parse(format!("price must be positive, got {}", value)))
    }
}

pub(crate) fn json_error(err: simd_json::Error) -> SourceError {
    SourceError::Parse(err.to_string())
}

/// Registry of the live adapter set
pub struct SourceRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl SourceRegistry {
    /// Create the default live set, in display order
    pub fn new() -> Self {
        Self {
            adapters: vec![
                Box::new(BinanceAdapter::new()),
                Box::new(CoinbaseAdapter::new()),
                Box::new(CoinGeckoAdapter::new()),
                Box::new(CryptoCompareAdapter::new()),
                Box::new(BitstampAdapter::new()),
            ],
        }
    }

    /// Create a registry from an explicit adapter list (for testing)
    pub fn with_adapters(adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// Get all registered adapters
    pub fn adapters(&self) -> &[Box<dyn SourceAdapter>] {
        &self.adapters
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) fn fixture(name: &str) -> Vec<u8> {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(path).unwrap()
}
