//! Coinbase spot price adapter

use serde::Deserialize;

use super::{json_error, parse_decimal, SourceAdapter};
use crate::types::{SourceError, SourceId};

const DEFAULT_URL: &str = "https://api.coinbase.com/v2/prices/BTC-USD/spot";

#[derive(Deserialize)]
struct CoinbaseResponse<'a> {
    #[serde(borrow)]
    data: CoinbaseSpot<'a>,
}

#[derive(Deserialize)]
struct CoinbaseSpot<'a> {
    amount: &'a str,
}

/// Adapter for the Coinbase `prices/BTC-USD/spot` endpoint (`data.amount`)
pub struct CoinbaseAdapter {
    url: String,
}

impl CoinbaseAdapter {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for CoinbaseAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for CoinbaseAdapter {
    fn id(&self) -> SourceId {
        SourceId::Coinbase
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn parse(&self, body: &mut [u8]) -> Result<f64, SourceError> {
        let response: CoinbaseResponse = simd_json::from_slice(body).map_err(json_error)?;
        parse_decimal(response.data.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::fixture;

    #[test]
    fn test_parse_fixture() {
        let mut body = fixture("coinbase.json");
        assert_eq!(CoinbaseAdapter::new().parse(&mut body), Ok(60150.12));
    }

    #[test]
    fn test_amount_must_be_nested() {
        let mut body = br#"{"amount":"60150.12"}"#.to_vec();
        assert!(CoinbaseAdapter::new().parse(&mut body).is_err());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut body = br#"{"data":{"amount":"0.00","base":"BTC","currency":"USD"}}"#.to_vec();
        assert!(matches!(
            CoinbaseAdapter::new().parse(&mut body),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn test_not_json() {
        let mut body = b"<html>502 Bad Gateway</html>".to_vec();
        assert!(CoinbaseAdapter::new().parse(&mut body).is_err());
    }
}
