//! Core data types for pricewatch

mod error;

pub use error::{PricewatchError, Result, SourceError};

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Exchange or price API identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceId {
    Binance,
    Coinbase,
    CoinGecko,
    CryptoCompare,
    Bitstamp,
    Kraken,
    Gemini,
}

impl SourceId {
    /// Human-readable name, identical to the variant name
    pub fn name(self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::Coinbase => "Coinbase",
            Self::CoinGecko => "CoinGecko",
            Self::CryptoCompare => "CryptoCompare",
            Self::Bitstamp => "Bitstamp",
            Self::Kraken => "Kraken",
            Self::Gemini => "Gemini",
        }
    }

    /// Every known identifier, live and synthetic-only
    pub fn all() -> &'static [SourceId] {
        &[
            Self::Binance,
            Self::Coinbase,
            Self::CoinGecko,
            Self::CryptoCompare,
            Self::Bitstamp,
            Self::Kraken,
            Self::Gemini,
        ]
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated price from one source
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    source: SourceId,
    price: f64,
}

impl PriceQuote {
    /// Build a quote, rejecting non-finite and non-positive prices
    pub fn new(source: SourceId, price: f64) -> Option<Self> {
        (price.is_finite() && price > 0.0).then_some(Self { source, price })
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Prices collected in one round, keyed by source.
///
/// Iteration follows insertion order, so the configured source order is
/// preserved and tie-breaking stays deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSnapshot {
    quotes: Vec<PriceQuote>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quote; an existing entry for the same source is replaced in place
    pub fn insert(&mut self, quote: PriceQuote) {
        match self.quotes.iter_mut().find(|q| q.source == quote.source) {
            Some(existing) => existing.price = quote.price,
            None => self.quotes.push(quote),
        }
    }

    pub fn get(&self, source: SourceId) -> Option<f64> {
        self.quotes
            .iter()
            .find(|q| q.source == source)
            .map(|q| q.price)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceQuote> {
        self.quotes.iter()
    }

    pub fn sources(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.quotes.iter().map(|q| q.source)
    }
}

impl FromIterator<PriceQuote> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = PriceQuote>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for quote in iter {
            snapshot.insert(quote);
        }
        snapshot
    }
}

// Serialized as {"Binance": 60000.0, ...} in insertion order
impl Serialize for PriceSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.quotes.len()))?;
        for quote in &self.quotes {
            map.serialize_entry(quote.source.name(), &quote.price)?;
        }
        map.end()
    }
}

/// One entry of the price history window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub prices: PriceSnapshot,
}

/// Result of one refresh round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub snapshot: PriceSnapshot,
    /// True when the snapshot came from the fallback generator
    pub is_synthetic: bool,
}
