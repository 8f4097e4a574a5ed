//! Simulated prices used when a round misses quorum
//!
//! The values are placeholders for display only and carry no relation to the
//! market. Callers must label them as simulated.

use rand::Rng;

use crate::types::{PriceQuote, PriceSnapshot, SourceId};

/// Band the base price is drawn from
const BASE_MIN: f64 = 60_000.0;
const BASE_SPAN: f64 = 5_000.0;

/// Direction and maximum relative offset of a source from the base price
#[derive(Debug, Clone, Copy)]
struct Spread {
    discount: bool,
    max: f64,
}

impl Spread {
    const fn below(max: f64) -> Self {
        Self {
            discount: true,
            max,
        }
    }

    const fn above(max: f64) -> Self {
        Self {
            discount: false,
            max,
        }
    }

    fn apply(self, base: f64, r: f64) -> f64 {
        if self.discount {
            base * (1.0 - r * self.max)
        } else {
            base * (1.0 + r * self.max)
        }
    }
}

const PROFILES: &[(SourceId, Spread)] = &[
    (SourceId::Binance, Spread::below(0.02)),
    (SourceId::Coinbase, Spread::above(0.03)),
    (SourceId::Kraken, Spread::above(0.01)),
    (SourceId::Gemini, Spread::above(0.015)),
    (SourceId::Bitstamp, Spread::below(0.01)),
];

/// Generator for synthetic snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a snapshot using the thread-local RNG
    pub fn generate(&self) -> PriceSnapshot {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a snapshot from the given RNG
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> PriceSnapshot {
        let base = BASE_MIN + rng.gen::<f64>() * BASE_SPAN;

        PROFILES
            .iter()
            .filter_map(|&(source, spread)| {
                PriceQuote::new(source, spread.apply(base, rng.gen::<f64>()))
            })
            .collect()
    }

    /// Sources every synthetic snapshot covers
    pub fn sources(&self) -> impl Iterator<Item = SourceId> {
        PROFILES.iter().map(|(source, _)| *source)
    }
}
