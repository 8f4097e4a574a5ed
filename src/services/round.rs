//! Refresh round entry point

use tracing::{info, warn};

use super::aggregator::{QuorumAggregator, SourceOutcome};
use super::fetcher::Fetcher;
use super::synthetic::SyntheticGenerator;
use crate::config::Settings;
use crate::sources::SourceRegistry;
use crate::types::{PricewatchError, Result, RoundOutcome};

/// Runs complete refresh rounds against the live source set.
///
/// Rounds must not overlap. This type does not enforce that; callers go
/// through [`Tracker::begin_round`](super::Tracker::begin_round) first.
pub struct PriceService {
    registry: SourceRegistry,
    aggregator: QuorumAggregator,
    synthetic: SyntheticGenerator,
}

impl PriceService {
    /// Create a service over the default live sources
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_registry(SourceRegistry::new(), settings)
    }

    /// Create a service over a custom source registry.
    ///
    /// Fails when the quorum can never be met by the registered sources.
    pub fn with_registry(registry: SourceRegistry, settings: &Settings) -> Result<Self> {
        let fetcher = Fetcher::new(settings.timeout)?;
        let aggregator = QuorumAggregator::new(fetcher, settings.quorum);
        if aggregator.quorum() > registry.len() {
            return Err(PricewatchError::Config(format!(
                "quorum {} exceeds the {} configured sources",
                aggregator.quorum(),
                registry.len()
            )));
        }

        Ok(Self {
            registry,
            aggregator,
            synthetic: SyntheticGenerator::new(),
        })
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Fetch every source once and return the round's snapshot.
    ///
    /// Falls back to simulated prices when quorum is missed, so the result is
    /// never empty.
    pub async fn run_round(&self) -> RoundOutcome {
        match self.aggregator.aggregate(self.registry.adapters()).await {
            Some(snapshot) => {
                info!(sources = snapshot.len(), "Live prices updated");
                RoundOutcome {
                    snapshot,
                    is_synthetic: false,
                }
            }
            None => {
                warn!("API fetch failed, using simulated data");
                RoundOutcome {
                    snapshot: self.synthetic.generate(),
                    is_synthetic: true,
                }
            }
        }
    }

    /// Per-source outcomes of one pass, without quorum or fallback
    pub async fn probe(&self) -> Vec<SourceOutcome> {
        self.aggregator.collect(self.registry.adapters()).await
    }
}
