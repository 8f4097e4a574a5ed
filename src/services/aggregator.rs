//! Quorum aggregation of per-source quotes

use futures::future::join_all;
use tracing::{info, warn};

use super::fetcher::Fetcher;
use crate::sources::SourceAdapter;
use crate::types::{PriceQuote, PriceSnapshot, SourceError, SourceId};

/// Minimum number of live sources for a round to count, in the reference setup
pub const DEFAULT_QUORUM: usize = 2;

/// Settled result of one source within a round
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub source: SourceId,
    pub result: Result<f64, SourceError>,
}

impl SourceOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetches every source concurrently and applies the quorum rule
pub struct QuorumAggregator {
    fetcher: Fetcher,
    quorum: usize,
}

impl QuorumAggregator {
    pub fn new(fetcher: Fetcher, quorum: usize) -> Self {
        Self { fetcher, quorum }
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Run every source and wait for all of them to settle.
    ///
    /// Outcomes are returned in the order of `sources`. A failing source
    /// never cancels its siblings.
    pub async fn collect(&self, sources: &[Box<dyn SourceAdapter>]) -> Vec<SourceOutcome> {
        join_all(sources.iter().map(|adapter| self.attempt(adapter.as_ref()))).await
    }

    /// Fetch all sources and build a snapshot if enough of them succeeded.
    ///
    /// Returns `None` when fewer than `quorum` sources produced a valid price.
    pub async fn aggregate(&self, sources: &[Box<dyn SourceAdapter>]) -> Option<PriceSnapshot> {
        let outcomes = self.collect(sources).await;
        reconcile(&outcomes, self.quorum)
    }

    async fn attempt(&self, adapter: &dyn SourceAdapter) -> SourceOutcome {
        let result = match self.fetcher.fetch(adapter.url()).await {
            Ok(mut body) => adapter.parse(&mut body),
            Err(e) => Err(e),
        };

        if let Err(ref e) = result {
            warn!(source = %adapter.id(), error = %e, "Failed to fetch price");
        }

        SourceOutcome {
            source: adapter.id(),
            result,
        }
    }
}

/// Apply the quorum rule to settled outcomes
pub fn reconcile(outcomes: &[SourceOutcome], quorum: usize) -> Option<PriceSnapshot> {
    let snapshot: PriceSnapshot = outcomes
        .iter()
        .filter_map(|o| {
            o.result
                .as_ref()
                .ok()
                .and_then(|&price| PriceQuote::new(o.source, price))
        })
        .collect();

    if snapshot.len() >= quorum && !snapshot.is_empty() {
        info!(
            succeeded = snapshot.len(),
            attempted = outcomes.len(),
            "Quorum reached"
        );
        Some(snapshot)
    } else {
        warn!(
            succeeded = snapshot.len(),
            attempted = outcomes.len(),
            quorum,
            "Quorum not reached"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fetcher::DEFAULT_TIMEOUT;
    use crate::sources::{BinanceAdapter, BitstampAdapter, CoinGeckoAdapter, CoinbaseAdapter};
    use std::time::Duration;
    use wiremock::matchers::path;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok(source: SourceId, price: f64) -> SourceOutcome {
        SourceOutcome {
            source,
            result: Ok(price),
        }
    }

    fn failed(source: SourceId) -> SourceOutcome {
        SourceOutcome {
            source,
            result: Err(SourceError::Network("connection refused".into())),
        }
    }

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    // ========== reconcile tests ==========

    #[test]
    fn test_reconcile_below_quorum() {
        let outcomes = vec![ok(SourceId::Binance, 60000.0), failed(SourceId::Coinbase)];
        assert!(reconcile(&outcomes, 2).is_none());
    }

    #[test]
    fn test_reconcile_at_quorum_keeps_only_successes() {
        let outcomes = vec![
            ok(SourceId::Binance, 60000.0),
            failed(SourceId::Coinbase),
            ok(SourceId::Bitstamp, 60100.0),
        ];

        let snapshot = reconcile(&outcomes, 2).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(SourceId::Binance), Some(60000.0));
        assert_eq!(snapshot.get(SourceId::Bitstamp), Some(60100.0));
        assert_eq!(snapshot.get(SourceId::Coinbase), None);
    }

    #[test]
    fn test_reconcile_zero_quorum_still_needs_one_price() {
        let outcomes = vec![failed(SourceId::Binance)];
        assert!(reconcile(&outcomes, 0).is_none());
    }

    #[test]
    fn test_reconcile_all_failed() {
        let outcomes: Vec<SourceOutcome> = SourceId::all().iter().map(|&s| failed(s)).collect();
        assert!(reconcile(&outcomes, 2).is_none());
    }

    // ========== end-to-end tests against a mock server ==========

    #[tokio::test]
    async fn test_parse_error_does_not_affect_siblings() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/binance",
            ResponseTemplate::new(200).set_body_string(r#"{"price":"60000.5"}"#),
        )
        .await;
        mount(
            &server,
            "/coinbase",
            ResponseTemplate::new(200).set_body_string(r#"{"unexpected":true}"#),
        )
        .await;
        mount(
            &server,
            "/bitstamp",
            ResponseTemplate::new(200).set_body_string(r#"{"last":"60010"}"#),
        )
        .await;

        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(BinanceAdapter::with_url(format!("{}/binance", server.uri()))),
            Box::new(CoinbaseAdapter::with_url(format!("{}/coinbase", server.uri()))),
            Box::new(BitstampAdapter::with_url(format!("{}/bitstamp", server.uri()))),
        ];

        let aggregator = QuorumAggregator::new(Fetcher::new(DEFAULT_TIMEOUT).unwrap(), 2);
        let outcomes = aggregator.collect(&sources).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(matches!(outcomes[1].result, Err(SourceError::Parse(_))));
        assert!(outcomes[2].is_ok());

        let snapshot = reconcile(&outcomes, aggregator.quorum()).unwrap();
        assert_eq!(snapshot.get(SourceId::Binance), Some(60000.5));
        assert_eq!(snapshot.get(SourceId::Bitstamp), Some(60010.0));
        assert!(snapshot.iter().all(|q| q.price() > 0.0));
    }

    #[tokio::test]
    async fn test_slow_source_times_out_without_blocking_round() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/binance",
            ResponseTemplate::new(200).set_body_string(r#"{"price":"60000"}"#),
        )
        .await;
        mount(
            &server,
            "/coingecko",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"bitcoin":{"usd":60050}}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .await;

        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(BinanceAdapter::with_url(format!("{}/binance", server.uri()))),
            Box::new(CoinGeckoAdapter::with_url(format!("{}/coingecko", server.uri()))),
        ];

        let aggregator = QuorumAggregator::new(Fetcher::new(Duration::from_millis(200)).unwrap(), 2);
        let outcomes = aggregator.collect(&sources).await;

        assert!(outcomes[0].is_ok());
        assert_eq!(
            outcomes[1].result,
            Err(SourceError::Timeout { after_ms: 200 })
        );
        assert!(reconcile(&outcomes, 2).is_none());
        assert!(reconcile(&outcomes, 1).is_some());
    }

    #[tokio::test]
    async fn test_aggregate_returns_none_when_all_fail() {
        let server = MockServer::start().await;
        mount(&server, "/binance", ResponseTemplate::new(503)).await;
        mount(&server, "/coinbase", ResponseTemplate::new(404)).await;

        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(BinanceAdapter::with_url(format!("{}/binance", server.uri()))),
            Box::new(CoinbaseAdapter::with_url(format!("{}/coinbase", server.uri()))),
        ];

        let aggregator = QuorumAggregator::new(Fetcher::new(DEFAULT_TIMEOUT).unwrap(), 2);
        assert!(aggregator.aggregate(&sources).await.is_none());
    }
}
