//! Controller state shared by the refresh triggers
//!
//! Holds everything that outlives a single round: the history window, the
//! last outcome, counters and the in-flight guard. The core services stay
//! stateless; this is the only writer of the history buffer.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::history::HistoryBuffer;
use super::quote::select_best;
use crate::types::{RoundOutcome, SourceId};

/// Consecutive synthetic rounds before the outage is surfaced
pub const DEFAULT_ESCALATE_AFTER: u32 = 3;

#[derive(Debug, Clone)]
pub struct Tracker {
    history: HistoryBuffer,
    latest: Option<RoundOutcome>,
    best: Option<SourceId>,
    last_updated: Option<DateTime<Local>>,
    attempts: u64,
    live_rounds: u64,
    consecutive_synthetic: u32,
    escalate_after: u32,
    in_flight: bool,
}

impl Tracker {
    pub fn new(history_capacity: usize, escalate_after: u32) -> Self {
        Self {
            history: HistoryBuffer::new(history_capacity),
            latest: None,
            best: None,
            last_updated: None,
            attempts: 0,
            live_rounds: 0,
            consecutive_synthetic: 0,
            escalate_after,
            in_flight: false,
        }
    }

    /// Claim the in-flight slot.
    ///
    /// Returns `false` when a round is already running; the caller must not
    /// start another one.
    pub fn begin_round(&mut self) -> bool {
        if self.in_flight {
            debug!("Refresh skipped, round already in flight");
            return false;
        }
        self.in_flight = true;
        self.attempts += 1;
        true
    }

    /// Record a finished round and release the in-flight slot
    pub fn complete_round(&mut self, outcome: RoundOutcome) {
        self.in_flight = false;

        if outcome.is_synthetic {
            self.consecutive_synthetic = self.consecutive_synthetic.saturating_add(1);
            if self.is_escalated() {
                warn!(
                    rounds = self.consecutive_synthetic,
                    "Live sources unavailable, still showing simulated prices"
                );
            }
        } else {
            self.live_rounds += 1;
            self.consecutive_synthetic = 0;
        }

        // An empty snapshot means no best exchange this round, not an error
        self.best = select_best(&outcome.snapshot).ok();
        self.history.append(outcome.snapshot.clone());
        self.last_updated = Some(Local::now());
        self.latest = Some(outcome);
    }

    /// Release the in-flight slot when a round ended without an outcome
    pub fn abort_round(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn latest(&self) -> Option<&RoundOutcome> {
        self.latest.as_ref()
    }

    pub fn best(&self) -> Option<SourceId> {
        self.best
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn live_rounds(&self) -> u64 {
        self.live_rounds
    }

    pub fn consecutive_synthetic(&self) -> u32 {
        self.consecutive_synthetic
    }

    /// Whether repeated fallbacks should be shown as an outage
    pub fn is_escalated(&self) -> bool {
        self.escalate_after > 0 && self.consecutive_synthetic >= self.escalate_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceQuote, PriceSnapshot};

    fn outcome(entries: &[(SourceId, f64)], is_synthetic: bool) -> RoundOutcome {
        RoundOutcome {
            snapshot: entries
                .iter()
                .filter_map(|&(s, p)| PriceQuote::new(s, p))
                .collect(),
            is_synthetic,
        }
    }

    #[test]
    fn test_begin_round_guards_overlap() {
        let mut tracker = Tracker::new(20, 3);
        assert!(tracker.begin_round());
        assert!(tracker.is_in_flight());
        assert!(!tracker.begin_round());
        assert_eq!(tracker.attempts(), 1);

        tracker.complete_round(outcome(&[(SourceId::Binance, 1.0)], false));
        assert!(!tracker.is_in_flight());
        assert!(tracker.begin_round());
        assert_eq!(tracker.attempts(), 2);
    }

    #[test]
    fn test_complete_round_updates_state() {
        let mut tracker = Tracker::new(20, 3);
        tracker.begin_round();
        tracker.complete_round(outcome(
            &[
                (SourceId::Binance, 60000.0),
                (SourceId::Coinbase, 59500.0),
                (SourceId::CoinGecko, 60200.0),
            ],
            false,
        ));

        assert_eq!(tracker.best(), Some(SourceId::Coinbase));
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(tracker.live_rounds(), 1);
        assert!(tracker.last_updated().is_some());
        assert!(!tracker.latest().unwrap().is_synthetic);
    }

    #[test]
    fn test_empty_snapshot_has_no_best() {
        let mut tracker = Tracker::new(20, 3);
        tracker.begin_round();
        tracker.complete_round(RoundOutcome {
            snapshot: PriceSnapshot::new(),
            is_synthetic: false,
        });
        assert_eq!(tracker.best(), None);
    }

    #[test]
    fn test_escalation_after_consecutive_synthetic_rounds() {
        let mut tracker = Tracker::new(20, 3);
        for _ in 0..2 {
            tracker.begin_round();
            tracker.complete_round(outcome(&[(SourceId::Kraken, 1.0)], true));
        }
        assert!(!tracker.is_escalated());

        tracker.begin_round();
        tracker.complete_round(outcome(&[(SourceId::Kraken, 1.0)], true));
        assert!(tracker.is_escalated());
        assert_eq!(tracker.consecutive_synthetic(), 3);

        // A single live round clears the outage
        tracker.begin_round();
        tracker.complete_round(outcome(&[(SourceId::Binance, 1.0)], false));
        assert!(!tracker.is_escalated());
        assert_eq!(tracker.consecutive_synthetic(), 0);
    }

    #[test]
    fn test_escalation_disabled_with_zero_threshold() {
        let mut tracker = Tracker::new(20, 0);
        for _ in 0..5 {
            tracker.begin_round();
            tracker.complete_round(outcome(&[(SourceId::Kraken, 1.0)], true));
        }
        assert!(!tracker.is_escalated());
    }

    #[test]
    fn test_abort_round_releases_guard() {
        let mut tracker = Tracker::new(20, 3);
        tracker.begin_round();
        tracker.abort_round();
        assert!(!tracker.is_in_flight());
        assert!(tracker.latest().is_none());
    }

    #[test]
    fn test_history_respects_capacity() {
        let mut tracker = Tracker::new(2, 3);
        for i in 0..4 {
            tracker.begin_round();
            tracker.complete_round(outcome(&[(SourceId::Binance, 100.0 + i as f64)], false));
        }
        assert_eq!(tracker.history().len(), 2);
        assert_eq!(
            tracker.history().first().unwrap().prices.get(SourceId::Binance),
            Some(102.0)
        );
    }
}
