//! Bounded price history window

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::types::{HistoryPoint, PriceSnapshot, SourceId};

/// Number of points kept for the trend chart
pub const DEFAULT_CAPACITY: usize = 20;

/// Append-only sliding window of snapshots, oldest first
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a snapshot stamped with the current time
    pub fn append(&mut self, snapshot: PriceSnapshot) {
        self.append_at(snapshot, Utc::now());
    }

    /// Append a snapshot stamped with `timestamp`, evicting the oldest points
    /// once the window is over capacity.
    ///
    /// A timestamp earlier than the newest point is clamped to it, so the
    /// sequence never goes backwards.
    pub fn append_at(&mut self, snapshot: PriceSnapshot, timestamp: DateTime<Utc>) {
        let timestamp = match self.points.back() {
            Some(last) if timestamp < last.timestamp => last.timestamp,
            _ => timestamp,
        };

        self.points.push_back(HistoryPoint {
            timestamp,
            prices: snapshot,
        });

        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<&HistoryPoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    /// Price series of one source; points where it was missing are skipped
    pub fn series(&self, source: SourceId) -> Vec<(DateTime<Utc>, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.prices.get(source).map(|price| (p.timestamp, price)))
            .collect()
    }

    /// Sources that appear anywhere in the window, in first-seen order
    pub fn sources(&self) -> Vec<SourceId> {
        let mut seen = Vec::new();
        for point in &self.points {
            for source in point.prices.sources() {
                if !seen.contains(&source) {
                    seen.push(source);
                }
            }
        }
        seen
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
