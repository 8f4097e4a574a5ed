//! Services for fetching, reconciling and tracking prices

pub mod aggregator;
pub mod fetcher;
pub mod history;
pub mod quote;
pub mod round;
pub mod synthetic;
pub mod tracker;

pub use aggregator::{QuorumAggregator, SourceOutcome};
pub use fetcher::Fetcher;
pub use history::HistoryBuffer;
pub use quote::{convert, format_usd, select_best};
pub use round::PriceService;
pub use synthetic::SyntheticGenerator;
pub use tracker::Tracker;
