//! CLI command handling

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{Settings, DEFAULT_AMOUNT, DEFAULT_REFRESH_INTERVAL};
use crate::logging::{self, LogTarget};
use crate::services::aggregator::DEFAULT_QUORUM;
use crate::services::fetcher::DEFAULT_TIMEOUT;
use crate::services::history::DEFAULT_CAPACITY;
use crate::services::tracker::DEFAULT_ESCALATE_AFTER;
use crate::services::{convert, format_usd, select_best, PriceService, SourceOutcome};
use crate::tui::widgets::tabs::Tab;
use crate::tui::TuiConfig;
use crate::types::{PriceSnapshot, RoundOutcome, SourceId};

/// Compare live BTC prices across exchanges
#[derive(Parser)]
#[command(name = "pricewatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Launch the TUI on the price history tab
    History,

    /// Fetch prices once and print the best deal
    Quote {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the live price sources
    Sources {
        /// Query every source once and report its status
        #[arg(long)]
        check: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct GlobalOptions {
    /// Per-source request timeout in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Minimum number of sources that must answer for live prices
    #[arg(long, global = true, default_value_t = DEFAULT_QUORUM)]
    quorum: usize,

    /// Number of rounds kept in the history chart
    #[arg(long, global = true, default_value_t = DEFAULT_CAPACITY)]
    history: usize,

    /// Seconds between automatic refreshes
    #[arg(long, global = true, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
    interval_secs: u64,

    /// Simulated rounds in a row before warning about an outage (0 disables)
    #[arg(long, global = true, default_value_t = DEFAULT_ESCALATE_AFTER)]
    escalate_after: u32,

    /// USD amount to convert
    #[arg(long, global = true, default_value_t = DEFAULT_AMOUNT)]
    amount: f64,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

impl GlobalOptions {
    fn settings(&self) -> Settings {
        Settings {
            timeout: Duration::from_millis(self.timeout_ms),
            quorum: self.quorum,
            history_capacity: self.history,
            refresh_interval: Duration::from_secs(self.interval_secs),
            escalate_after: self.escalate_after,
            amount: self.amount,
        }
    }

    /// Log destination: the TUI discards logs unless a file is given
    fn log_target(&self, interactive: bool) -> LogTarget {
        match (&self.log_file, interactive) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, true) => LogTarget::Discard,
            (None, false) => LogTarget::Stderr,
        }
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let settings = self.options.settings();
        settings.validate()?;

        let interactive = matches!(
            self.command,
            None | Some(Commands::Tui) | Some(Commands::History)
        );
        logging::init(&self.options.log_target(interactive))?;

        match self.command {
            None | Some(Commands::Tui) => crate::tui::run(TuiConfig::default(), settings),
            Some(Commands::History) => crate::tui::run(
                TuiConfig {
                    initial_tab: Tab::History,
                },
                settings,
            ),
            Some(Commands::Quote { json }) => run_quote(&settings, json),
            Some(Commands::Sources { check, json }) => run_sources(&settings, check, json),
        }
    }
}

/// One-shot commands run the round on a single-threaded runtime
fn current_thread_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Result of a one-shot quote
#[derive(Debug, Serialize)]
struct QuoteReport {
    timestamp: DateTime<Utc>,
    synthetic: bool,
    prices: PriceSnapshot,
    best_exchange: Option<SourceId>,
    amount_usd: f64,
    btc_amount: String,
}

impl QuoteReport {
    fn new(outcome: RoundOutcome, amount_usd: f64, timestamp: DateTime<Utc>) -> Self {
        let best_exchange = select_best(&outcome.snapshot).ok();
        let best_price = best_exchange.and_then(|s| outcome.snapshot.get(s));
        Self {
            timestamp,
            synthetic: outcome.is_synthetic,
            btc_amount: convert(amount_usd, best_price),
            prices: outcome.snapshot,
            best_exchange,
            amount_usd,
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        let label = if self.synthetic {
            "simulated data"
        } else {
            "live"
        };
        out.push_str(&format!("Current Bitcoin prices ({})\n", label));

        for quote in self.prices.iter() {
            let marker = if Some(quote.source()) == self.best_exchange {
                "  <- best"
            } else {
                ""
            };
            out.push_str(&format!(
                "  {:<14} {:>14}{}\n",
                quote.source().name(),
                format_usd(quote.price()),
                marker
            ));
        }

        match self.best_exchange {
            Some(best) => {
                out.push_str(&format!("Best exchange: {}\n", best));
                out.push_str(&format!(
                    "BTC for {}: {} BTC\n",
                    format_usd(self.amount_usd),
                    self.btc_amount
                ));
            }
            None => out.push_str("Best exchange: N/A\n"),
        }
        out
    }
}

fn run_quote(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let service = PriceService::new(settings)?;
    let outcome = current_thread_runtime()?.block_on(service.run_round());
    let report = QuoteReport::new(outcome, settings.amount, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

/// One row of `pricewatch sources`
#[derive(Debug, Serialize)]
struct SourceStatus {
    source: SourceId,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn source_statuses(
    service: &PriceService,
    outcomes: Option<Vec<SourceOutcome>>,
) -> Vec<SourceStatus> {
    let adapters = service.registry().adapters();
    match outcomes {
        Some(outcomes) => adapters
            .iter()
            .zip(outcomes)
            .map(|(adapter, outcome)| SourceStatus {
                source: adapter.id(),
                url: adapter.url().to_string(),
                price: outcome.result.as_ref().ok().copied(),
                error: outcome.result.err().map(|e| e.to_string()),
            })
            .collect(),
        None => adapters
            .iter()
            .map(|adapter| SourceStatus {
                source: adapter.id(),
                url: adapter.url().to_string(),
                price: None,
                error: None,
            })
            .collect(),
    }
}

fn run_sources(settings: &Settings, check: bool, json: bool) -> anyhow::Result<()> {
    let service = PriceService::new(settings)?;
    let outcomes = if check {
        Some(current_thread_runtime()?.block_on(service.probe()))
    } else {
        None
    };
    let statuses = source_statuses(&service, outcomes);

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    for status in &statuses {
        let detail = match (&status.price, &status.error) {
            (Some(price), _) => format_usd(*price),
            (None, Some(error)) => format!("failed: {}", error),
            (None, None) => String::new(),
        };
        println!("{:<14} {}  {}", status.source.name(), status.url, detail);
    }
    Ok(())
}
