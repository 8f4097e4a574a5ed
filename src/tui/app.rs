//! Application state and event loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::services::{PriceService, Tracker};
use crate::types::RoundOutcome;

use super::widgets::{
    dashboard::{Dashboard, DashboardData},
    spinner::Spinner,
    tabs::Tab,
};

/// Longest amount the input field accepts
const MAX_AMOUNT_LEN: usize = 12;

/// Startup options for the TUI
#[derive(Debug, Clone, Copy, Default)]
pub struct TuiConfig {
    pub initial_tab: Tab,
}

/// Main application
pub struct App {
    settings: Settings,
    service: Arc<PriceService>,
    runtime: Handle,
    tracker: Tracker,
    /// Result of the round currently in flight
    pending: Option<oneshot::Receiver<RoundOutcome>>,
    next_refresh: Instant,
    amount_input: String,
    tab: Tab,
    spinner_frame: usize,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: TuiConfig,
        settings: Settings,
        service: Arc<PriceService>,
        runtime: Handle,
    ) -> Self {
        Self {
            tracker: Tracker::new(settings.history_capacity, settings.escalate_after),
            next_refresh: Instant::now() + settings.refresh_interval,
            amount_input: settings.amount.to_string(),
            settings,
            service,
            runtime,
            pending: None,
            tab: config.initial_tab,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Start a refresh round in the background.
    ///
    /// Returns `false` if a round is already in flight.
    pub fn refresh(&mut self) -> bool {
        if !self.tracker.begin_round() {
            return false;
        }

        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        self.runtime.spawn(async move {
            let outcome = service.run_round().await;
            // Receiver is gone once the app has quit
            if tx.send(outcome).is_err() {
                debug!("Round finished after shutdown");
            }
        });
        self.pending = Some(rx);
        true
    }

    /// Pick up the in-flight round's result if it has arrived
    pub fn poll_round(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                self.tracker.complete_round(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.pending = None;
                self.tracker.abort_round();
                warn!("Refresh round ended without a result");
            }
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        self.refresh();
                    }
                    KeyCode::Tab | KeyCode::Right => {
                        self.tab = self.tab.next();
                    }
                    KeyCode::BackTab | KeyCode::Left => {
                        self.tab = self.tab.prev();
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                        self.push_amount_char(c);
                    }
                    KeyCode::Backspace => {
                        self.amount_input.pop();
                    }
                    _ => {}
                }
            }
        }
    }

    fn push_amount_char(&mut self, c: char) {
        if self.amount_input.len() >= MAX_AMOUNT_LEN {
            return;
        }
        if c == '.' && self.amount_input.contains('.') {
            return;
        }
        self.amount_input.push(c);
    }

    /// Advance the spinner, collect finished rounds and run the periodic refresh
    pub fn tick(&mut self) {
        self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        self.poll_round();

        let now = Instant::now();
        if now >= self.next_refresh {
            self.next_refresh = now + self.settings.refresh_interval;
            self.refresh();
        }
    }

    /// USD amount typed by the user; unparseable input counts as zero
    pub fn amount(&self) -> f64 {
        self.amount_input
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a >= 0.0)
            .unwrap_or(0.0)
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.tracker.latest().is_none() {
            let message = format!(
                "Fetching prices from {} sources...",
                self.service.registry().len()
            );
            let names: Vec<&str> = self
                .service
                .registry()
                .adapters()
                .iter()
                .map(|a| a.id().name())
                .collect();
            let detail = names.join(", ");
            Spinner::new(self.spinner_frame, &message)
                .detail(&detail)
                .render(area, buf);
            return;
        }

        let data = DashboardData {
            tracker: &self.tracker,
            amount_input: &self.amount_input,
            amount: self.amount(),
            tab: self.tab,
            refreshing: self
                .tracker
                .is_in_flight()
                .then(|| Spinner::char_at(self.spinner_frame)),
            next_refresh_secs: self
                .next_refresh
                .saturating_duration_since(Instant::now())
                .as_secs(),
        };
        Dashboard::new(&data).render(area, buf);
    }
}

/// Run the TUI application
pub fn run(config: TuiConfig, settings: Settings) -> anyhow::Result<()> {
    // Rounds run here while the UI thread blocks on terminal input
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let service = Arc::new(PriceService::new(&settings)?);

    let mut app = App::new(config, settings, service, runtime.handle().clone());
    app.refresh();

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();

    // Drop any round still in flight
    runtime.shutdown_background();
    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
        app.tick();
    }

    Ok(())
}
