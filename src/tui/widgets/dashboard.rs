//! Dashboard layout widget

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::history_chart::HistoryChart;
use super::price_table::PriceTable;
use super::tabs::{Tab, TabBar};
use crate::services::Tracker;

/// Data for the dashboard display
pub struct DashboardData<'a> {
    pub tracker: &'a Tracker,
    /// Raw text of the USD amount field
    pub amount_input: &'a str,
    pub amount: f64,
    pub tab: Tab,
    /// Spinner character while a round is in flight
    pub refreshing: Option<char>,
    pub next_refresh_secs: u64,
}

/// Dashboard widget combining all elements
pub struct Dashboard<'a> {
    data: &'a DashboardData<'a>,
}

impl<'a> Dashboard<'a> {
    pub fn new(data: &'a DashboardData<'a>) -> Self {
        Self { data }
    }

    /// "Last updated" line, flagged when the prices are simulated
    pub fn status_text(&self) -> String {
        let tracker = self.data.tracker;
        let mut text = match tracker.last_updated() {
            Some(at) => format!("Last updated: {}", at.format("%H:%M:%S")),
            None => "Waiting for first update".to_string(),
        };
        if tracker.latest().is_some_and(|o| o.is_synthetic) {
            text.push_str(" (Using simulated data)");
        }
        if let Some(ch) = self.data.refreshing {
            text.push_str(&format!("  {} Refreshing...", ch));
        }
        text
    }

    /// Outage warning once simulated rounds have piled up
    pub fn banner_text(&self) -> Option<String> {
        let tracker = self.data.tracker;
        tracker.is_escalated().then(|| {
            format!(
                "⚠ Live sources unavailable for {} consecutive rounds",
                tracker.consecutive_synthetic()
            )
        })
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Main layout: header, tabs, body, footer
        let chunks = Layout::vertical([
            Constraint::Length(4), // Header
            Constraint::Length(1), // Tab bar
            Constraint::Min(8),    // Body
            Constraint::Length(2), // Footer
        ])
        .split(area);

        self.render_header(chunks[0], buf);
        TabBar::new(self.data.tab).render(chunks[1], buf);
        self.render_body(chunks[2], buf);
        self.render_footer(chunks[3], buf);
    }
}

impl Dashboard<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let synthetic = self
            .data
            .tracker
            .latest()
            .is_some_and(|o| o.is_synthetic);
        let status_color = if synthetic {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let mut lines = vec![
            Line::from(Span::styled(
                "pricewatch - Bitcoin Price Tracker",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw("USD Amount: "),
                Span::styled(
                    format!("{}▏", self.data.amount_input),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(Span::styled(
                self.status_text(),
                Style::default().fg(status_color),
            )),
        ];

        if let Some(banner) = self.banner_text() {
            lines.push(Line::from(Span::styled(
                banner,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }

        Paragraph::new(lines).render(area, buf);
    }

    fn render_body(&self, area: Rect, buf: &mut Buffer) {
        let tracker = self.data.tracker;
        match self.data.tab {
            Tab::Prices => {
                if let Some(outcome) = tracker.latest() {
                    PriceTable::new(&outcome.snapshot, tracker.best(), self.data.amount)
                        .render(area, buf);
                }
            }
            Tab::History => HistoryChart::new(tracker.history()).render(area, buf),
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let tracker = self.data.tracker;
        let rounds = format!(
            "Live rounds: {}/{}",
            tracker.live_rounds(),
            tracker.attempts()
        );
        let next = format!("Next refresh in {}s", self.data.next_refresh_secs);

        let footer = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(rounds, Style::default().fg(Color::Green)),
                Span::raw(" | "),
                Span::styled(next, Style::default().fg(Color::Yellow)),
            ]),
            Line::from(Span::styled(
                "r refresh | ←/→ switch tab | 0-9 edit amount | q quit",
                Style::default().fg(Color::DarkGray),
            )),
        ]);

        footer.render(area, buf);
    }
}
