//! Price history line chart

use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use super::source_color;
use crate::services::HistoryBuffer;
use crate::types::SourceId;

/// Points needed before a line can be drawn
const MIN_POINTS: usize = 2;

/// Chart series for one source: x is seconds since the first point
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub source: SourceId,
    pub points: Vec<(f64, f64)>,
}

/// Convert the history window into chart series, one per source
pub fn build_series(history: &HistoryBuffer) -> Vec<Series> {
    let Some(origin) = history.first().map(|p| p.timestamp) else {
        return Vec::new();
    };

    history
        .sources()
        .into_iter()
        .map(|source| Series {
            source,
            points: history
                .series(source)
                .into_iter()
                .map(|(ts, price)| (seconds_between(origin, ts), price))
                .collect(),
        })
        .collect()
}

fn seconds_between(origin: DateTime<Utc>, ts: DateTime<Utc>) -> f64 {
    (ts - origin).num_milliseconds() as f64 / 1000.0
}

/// Y-axis bounds covering every price, padded so flat lines stay visible
pub fn price_bounds(series: &[Series]) -> Option<[f64; 2]> {
    let prices = series.iter().flat_map(|s| s.points.iter().map(|(_, y)| *y));
    let (min, max) = prices.fold(None, |acc: Option<(f64, f64)>, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })?;

    let pad = ((max - min) * 0.1).max(max * 0.0005).max(1.0);
    Some([min - pad, max + pad])
}

/// Axis label in thousands, e.g. 61234.0 -> "$61k"
pub fn format_thousands(price: f64) -> String {
    format!("${}k", (price / 1000.0).round() as i64)
}

pub struct HistoryChart<'a> {
    history: &'a HistoryBuffer,
}

impl<'a> HistoryChart<'a> {
    pub fn new(history: &'a HistoryBuffer) -> Self {
        Self { history }
    }
}

impl Widget for HistoryChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(
                " BTC Price History ({}/{}) ",
                self.history.len(),
                self.history.capacity()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        if self.history.len() < MIN_POINTS {
            let message = format!(
                "Collecting history... ({}/{} points)",
                self.history.len(),
                MIN_POINTS
            );
            Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
                .block(block)
                .render(area, buf);
            return;
        }

        let series = build_series(self.history);
        let Some(y_bounds) = price_bounds(&series) else {
            return;
        };
        let x_max = series
            .iter()
            .flat_map(|s| s.points.last().map(|(x, _)| *x))
            .fold(0.0_f64, f64::max)
            .max(1.0);

        let datasets: Vec<Dataset> = series
            .iter()
            .map(|s| {
                Dataset::default()
                    .name(s.source.name())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(source_color(s.source)))
                    .data(&s.points)
            })
            .collect();

        let time_label = |ts: Option<DateTime<Utc>>| {
            ts.map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                .unwrap_or_default()
        };
        let x_labels = vec![
            time_label(self.history.first().map(|p| p.timestamp)),
            time_label(self.history.last().map(|p| p.timestamp)),
        ];
        let y_labels = vec![
            format_thousands(y_bounds[0]),
            format_thousands((y_bounds[0] + y_bounds[1]) / 2.0),
            format_thousands(y_bounds[1]),
        ];

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(y_bounds)
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}
