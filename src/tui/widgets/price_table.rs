//! Current prices with the best deal highlighted

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::source_color;
use crate::services::{convert, format_usd};
use crate::types::{PriceSnapshot, SourceId};

const NAME_WIDTH: usize = 16;
const PRICE_WIDTH: usize = 14;

pub struct PriceTable<'a> {
    snapshot: &'a PriceSnapshot,
    best: Option<SourceId>,
    amount: f64,
}

impl<'a> PriceTable<'a> {
    pub fn new(snapshot: &'a PriceSnapshot, best: Option<SourceId>, amount: f64) -> Self {
        Self {
            snapshot,
            best,
            amount,
        }
    }

    fn price_line(&self, source: SourceId, price: f64) -> Line<'static> {
        let is_best = Some(source) == self.best;
        let price_style = if is_best {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut spans = vec![
            Span::styled(
                format!("  {:<width$}", source.name(), width = NAME_WIDTH),
                Style::default().fg(source_color(source)),
            ),
            Span::styled(
                format!("{:>width$}", format_usd(price), width = PRICE_WIDTH),
                price_style,
            ),
        ];
        if is_best {
            spans.push(Span::styled(" ◀ best", price_style));
        }
        Line::from(spans)
    }

    fn best_deal_lines(&self) -> Vec<Line<'static>> {
        let Some(best) = self.best else {
            return Vec::new();
        };
        let highlight = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);

        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Best Deal",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw(format!("  {:<width$}", "Best Exchange", width = NAME_WIDTH)),
                Span::styled(best.name(), highlight),
            ]),
            Line::from(vec![
                Span::raw(format!(
                    "  {:<width$}",
                    format!("BTC for {}", format_usd(self.amount)),
                    width = NAME_WIDTH
                )),
                Span::styled(
                    format!("{} BTC", convert(self.amount, self.snapshot.get(best))),
                    highlight,
                ),
            ]),
        ]
    }
}

impl Widget for PriceTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(
            "Current Bitcoin Prices",
            Style::default().add_modifier(Modifier::BOLD),
        ))];

        for quote in self.snapshot.iter() {
            lines.push(self.price_line(quote.source(), quote.price()));
        }
        lines.extend(self.best_deal_lines());

        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceQuote;

    fn snapshot(entries: &[(SourceId, f64)]) -> PriceSnapshot {
        entries
            .iter()
            .filter_map(|&(s, p)| PriceQuote::new(s, p))
            .collect()
    }

    fn render_rows(table: PriceTable, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        table.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_render_prices_and_best_deal() {
        let snap = snapshot(&[
            (SourceId::Binance, 60000.0),
            (SourceId::Coinbase, 50000.0),
        ]);
        let rows = render_rows(
            PriceTable::new(&snap, Some(SourceId::Coinbase), 100.0),
            60,
            8,
        );

        assert_eq!(rows[0], "Current Bitcoin Prices");
        assert!(rows[1].contains("Binance") && rows[1].contains("$60,000.00"));
        assert!(!rows[1].contains("best"));
        assert!(rows[2].contains("Coinbase") && rows[2].ends_with("◀ best"));
        assert_eq!(rows[4], "Best Deal");
        assert!(rows[5].ends_with("Coinbase"));
        assert!(rows[6].contains("BTC for $100.00") && rows[6].ends_with("0.00200000 BTC"));
    }

    #[test]
    fn test_render_without_best_has_no_deal_section() {
        let snap = PriceSnapshot::new();
        let rows = render_rows(PriceTable::new(&snap, None, 100.0), 40, 4);
        assert_eq!(rows[0], "Current Bitcoin Prices");
        assert!(rows[1..].iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_zero_amount_shows_na() {
        let snap = snapshot(&[(SourceId::Bitstamp, 60000.0)]);
        let rows = render_rows(PriceTable::new(&snap, Some(SourceId::Bitstamp), 0.0), 60, 6);
        assert!(rows[5].ends_with("N/A BTC"));
    }
}
