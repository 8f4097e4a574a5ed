//! Dashboard widgets

pub mod dashboard;
pub mod history_chart;
pub mod price_table;
pub mod spinner;
pub mod tabs;

use ratatui::style::Color;

use crate::types::SourceId;

/// Brand color used for a source in the table and chart
pub fn source_color(source: SourceId) -> Color {
    match source {
        SourceId::Binance => Color::Rgb(0xF0, 0xB9, 0x0B),
        SourceId::Coinbase => Color::Rgb(0x00, 0x52, 0xFF),
        SourceId::CoinGecko => Color::Rgb(0x8D, 0xC6, 0x47),
        SourceId::CryptoCompare => Color::Rgb(0xFF, 0x99, 0x00),
        SourceId::Bitstamp => Color::Rgb(0xED, 0x00, 0x33),
        SourceId::Kraken => Color::Rgb(0x57, 0x41, 0xD9),
        SourceId::Gemini => Color::Rgb(0x00, 0xDC, 0xFA),
    }
}
