//! Best-price selection and USD conversion

use crate::types::{PricewatchError, PriceSnapshot, Result, SourceId};

/// Pick the source with the lowest price.
///
/// Ties go to the earliest entry in snapshot order.
pub fn select_best(snapshot: &PriceSnapshot) -> Result<SourceId> {
    let mut best: Option<(SourceId, f64)> = None;
    for quote in snapshot.iter() {
        match best {
            Some((_, price)) if quote.price() >= price => {}
            _ => best = Some((quote.source(), quote.price())),
        }
    }
    best.map(|(source, _)| source)
        .ok_or(PricewatchError::EmptySnapshot)
}

/// Convert a USD amount into BTC at `price`, formatted to 8 decimals.
///
/// Returns `"N/A"` when the price is missing or not positive, or the amount
/// is not positive.
pub fn convert(usd_amount: f64, price: Option<f64>) -> String {
    match price {
        Some(price)
            if price.is_finite() && price > 0.0 && usd_amount.is_finite() && usd_amount > 0.0 =>
        {
            format!("{:.8}", usd_amount / price)
        }
        _ => "N/A".to_string(),
    }
}

/// Format a USD value with thousand separators (e.g., 60123.4 -> "$60,123.40")
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let chars: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}
