mod bars;
mod bubble;
mod candlestick;

pub use bars::*;
pub use bubble::*;
pub use candlestick::*;

use ratatui::style::Color;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// A chart that needs at least one selected coin received none.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("select at least one coin")]
pub struct EmptySelection;

// One fixed color per ranking slot, reused across all tabs so a coin keeps
// its color wherever it appears.
const PALETTE: [Color; 5] = [
    Color::Rgb(0x63, 0x6e, 0xfa),
    Color::Rgb(0xef, 0x55, 0x3b),
    Color::Rgb(0x00, 0xcc, 0x96),
    Color::Rgb(0xab, 0x63, 0xfa),
    Color::Rgb(0xff, 0xa1, 0x5a),
];

pub fn coin_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// `1234567.891` -> `1,234,567.89`
pub fn money(value: Decimal) -> String {
    let repr = format!("{:.2}", value);
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, frac_part)
}

/// `23000000000` -> `23.00B`
pub fn compact(value: Decimal) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= dec!(1_000_000_000_000) {
        (value / dec!(1_000_000_000_000), "T")
    } else if abs >= dec!(1_000_000_000) {
        (value / dec!(1_000_000_000), "B")
    } else if abs >= dec!(1_000_000) {
        (value / dec!(1_000_000), "M")
    } else if abs >= dec!(1_000) {
        (value / dec!(1_000), "K")
    } else {
        (value, "")
    };

    format!("{:.2}{}", scaled, suffix)
}
