use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{
        canvas::{Canvas, Circle},
        Block, Widget,
    },
};
use rust_decimal::prelude::*;

use super::{compact, EmptySelection};
use crate::CoinRanking;

/// Market comparison scatter: x = market cap, y = current price, circle
/// radius ∝ √(24h volume), one fixed color per coin. Terminal cells are
/// anisotropic and the raw ranges span orders of magnitude, so both axes are
/// mapped onto a unit canvas and the corners carry the real ranges.
pub struct BubbleChart<'a> {
    rows: Vec<(&'a CoinRanking, Color)>,
    block: Option<Block<'a>>,
}

impl<'a> BubbleChart<'a> {
    pub fn new(rows: Vec<(&'a CoinRanking, Color)>) -> Result<Self, EmptySelection> {
        if rows.is_empty() {
            return Err(EmptySelection);
        }
        Ok(BubbleChart { rows, block: None })
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

fn bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        // a single coin sits in the middle
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

impl Widget for BubbleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let caps: Vec<f64> = self
            .rows
            .iter()
            .map(|(row, _)| row.market_cap.to_f64().unwrap_or(0.0))
            .collect();
        let prices: Vec<f64> = self
            .rows
            .iter()
            .map(|(row, _)| row.current_price.to_f64().unwrap_or(0.0))
            .collect();
        let volumes: Vec<f64> = self
            .rows
            .iter()
            .map(|(row, _)| row.total_volume.to_f64().unwrap_or(0.0))
            .collect();

        let (cap_min, cap_max) = bounds(&caps);
        let (price_min, price_max) = bounds(&prices);
        let vol_max = volumes.iter().cloned().fold(0.0_f64, f64::max).max(f64::EPSILON);

        let place = |value: f64, min: f64, max: f64| 10.0 + (value - min) / (max - min) * 80.0;

        let cap_range = {
            let lowest = self.rows.iter().map(|(row, _)| row.market_cap).min().unwrap();
            let highest = self.rows.iter().map(|(row, _)| row.market_cap).max().unwrap();
            format!("mcap {}..{}", compact(lowest), compact(highest))
        };
        let price_range = {
            let lowest = self
                .rows
                .iter()
                .map(|(row, _)| row.current_price)
                .min()
                .unwrap();
            let highest = self
                .rows
                .iter()
                .map(|(row, _)| row.current_price)
                .max()
                .unwrap();
            format!("price {}..{}", compact(lowest), compact(highest))
        };

        let mut canvas = Canvas::default()
            .x_bounds([0.0, 100.0])
            .y_bounds([0.0, 100.0])
            .paint(|ctx| {
                for (i, (row, color)) in self.rows.iter().enumerate() {
                    let x = place(caps[i], cap_min, cap_max);
                    let y = place(prices[i], price_min, price_max);
                    let radius = 3.0 + (volumes[i] / vol_max).sqrt() * 9.0;
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius,
                        color: *color,
                    });
                    ctx.print(
                        x,
                        y,
                        Line::styled(
                            row.symbol.to_uppercase(),
                            Style::default().fg(*color).add_modifier(Modifier::BOLD),
                        ),
                    );
                }

                let hint = Style::default().fg(Color::DarkGray);
                ctx.print(0.0, 0.0, Line::styled(cap_range.clone(), hint));
                ctx.print(0.0, 100.0, Line::styled(price_range.clone(), hint));
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoinId;
    use ratatui::{backend::TestBackend, Terminal};
    use rust_decimal_macros::dec;

    fn row(id: &str, price: i64, cap: i64, volume: i64) -> CoinRanking {
        CoinRanking {
            id: CoinId::new(id),
            symbol: id[..3].to_owned(),
            name: id.to_owned(),
            current_price: Decimal::from(price),
            market_cap: Decimal::from(cap),
            market_cap_rank: None,
            total_volume: Decimal::from(volume),
            price_change_24h: Some(dec!(0.5)),
        }
    }

    #[test]
    fn empty_selection_fails() {
        assert!(matches!(BubbleChart::new(Vec::new()), Err(EmptySelection)));
    }

    #[test]
    fn renders_one_circle_per_coin() {
        let bitcoin = row("bitcoin", 43000, 845_000_000_000, 23_000_000_000);
        let ethereum = row("ethereum", 2300, 280_000_000_000, 11_000_000_000);
        let rows = vec![
            (&bitcoin, Color::Rgb(0x63, 0x6e, 0xfa)),
            (&ethereum, Color::Rgb(0xef, 0x55, 0x3b)),
        ];

        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                frame.render_widget(BubbleChart::new(rows).unwrap(), frame.area())
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let blue = buffer
            .content()
            .iter()
            .any(|cell| cell.fg == Color::Rgb(0x63, 0x6e, 0xfa));
        let red = buffer
            .content()
            .iter()
            .any(|cell| cell.fg == Color::Rgb(0xef, 0x55, 0x3b));
        assert!(blue && red, "both coin colors should appear");
    }
}
