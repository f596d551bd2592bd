use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use super::money;
use crate::Ohlc;

const UP: Color = Color::Green;
const DOWN: Color = Color::Red;
// room for the price scale on the left
const SCALE_WIDTH: u16 = 12;

/// Candlestick chart of one OHLC series, one column per time bucket: a wick
/// from low to high and a body between open and close, colored by
/// close-vs-open. When the series is wider than the area, the most recent
/// buckets win.
pub struct CandleChart<'a> {
    rows: &'a [Ohlc],
    block: Option<Block<'a>>,
}

impl<'a> CandleChart<'a> {
    pub fn new(rows: &'a [Ohlc]) -> Self {
        CandleChart { rows, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width <= SCALE_WIDTH + 1 || inner.height < 3 || self.rows.is_empty() {
            return;
        }

        let chart = Rect {
            x: inner.x + SCALE_WIDTH,
            y: inner.y,
            width: inner.width - SCALE_WIDTH,
            // bottom row carries the time range
            height: inner.height - 1,
        };

        let visible = self.rows.len().min(chart.width as usize);
        let rows = &self.rows[self.rows.len() - visible..];

        let low = rows.iter().map(|row| row.low).min().unwrap();
        let high = rows.iter().map(|row| row.high).max().unwrap();
        let low_f = low.to_f64().unwrap_or(0.0);
        let high_f = high.to_f64().unwrap_or(0.0);
        let span = (high_f - low_f).max(f64::EPSILON);
        let height = chart.height as f64;

        let to_row = |price: f64| {
            let norm = ((price - low_f) / span).clamp(0.0, 1.0);
            let offset = ((1.0 - norm) * (height - 1.0)).round() as u16;
            chart.y + offset.min(chart.height - 1)
        };

        for (i, row) in rows.iter().enumerate() {
            let x = chart.x + i as u16;
            let style = Style::default().fg(if row.is_up() { UP } else { DOWN });

            let open = row.open.to_f64().unwrap_or(0.0);
            let close = row.close.to_f64().unwrap_or(0.0);

            let wick_top = to_row(row.high.to_f64().unwrap_or(0.0));
            let wick_bottom = to_row(row.low.to_f64().unwrap_or(0.0));
            for y in wick_top..=wick_bottom {
                buf.set_string(x, y, "│", style);
            }

            let body_top = to_row(open.max(close));
            let body_bottom = to_row(open.min(close));
            for y in body_top..=body_bottom {
                buf.set_string(x, y, "█", style);
            }
        }

        let scale = Style::default().fg(Color::DarkGray);
        let mid = (low + high) / dec!(2);
        buf.set_string(inner.x, chart.y, format!("{:>11}", money(high)), scale);
        buf.set_string(
            inner.x,
            chart.y + chart.height / 2,
            format!("{:>11}", money(mid)),
            scale,
        );
        buf.set_string(
            inner.x,
            chart.y + chart.height - 1,
            format!("{:>11}", money(low)),
            scale,
        );

        let footer_y = inner.y + inner.height - 1;
        let first = rows.first().unwrap().time.format("%Y-%m-%d").to_string();
        let last = rows.last().unwrap().time.format("%Y-%m-%d").to_string();
        buf.set_string(chart.x, footer_y, &first, scale);
        if chart.width > last.len() as u16 {
            buf.set_string(
                chart.x + chart.width - last.len() as u16,
                footer_y,
                &last,
                scale,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    fn rows() -> Vec<Ohlc> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        vec![
            Ohlc {
                time: start,
                open: dec!(100),
                high: dec!(115),
                low: dec!(95),
                close: dec!(110),
            },
            Ohlc {
                time: start + Duration::days(1),
                open: dec!(110),
                high: dec!(112),
                low: dec!(90),
                close: dec!(92),
            },
        ]
    }

    #[test]
    fn renders_up_and_down_candles() {
        let rows = rows();
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| frame.render_widget(CandleChart::new(&rows), frame.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut up_cells = 0;
        let mut down_cells = 0;
        for cell in buffer.content().iter() {
            if cell.symbol() == "█" {
                match cell.fg {
                    UP => up_cells += 1,
                    DOWN => down_cells += 1,
                    _ => {}
                }
            }
        }
        assert!(up_cells > 0, "no bullish body drawn");
        assert!(down_cells > 0, "no bearish body drawn");
    }

    #[test]
    fn empty_series_draws_nothing() {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| frame.render_widget(CandleChart::new(&[]), frame.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().all(|cell| cell.symbol() == " "));
    }
}
