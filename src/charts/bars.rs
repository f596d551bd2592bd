use fxhash::FxHashSet;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Widget},
};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use super::EmptySelection;
use crate::{CoinId, VolumeShare};

const SELECTED: Color = Color::Rgb(0x46, 0x82, 0xb4);
const UNSELECTED: Color = Color::Rgb(0x6c, 0x6c, 0x6c);

/// Volume-share bars over the ranked set, one bar per coin, selected coins
/// highlighted.
pub struct VolumeBars<'a> {
    shares: &'a [VolumeShare],
    selected: &'a FxHashSet<CoinId>,
    block: Option<Block<'a>>,
}

impl<'a> VolumeBars<'a> {
    /// Fails when no coin is selected so the caller never renders an
    /// unhighlighted chart.
    pub fn new(
        shares: &'a [VolumeShare],
        selected: &'a FxHashSet<CoinId>,
    ) -> Result<Self, EmptySelection> {
        if selected.is_empty() {
            return Err(EmptySelection);
        }
        Ok(VolumeBars {
            shares,
            selected,
            block: None,
        })
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for VolumeBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bars: Vec<Bar> = self
            .shares
            .iter()
            .map(|share| {
                let color = if self.selected.contains(&share.id) {
                    SELECTED
                } else {
                    UNSELECTED
                };
                // hundredths of a percent keep relative heights exact
                let value = (share.share * dec!(100)).round().to_u64().unwrap_or(0);
                Bar::default()
                    .value(value)
                    .text_value(format!("{:.2}%", share.share))
                    .label(Line::from(share.name.clone()))
                    .style(Style::default().fg(color))
            })
            .collect();

        let count = bars.len().max(1) as u16;
        let width = (area.width / count).saturating_sub(1).clamp(5, 14);

        let mut chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(width)
            .bar_gap(1);
        if let Some(block) = self.block {
            chart = chart.block(block);
        }
        chart.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn shares() -> Vec<VolumeShare> {
        vec![
            VolumeShare {
                id: CoinId::new("tether"),
                name: "Tether".to_owned(),
                share: dec!(54.05),
            },
            VolumeShare {
                id: CoinId::new("bitcoin"),
                name: "Bitcoin".to_owned(),
                share: dec!(31.08),
            },
            VolumeShare {
                id: CoinId::new("ethereum"),
                name: "Ethereum".to_owned(),
                share: dec!(14.87),
            },
        ]
    }

    #[test]
    fn zero_selected_coins_fail() {
        let shares = shares();
        let selected = FxHashSet::default();
        assert!(matches!(
            VolumeBars::new(&shares, &selected),
            Err(EmptySelection)
        ));
    }

    #[test]
    fn selected_bars_are_highlighted() {
        let shares = shares();
        let mut selected = FxHashSet::default();
        selected.insert(CoinId::new("bitcoin"));

        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                frame.render_widget(
                    VolumeBars::new(&shares, &selected).unwrap(),
                    frame.area(),
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let highlighted = buffer.content().iter().any(|cell| cell.fg == SELECTED);
        let dimmed = buffer.content().iter().any(|cell| cell.fg == UNSELECTED);
        assert!(highlighted, "selected coin should be highlighted");
        assert!(dimmed, "unselected coins should be dimmed");
    }
}
