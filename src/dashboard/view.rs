use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Sparkline, Tabs},
    Frame,
};
use rust_decimal::{prelude::*, Decimal};
use rust_decimal_macros::dec;

use super::{Dashboard, Tab};
use crate::{
    apis::Api,
    charts::{coin_color, compact, money, BubbleChart, CandleChart, VolumeBars},
};

pub(super) fn draw<A: Api>(frame: &mut Frame, dash: &Dashboard<A>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tabs(frame, dash, outer[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(0)])
        .split(outer[1]);

    draw_sidebar(frame, dash, body[0]);
    match dash.tab {
        Tab::Price => draw_price(frame, dash, body[1]),
        Tab::Compare => draw_compare(frame, dash, body[1]),
        Tab::Volume => draw_volume(frame, dash, body[1]),
    }

    draw_status(frame, dash, outer[2]);
}

fn draw_tabs<A: Api>(frame: &mut Frame, dash: &Dashboard<A>, area: Rect) {
    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(area);

    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(dash.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, row[0]);

    let settings = Paragraph::new(format!("{} {}d", dash.currency.label(), dash.days))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(settings, row[1]);
}

fn draw_sidebar<A: Api>(frame: &mut Frame, dash: &Dashboard<A>, area: Rect) {
    let items: Vec<ListItem> = dash
        .ranking
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cursor = if i == dash.cursor { ">" } else { " " };
            let marker = if dash.selected.contains(&row.id) {
                "[x]"
            } else {
                "[ ]"
            };

            let title = Line::from(vec![
                Span::raw(format!("{} {} ", cursor, marker)),
                Span::styled(
                    format!("{} ({})", row.name, row.symbol.to_uppercase()),
                    Style::default()
                        .fg(coin_color(i))
                        .add_modifier(Modifier::BOLD),
                ),
            ]);

            let change = row.price_change_24h.unwrap_or(Decimal::ZERO);
            let detail = Line::from(vec![
                Span::raw(format!(
                    "      {} {}  ",
                    money(row.current_price),
                    dash.currency.label()
                )),
                Span::styled(
                    signed_percent(change),
                    Style::default().fg(change_color(change)),
                ),
            ]);

            ListItem::new(vec![title, detail])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top Coins by Market Cap "),
    );
    frame.render_widget(list, area);
}

fn draw_price<A: Api>(frame: &mut Frame, dash: &Dashboard<A>, area: Rect) {
    let target = match dash.price_target() {
        Some(row) => row,
        None => return info(frame, area, "select at least one coin"),
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(6)])
        .split(area);

    let rows = dash.ohlc.get(&target.id).map(Vec::as_slice).unwrap_or(&[]);
    let title = format!(
        " {} - last {} days ({}) ",
        target.name,
        dash.days,
        dash.currency.label()
    );
    frame.render_widget(
        CandleChart::new(rows).block(Block::default().borders(Borders::ALL).title(title)),
        parts[0],
    );

    let color = dash
        .ranking
        .iter()
        .position(|row| row.id == target.id)
        .map(coin_color)
        .unwrap_or(Color::Gray);
    let volumes: Vec<u64> = dash
        .history
        .get(&target.id)
        .map(|chart| {
            let max = chart
                .total_volumes
                .iter()
                .map(|point| point.value)
                .max()
                .unwrap_or(Decimal::ZERO);
            chart
                .total_volumes
                .iter()
                .map(|point| {
                    if max.is_zero() {
                        0
                    } else {
                        (point.value / max * dec!(100)).to_u64().unwrap_or(0)
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    let spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" volume history "),
        )
        .data(volumes)
        .style(Style::default().fg(color));
    frame.render_widget(spark, parts[1]);
}

fn draw_compare<A: Api>(frame: &mut Frame, dash: &Dashboard<A>, area: Rect) {
    let rows: Vec<_> = dash
        .ranking
        .iter()
        .enumerate()
        .filter(|(_, row)| dash.selected.contains(&row.id))
        .map(|(i, row)| (row, coin_color(i)))
        .collect();

    match BubbleChart::new(rows) {
        Ok(chart) => frame.render_widget(
            chart.block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Market Cap vs Price (circle = 24h volume) "),
            ),
            area,
        ),
        Err(err) => {
            let message = err.to_string();
            info(frame, area, &message);
        }
    }
}

fn draw_volume<A: Api>(frame: &mut Frame, dash: &Dashboard<A>, area: Rect) {
    match VolumeBars::new(&dash.shares, &dash.selected) {
        Ok(chart) => frame.render_widget(
            chart.block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Trading Volume Share "),
            ),
            area,
        ),
        Err(err) => {
            let message = err.to_string();
            info(frame, area, &message);
        }
    }
}

fn draw_status<A: Api>(frame: &mut Frame, dash: &Dashboard<A>, area: Rect) {
    const HINT: &str = "q quit | up/down move | space select | d days | c currency | r refresh";

    let line = if let Some(message) = &dash.status {
        Line::from(vec![
            Span::styled(
                format!(" {} ", message),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(HINT, Style::default().fg(Color::DarkGray)),
        ])
    } else if let Some(row) = dash.focused() {
        let change = row.price_change_24h.unwrap_or(Decimal::ZERO);
        Line::from(vec![
            Span::styled(
                format!(" {} ", row.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "{} {} | mcap {} | vol {} | ",
                money(row.current_price),
                dash.currency.label(),
                compact(row.market_cap),
                compact(row.total_volume),
            )),
            Span::styled(
                signed_percent(change),
                Style::default().fg(change_color(change)),
            ),
            Span::styled(format!("   {}", HINT), Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(Span::styled(
            format!(" loading...   {}", HINT),
            Style::default().fg(Color::DarkGray),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn info(frame: &mut Frame, area: Rect, text: &str) {
    let message = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(message, area);
}

fn signed_percent(change: Decimal) -> String {
    let sign = if change >= Decimal::ZERO { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

fn change_color(change: Decimal) -> Color {
    if change < Decimal::ZERO {
        Color::Red
    } else {
        Color::Green
    }
}
