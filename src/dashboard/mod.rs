mod view;

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::future::join_all;
use fxhash::{FxHashMap, FxHashSet};
use ratatui::{backend::Backend, Terminal};

use crate::{
    apis::{Api, RequestError},
    transform, CoinId, CoinRanking, Currency, MarketChart, Ohlc, RankingQuery, SeriesKey,
    VolumeShare,
};

pub type AnyError = Box<dyn std::error::Error>;

pub const DAY_CHOICES: [u32; 7] = [1, 7, 14, 30, 90, 180, 365];
pub const CURRENCY_CHOICES: [&str; 3] = ["usd", "eur", "btc"];

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tab {
    Price,
    Compare,
    Volume,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Price, Tab::Compare, Tab::Volume];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Price => "Price Overview",
            Tab::Compare => "Market Comparison",
            Tab::Volume => "Volume Analysis",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|tab| tab == self).unwrap()
    }

    fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Keeps track of the dashboard state: the user selection, the tables of the
/// current render cycle, and the last error. Every render is a function of
/// (selection, freshly fetched tables); tables are replaced wholesale.
pub struct Dashboard<A: Api> {
    api: A,
    // user selection
    tab: Tab,
    cursor: usize,
    selected: FxHashSet<CoinId>,
    currency: Currency,
    days: u32,
    per_page: usize,
    // request-scoped tables
    ranking: Vec<CoinRanking>,
    shares: Vec<VolumeShare>,
    ohlc: FxHashMap<CoinId, Vec<Ohlc>>,
    history: FxHashMap<CoinId, MarketChart>,
    // render-cycle status
    status: Option<String>,
    dirty: bool,
    quit: bool,
}

impl<A: Api> Dashboard<A> {
    pub fn new(api: A, currency: Currency, days: u32, per_page: usize) -> Self {
        Dashboard {
            api,
            tab: Tab::Price,
            cursor: 0,
            selected: FxHashSet::default(),
            currency,
            days,
            per_page,
            ranking: Vec::new(),
            shares: Vec::new(),
            ohlc: FxHashMap::default(),
            history: FxHashMap::default(),
            status: None,
            dirty: true,
            quit: false,
        }
    }

    /// The coin under the cursor.
    pub fn focused(&self) -> Option<&CoinRanking> {
        self.ranking.get(self.cursor)
    }

    /// The coin whose series the price tab shows: the cursor coin when it is
    /// selected, otherwise the first selected coin.
    fn price_target(&self) -> Option<&CoinRanking> {
        let focused = self.focused()?;
        if self.selected.contains(&focused.id) {
            return Some(focused);
        }
        self.ranking
            .iter()
            .find(|row| self.selected.contains(&row.id))
    }

    /// Run one blocking fetch-transform cycle for the current selection.
    /// A failure lands in the status line; the previous tables stay in place
    /// until the next successful cycle.
    pub async fn refresh(&mut self) {
        self.dirty = false;
        self.status = None;
        match self.fetch_cycle().await {
            Ok(()) => log::trace!("tables replaced for {} coins", self.ranking.len()),
            Err(err) => {
                log::warn!("fetch cycle failed: {}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    async fn fetch_cycle(&mut self) -> Result<(), RequestError> {
        let query = RankingQuery {
            currency: self.currency,
            per_page: self.per_page,
            page: 1,
        };
        let ranking = self.api.ranking(query).await?;

        // The first successful cycle starts with the top coin selected.
        if self.ranking.is_empty() && self.selected.is_empty() {
            if let Some(first) = ranking.first() {
                self.selected.insert(first.id);
            }
        }
        if self.cursor >= ranking.len() {
            self.cursor = ranking.len().saturating_sub(1);
        }

        let keys: Vec<SeriesKey> = ranking
            .iter()
            .filter(|row| self.selected.contains(&row.id))
            .map(|row| SeriesKey {
                coin: row.id,
                currency: self.currency,
                days: self.days,
            })
            .collect();

        // Per-coin series of one cycle are independent, fetch them together.
        let candles = join_all(keys.iter().map(|&key| self.api.ohlc(key))).await;
        let mut ohlc = FxHashMap::default();
        for (key, result) in keys.iter().zip(candles) {
            ohlc.insert(key.coin, result?);
        }

        let charts = join_all(keys.iter().map(|&key| self.api.market_chart(key))).await;
        let mut history = FxHashMap::default();
        for (key, result) in keys.iter().zip(charts) {
            history.insert(key.coin, result?);
        }

        self.shares = transform::volume_shares(&ranking);
        self.ranking = ranking;
        self.ohlc = ohlc;
        self.history = history;

        Ok(())
    }

    /// Apply one key press. Any change to the selection marks the state
    /// dirty, which triggers a fresh fetch cycle before the next draw.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.dirty = true;
            }
            KeyCode::Char('1') => {
                self.tab = Tab::Price;
                self.dirty = true;
            }
            KeyCode::Char('2') => {
                self.tab = Tab::Compare;
                self.dirty = true;
            }
            KeyCode::Char('3') => {
                self.tab = Tab::Volume;
                self.dirty = true;
            }
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                self.dirty = true;
            }
            KeyCode::Down => {
                if self.cursor + 1 < self.ranking.len() {
                    self.cursor += 1;
                    self.dirty = true;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(row) = self.ranking.get(self.cursor) {
                    if !self.selected.remove(&row.id) {
                        self.selected.insert(row.id);
                    }
                    self.dirty = true;
                }
            }
            KeyCode::Char('d') => {
                let i = DAY_CHOICES
                    .iter()
                    .position(|&days| days == self.days)
                    .unwrap_or(0);
                self.days = DAY_CHOICES[(i + 1) % DAY_CHOICES.len()];
                self.dirty = true;
            }
            KeyCode::Char('c') => {
                let i = CURRENCY_CHOICES
                    .iter()
                    .position(|&code| Currency::new(code) == self.currency)
                    .unwrap_or(0);
                self.currency = Currency::new(CURRENCY_CHOICES[(i + 1) % CURRENCY_CHOICES.len()]);
                self.dirty = true;
            }
            KeyCode::Char('r') => self.dirty = true,
            _ => {}
        }
    }

    /// Draw, wait for input, apply it, refetch when needed. Runs until the
    /// user quits. The loop blocks on the in-flight cycle before redrawing;
    /// errors are shown in the status line and never end the session.
    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<(), AnyError> {
        log::info!("dashboard running against {}", A::NAME);

        while !self.quit {
            if self.dirty {
                self.refresh().await;
            }

            terminal.draw(|frame| view::draw(frame, &self))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    // the next draw picks up the new size
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
