use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{CoinId, Currency};

/// One OHLC bucket of a price series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ohlc {
    pub time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Ohlc {
    /// Whether the bucket closed at or above its open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Parameters of one per-coin series fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub coin: CoinId,
    pub currency: Currency,
    pub days: u32,
}
