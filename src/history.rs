use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One point of a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub value: Decimal,
}

/// Parallel price and volume history of one coin.
#[derive(Debug, Clone, Default)]
pub struct MarketChart {
    pub prices: Vec<PricePoint>,
    pub total_volumes: Vec<PricePoint>,
}
