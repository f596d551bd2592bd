use super::Api;
use crate::{
    apis::RequestError, CoinRanking, MarketChart, Ohlc, PricePoint, RankingQuery, SeriesKey,
};

use async_trait::async_trait;
use rust_decimal_macros::dec;

pub trait SeriesGen: Fn(SeriesKey) -> Vec<Ohlc> + Send + Sync {}

impl<F> SeriesGen for F where F: Fn(SeriesKey) -> Vec<Ohlc> + Send + Sync {}

pub struct Settings<F>
where
    F: SeriesGen,
{
    pub ranking: Vec<CoinRanking>,
    pub series: F,
}

/// A synthetic market data source. Ranking rows are fixed, per-coin series
/// come from a generator closure. Useful for tests and offline runs.
pub struct Mock<F>
where
    F: SeriesGen,
{
    settings: Settings<F>,
}

impl<F> Mock<F>
where
    F: SeriesGen,
{
    pub fn new(settings: Settings<F>) -> Self {
        Mock { settings }
    }
}

#[async_trait]
impl<F> Api for Mock<F>
where
    F: SeriesGen,
{
    const NAME: &'static str = "Mock";

    async fn ranking(&self, query: RankingQuery) -> Result<Vec<CoinRanking>, RequestError> {
        Ok(self
            .settings
            .ranking
            .iter()
            .take(query.per_page)
            .cloned()
            .collect())
    }

    async fn ohlc(&self, key: SeriesKey) -> Result<Vec<Ohlc>, RequestError> {
        Ok((self.settings.series)(key))
    }

    async fn market_chart(&self, key: SeriesKey) -> Result<MarketChart, RequestError> {
        // Derive a plausible history from the generated candles.
        let rows = (self.settings.series)(key);
        Ok(MarketChart {
            prices: rows
                .iter()
                .map(|row| PricePoint {
                    time: row.time,
                    value: row.close,
                })
                .collect(),
            total_volumes: rows
                .iter()
                .map(|row| PricePoint {
                    time: row.time,
                    value: (row.high - row.low) * dec!(1000),
                })
                .collect(),
        })
    }
}
