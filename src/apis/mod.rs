#[cfg(feature = "coingecko")]
mod coingecko;
mod mock;

#[cfg(feature = "coingecko")]
pub use self::coingecko::*;
pub use mock::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    transform::MalformedResponse, CoinRanking, MarketChart, Ohlc, RankingQuery, SeriesKey,
};

/// A source of market data. The dashboard is generic over this seam so the
/// live client can be swapped for a synthetic one.
#[async_trait]
pub trait Api: Send + Sync {
    const NAME: &'static str;

    /// Coins ordered by market capitalization, descending.
    async fn ranking(&self, query: RankingQuery) -> Result<Vec<CoinRanking>, RequestError>;
    /// OHLC buckets for one coin.
    async fn ohlc(&self, key: SeriesKey) -> Result<Vec<Ohlc>, RequestError>;
    /// Historical price and volume series for one coin.
    async fn market_chart(&self, key: SeriesKey) -> Result<MarketChart, RequestError>;
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("could not reach the api: {0}")]
    Network(String),
    #[error("api returned status {0}")]
    Status(u16),
    #[error("api response is not json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}
