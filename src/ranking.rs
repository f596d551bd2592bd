use rust_decimal::Decimal;

use crate::{CoinId, Currency};

/// One row of the market-cap ranking, unique by `id`.
/// Replaced wholesale on every fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinRanking {
    pub id: CoinId,
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    pub market_cap: Decimal,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Decimal,
    pub price_change_24h: Option<Decimal>,
}

/// Query parameters of a ranking fetch. Coins come back ordered by market
/// capitalization, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingQuery {
    pub currency: Currency,
    pub per_page: usize,
    pub page: usize,
}

impl Default for RankingQuery {
    fn default() -> Self {
        RankingQuery {
            currency: Currency::usd(),
            per_page: 5,
            page: 1,
        }
    }
}
