//! Pure transforms from raw API JSON to typed rows.
//!
//! Every function here takes a parsed [`serde_json::Value`] and either
//! produces a complete table or fails with [`MalformedResponse`]. A missing
//! field is always an error, never a default.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use thiserror::Error;

use crate::{CoinId, CoinRanking, MarketChart, Ohlc, PricePoint};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MalformedResponse {
    #[error("missing field `{0}` in response")]
    MissingField(&'static str),
    #[error("expected {0} in response")]
    UnexpectedShape(&'static str),
    #[error("`{0}` is not a number")]
    BadNumber(&'static str),
    #[error("timestamp out of range")]
    BadTimestamp,
}

/// A coin's share of the ranked set's trading volume, in percent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeShare {
    pub id: CoinId,
    pub name: String,
    pub share: Decimal,
}

fn field<'a>(raw: &'a Value, name: &'static str) -> Result<&'a Value, MalformedResponse> {
    match raw.get(name) {
        Some(Value::Null) | None => Err(MalformedResponse::MissingField(name)),
        Some(value) => Ok(value),
    }
}

fn string(raw: &Value, name: &'static str) -> Result<String, MalformedResponse> {
    field(raw, name)?
        .as_str()
        .map(str::to_owned)
        .ok_or(MalformedResponse::UnexpectedShape(name))
}

// Coerces both JSON numbers and numeric strings.
fn decimal(raw: &Value, name: &'static str) -> Result<Decimal, MalformedResponse> {
    match raw {
        Value::Number(_) => {
            serde_json::from_value(raw.clone()).map_err(|_| MalformedResponse::BadNumber(name))
        }
        Value::String(repr) => repr.parse().map_err(|_| MalformedResponse::BadNumber(name)),
        _ => Err(MalformedResponse::BadNumber(name)),
    }
}

fn timestamp_ms(raw: &Value) -> Result<DateTime<Utc>, MalformedResponse> {
    let millis = match raw {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        _ => None,
    }
    .ok_or(MalformedResponse::BadTimestamp)?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(MalformedResponse::BadTimestamp)
}

/// `/coins/markets` rows: an array of coin objects.
pub fn ranking_rows(raw: &Value) -> Result<Vec<CoinRanking>, MalformedResponse> {
    raw.as_array()
        .ok_or(MalformedResponse::UnexpectedShape("an array of coins"))?
        .iter()
        .map(ranking_row)
        .collect()
}

fn ranking_row(raw: &Value) -> Result<CoinRanking, MalformedResponse> {
    Ok(CoinRanking {
        id: CoinId::new(string(raw, "id")?),
        symbol: string(raw, "symbol")?,
        name: string(raw, "name")?,
        current_price: decimal(field(raw, "current_price")?, "current_price")?,
        market_cap: decimal(field(raw, "market_cap")?, "market_cap")?,
        market_cap_rank: raw
            .get("market_cap_rank")
            .and_then(Value::as_u64)
            .map(|rank| rank as u32),
        total_volume: decimal(field(raw, "total_volume")?, "total_volume")?,
        price_change_24h: match raw.get("price_change_percentage_24h") {
            Some(Value::Null) | None => None,
            Some(value) => Some(decimal(value, "price_change_percentage_24h")?),
        },
    })
}

/// `/coins/{id}/ohlc` rows: an array of `[time_ms, o, h, l, c]` arrays.
/// Row count and input order are preserved.
pub fn ohlc_rows(raw: &Value) -> Result<Vec<Ohlc>, MalformedResponse> {
    raw.as_array()
        .ok_or(MalformedResponse::UnexpectedShape("an array of ohlc rows"))?
        .iter()
        .map(ohlc_row)
        .collect()
}

fn ohlc_row(raw: &Value) -> Result<Ohlc, MalformedResponse> {
    const SHAPE: &str = "a [time, open, high, low, close] row";

    let row = raw.as_array().ok_or(MalformedResponse::UnexpectedShape(SHAPE))?;
    if row.len() < 5 {
        return Err(MalformedResponse::UnexpectedShape(SHAPE));
    }

    Ok(Ohlc {
        time: timestamp_ms(&row[0])?,
        open: decimal(&row[1], "open")?,
        high: decimal(&row[2], "high")?,
        low: decimal(&row[3], "low")?,
        close: decimal(&row[4], "close")?,
    })
}

/// `/coins/{id}/market_chart`: an object with `prices` and `total_volumes`
/// parallel arrays of `[time_ms, value]` pairs.
pub fn market_chart(raw: &Value) -> Result<MarketChart, MalformedResponse> {
    Ok(MarketChart {
        prices: series(field(raw, "prices")?)?,
        total_volumes: series(field(raw, "total_volumes")?)?,
    })
}

fn series(raw: &Value) -> Result<Vec<PricePoint>, MalformedResponse> {
    const SHAPE: &str = "an array of [time, value] pairs";

    raw.as_array()
        .ok_or(MalformedResponse::UnexpectedShape(SHAPE))?
        .iter()
        .map(|pair| {
            let pair = pair.as_array().ok_or(MalformedResponse::UnexpectedShape(SHAPE))?;
            if pair.len() < 2 {
                return Err(MalformedResponse::UnexpectedShape(SHAPE));
            }
            Ok(PricePoint {
                time: timestamp_ms(&pair[0])?,
                value: decimal(&pair[1], "value")?,
            })
        })
        .collect()
}

/// Each coin's share of the set's total volume, in percent, sorted
/// descending. Shares sum to 100 modulo rounding; an all-zero set yields
/// all-zero shares.
pub fn volume_shares(rows: &[CoinRanking]) -> Vec<VolumeShare> {
    let total: Decimal = rows.iter().map(|row| row.total_volume).sum();

    let mut shares: Vec<VolumeShare> = rows
        .iter()
        .map(|row| VolumeShare {
            id: row.id,
            name: row.name.clone(),
            share: if total.is_zero() {
                Decimal::ZERO
            } else {
                row.total_volume / total * dec!(100)
            },
        })
        .collect();
    shares.sort_by(|a, b| b.share.cmp(&a.share));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ranking_fixture() -> Value {
        json!([
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "current_price": 43210.55,
                "market_cap": 845_000_000_000u64,
                "market_cap_rank": 1,
                "total_volume": 23_000_000_000u64,
                "price_change_percentage_24h": 1.23
            },
            {
                "id": "ethereum",
                "symbol": "eth",
                "name": "Ethereum",
                "current_price": "2345.67",
                "market_cap": 280_000_000_000u64,
                "market_cap_rank": 2,
                "total_volume": 11_000_000_000u64,
                "price_change_percentage_24h": null
            }
        ])
    }

    #[test]
    fn ranking_coerces_numbers_and_strings() {
        let rows = ranking_rows(&ranking_fixture()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, CoinId::new("bitcoin"));
        assert_eq!(rows[0].current_price, dec!(43210.55));
        // numeric string coerced, missing 24h change stays absent
        assert_eq!(rows[1].current_price, dec!(2345.67));
        assert_eq!(rows[1].price_change_24h, None);
    }

    #[test]
    fn ranking_missing_field_fails() {
        let raw = json!([{ "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" }]);
        assert_eq!(
            ranking_rows(&raw).unwrap_err(),
            MalformedResponse::MissingField("current_price")
        );
    }

    #[test]
    fn ohlc_preserves_count_and_order() {
        let raw = json!([
            [1_700_000_000_000i64, 100, 110, 95, 105],
            [1_700_000_900_000i64, 105, 120, 100, 118],
            [1_700_001_800_000i64, 118, 119, 90, 91]
        ]);
        let rows = ohlc_rows(&raw).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|pair| pair[0].time <= pair[1].time));
        assert!(rows[1].is_up());
        assert!(!rows[2].is_up());
    }

    #[test]
    fn ohlc_short_row_fails() {
        let raw = json!([[1_700_000_000_000i64, 100, 110]]);
        assert!(matches!(
            ohlc_rows(&raw),
            Err(MalformedResponse::UnexpectedShape(_))
        ));
    }

    #[test]
    fn market_chart_missing_prices_fails() {
        let raw = json!({ "total_volumes": [[1_700_000_000_000i64, 1000]] });
        assert_eq!(
            market_chart(&raw).unwrap_err(),
            MalformedResponse::MissingField("prices")
        );
    }

    #[test]
    fn market_chart_parses_parallel_series() {
        let raw = json!({
            "prices": [[1_700_000_000_000i64, 100.5], [1_700_000_900_000i64, 101.5]],
            "total_volumes": [[1_700_000_000_000i64, 900], [1_700_000_900_000i64, 1100]]
        });
        let chart = market_chart(&raw).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.total_volumes.len(), 2);
        assert_eq!(chart.prices[0].value, dec!(100.5));
    }

    #[test]
    fn volume_shares_sum_to_hundred() {
        for n in 1..=5u32 {
            let rows: Vec<CoinRanking> = (0..n)
                .map(|i| CoinRanking {
                    id: CoinId::new(format!("coin-{}", i)),
                    symbol: format!("c{}", i),
                    name: format!("Coin {}", i),
                    current_price: dec!(1),
                    market_cap: dec!(1000),
                    market_cap_rank: Some(i + 1),
                    // uneven volumes so the shares do not divide evenly
                    total_volume: Decimal::from(i * 7 + 1),
                    price_change_24h: None,
                })
                .collect();

            let shares = volume_shares(&rows);
            let sum: Decimal = shares.iter().map(|share| share.share).sum();
            assert!((sum - dec!(100)).abs() < dec!(0.0001), "sum was {}", sum);
        }
    }

    #[test]
    fn volume_shares_sorted_descending() {
        let rows = ranking_rows(&ranking_fixture()).unwrap();
        let shares = volume_shares(&rows);
        assert!(shares.windows(2).all(|pair| pair[0].share >= pair[1].share));
    }

    #[test]
    fn volume_shares_zero_total() {
        let mut rows = ranking_rows(&ranking_fixture()).unwrap();
        for row in rows.iter_mut() {
            row.total_volume = Decimal::ZERO;
        }
        let shares = volume_shares(&rows);
        assert!(shares.iter().all(|share| share.share.is_zero()));
    }

    #[test]
    fn bad_timestamp_fails() {
        let raw = json!([["not-a-time", 1, 2, 3, 4]]);
        assert_eq!(ohlc_rows(&raw).unwrap_err(), MalformedResponse::BadTimestamp);
    }
}
