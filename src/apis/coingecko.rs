use super::Api;
use crate::{
    apis::RequestError, transform, CoinRanking, MarketChart, Ohlc, RankingQuery, SeriesKey,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::env;

pub const DEFAULT_ENDPOINT: &str = "https://api.coingecko.com/api/v3";

/// The live CoinGecko client. One independent, blocking-per-cycle GET per
/// call; no retries, no caching.
pub struct CoinGecko {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CoinGecko {
    /// Endpoint and demo key are taken from `COINGECKO_ENDPOINT` and
    /// `COINGECKO_API_KEY` when set.
    pub fn new() -> Self {
        CoinGecko {
            client: Client::new(),
            endpoint: env::var("COINGECKO_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_owned()),
            api_key: env::var("COINGECKO_API_KEY").ok(),
        }
    }

    pub fn with_endpoint<S: Into<String>>(endpoint: S) -> Self {
        CoinGecko {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, RequestError> {
        let url = format!("{}{}", self.endpoint, path);
        log::trace!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| RequestError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} returned {}", url, status);
            return Err(RequestError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|err| RequestError::Network(err.to_string()))?;

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Api for CoinGecko {
    const NAME: &'static str = "CoinGecko";

    async fn ranking(&self, query: RankingQuery) -> Result<Vec<CoinRanking>, RequestError> {
        let raw = self
            .get(
                "/coins/markets",
                &[
                    ("vs_currency", query.currency.to_string()),
                    ("order", "market_cap_desc".to_owned()),
                    ("per_page", query.per_page.to_string()),
                    ("page", query.page.to_string()),
                ],
            )
            .await?;

        Ok(transform::ranking_rows(&raw)?)
    }

    async fn ohlc(&self, key: SeriesKey) -> Result<Vec<Ohlc>, RequestError> {
        let raw = self
            .get(
                &format!("/coins/{}/ohlc", key.coin),
                &[
                    ("vs_currency", key.currency.to_string()),
                    ("days", key.days.to_string()),
                ],
            )
            .await?;

        Ok(transform::ohlc_rows(&raw)?)
    }

    async fn market_chart(&self, key: SeriesKey) -> Result<MarketChart, RequestError> {
        let raw = self
            .get(
                &format!("/coins/{}/market_chart", key.coin),
                &[
                    ("vs_currency", key.currency.to_string()),
                    ("days", key.days.to_string()),
                ],
            )
            .await?;

        Ok(transform::market_chart(&raw)?)
    }
}
