//! Yahoo Finance quote provider using the v8 chart endpoint.
//!
//! No API key is required, but the endpoint rejects requests without a
//! browser-like user agent, so one is sent explicitly.

use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::market_data::QuoteProvider;

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
const YAHOO_USER_AGENT: &str = "Mozilla/5.0 (compatible; foliostat/0.1)";

/// Response from the chart endpoint.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

/// Yahoo Finance quote provider.
#[derive(Debug, Clone)]
pub struct YahooQuoteProvider {
    client: Client,
    base_url: String,
}

impl YahooQuoteProvider {
    /// Creates a provider with a default HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: YAHOO_BASE_URL.to_string(),
        }
    }

    /// Override API base URL (useful for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn parse_response(response: ChartResponse) -> Option<Decimal> {
        if let Some(error) = response.chart.error {
            debug!(
                code = %error.code,
                description = %error.description,
                "Yahoo chart error"
            );
            return None;
        }

        let result = response.chart.result?.into_iter().next()?;
        result.meta.regular_market_price
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl QuoteProvider for YahooQuoteProvider {
    async fn latest_price(&self, ticker: &str) -> Result<Option<Decimal>> {
        let url = format!("{}/v8/finance/chart/{ticker}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, YAHOO_USER_AGENT)
            .send()
            .await
            .context("Failed to send request to Yahoo Finance")?;

        // Unknown symbols come back as 404 with an error payload.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let data = response
            .error_for_status()?
            .json::<ChartResponse>()
            .await
            .context("Failed to parse Yahoo Finance response")?;

        Ok(Self::parse_response(data))
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}
