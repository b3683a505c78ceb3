use std::collections::{HashMap, HashSet};

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::warn;

/// Resolved prices for one aggregation run, keyed by ticker.
pub type PriceMap = HashMap<String, Decimal>;

/// Source of current market prices.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Latest traded price for a ticker.
    ///
    /// `Ok(None)` means the provider has no price for the symbol. `Err` is a
    /// failed lookup (network, decode); [`resolve_prices`] collapses both
    /// into absence.
    async fn latest_price(&self, ticker: &str) -> Result<Option<Decimal>>;

    fn name(&self) -> &str;
}

/// Provider that never returns a price. Used when live lookups are disabled.
pub struct NullQuoteProvider;

#[async_trait::async_trait]
impl QuoteProvider for NullQuoteProvider {
    async fn latest_price(&self, _ticker: &str) -> Result<Option<Decimal>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// In-memory ticker to price table for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticQuoteProvider {
    prices: HashMap<String, Decimal>,
}

impl StaticQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, ticker: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(ticker.into(), price);
        self
    }
}

#[async_trait::async_trait]
impl QuoteProvider for StaticQuoteProvider {
    async fn latest_price(&self, ticker: &str) -> Result<Option<Decimal>> {
        Ok(self.prices.get(ticker).copied())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Resolve prices for every distinct ticker, one lookup each.
///
/// Lookups are independent: a failure is logged and treated the same as an
/// absent price, and the batch always completes.
pub async fn resolve_prices<'a, I>(provider: &dyn QuoteProvider, tickers: I) -> PriceMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut prices = PriceMap::new();

    for ticker in tickers {
        if !seen.insert(ticker) {
            continue;
        }

        match provider.latest_price(ticker).await {
            Ok(Some(price)) => {
                prices.insert(ticker.to_string(), price);
            }
            Ok(None) => {
                warn!(ticker = %ticker, provider = provider.name(), "No price available");
            }
            Err(e) => {
                warn!(
                    ticker = %ticker,
                    provider = provider.name(),
                    error = %e,
                    "Price lookup failed"
                );
            }
        }
    }

    prices
}
