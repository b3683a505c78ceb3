mod provider;
pub mod providers;

pub use provider::{
    resolve_prices, NullQuoteProvider, PriceMap, QuoteProvider, StaticQuoteProvider,
};
