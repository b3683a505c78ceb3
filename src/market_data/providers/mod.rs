pub mod yahoo;

pub use yahoo::YahooQuoteProvider;
