pub mod app;
pub mod clock;
pub mod config;
pub mod format;
pub mod holdings;
pub mod market_data;
pub mod models;
pub mod portfolio;
pub mod storage;
