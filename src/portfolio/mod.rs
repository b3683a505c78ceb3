// src/portfolio/mod.rs
mod history;
mod models;
mod stats;

pub use history::*;
pub use models::*;
pub use stats::*;
