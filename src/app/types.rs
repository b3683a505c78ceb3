use serde::Serialize;

/// JSON output for snapshot generation
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub name: String,
    pub generated_at: String,
    pub positions: usize,
    pub rejected_rows: usize,
    pub priced_positions: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unpriced_tickers: Vec<String>,
    pub brokers: usize,
    pub total_portfolio_value: String,
    pub total_invested_funds: String,
    pub total_profit: String,
}

/// A single month in the portfolio history
#[derive(Serialize)]
pub struct MonthPoint {
    pub month: String,
    pub snapshot_name: String,
    pub total_portfolio_value: String,
    pub total_invested_funds: String,
    pub total_win: String,
    pub total_loss: String,
    pub total_profit: String,
}

/// Output for the history command
#[derive(Serialize)]
pub struct HistoryOutput {
    pub months: Vec<MonthPoint>,
}

/// A single snapshot in chronological order
#[derive(Serialize)]
pub struct TrendPoint {
    pub name: String,
    pub timestamp: String,
    pub total_portfolio_value: String,
    pub total_profit: String,
}

/// Output for the trend command
#[derive(Serialize)]
pub struct TrendOutput {
    pub points: Vec<TrendPoint>,
}

/// JSON output for stored snapshots
#[derive(Serialize)]
pub struct SnapshotListItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
