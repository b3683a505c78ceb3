// src/portfolio/stats.rs
//! Aggregation of priced positions into a portfolio statistics record.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;

use crate::format::format_stat_value;
use crate::market_data::PriceMap;
use crate::models::Position;

use super::{generation_name, BrokerAggregate, PortfolioSnapshot, StockStat};

/// Exact per-stock figures, kept as decimals until serialization.
#[derive(Debug, Clone)]
struct StockFigures {
    name: String,
    ticker: String,
    average_buy_value: Decimal,
    number_of_shares: Decimal,
    total_value_declared: Decimal,
    total_investment: Decimal,
    total_stock_value: Decimal,
    profit_loss: Decimal,
    percentage_change: Decimal,
}

impl StockFigures {
    fn compute(position: &Position, current_price: Decimal) -> Self {
        let total_investment = position.average_buy_value * position.number_of_shares;
        let total_stock_value = current_price * position.number_of_shares;
        let profit_loss =
            (current_price - position.average_buy_value) * position.number_of_shares;
        let percentage_change = if position.average_buy_value.is_zero() {
            Decimal::ZERO
        } else {
            (current_price - position.average_buy_value) / position.average_buy_value
                * Decimal::ONE_HUNDRED
        };

        Self {
            name: position.name.clone(),
            ticker: position.ticker.clone(),
            average_buy_value: position.average_buy_value,
            number_of_shares: position.number_of_shares,
            total_value_declared: position.total_value_declared,
            total_investment,
            total_stock_value,
            profit_loss,
            percentage_change,
        }
    }

    fn to_stat(&self) -> StockStat {
        StockStat {
            name: self.name.clone(),
            ticker: self.ticker.clone(),
            total_investment: format_stat_value(self.total_investment),
            average_buy_value: format_stat_value(self.average_buy_value),
            number_of_shares: format_stat_value(self.number_of_shares),
            total_value_declared: format_stat_value(self.total_value_declared),
            profit_loss: format_stat_value(self.profit_loss),
            percentage_change: format_stat_value(self.percentage_change),
            total_stock_value: format_stat_value(self.total_stock_value),
        }
    }
}

/// Running totals for one broker.
#[derive(Debug, Default)]
struct BrokerTotals {
    portfolio_value: Decimal,
    investment: Decimal,
    win: Decimal,
    loss: Decimal,
    stocks: Vec<StockFigures>,
}

impl BrokerTotals {
    fn add(&mut self, figures: StockFigures) {
        self.portfolio_value += figures.total_stock_value;
        self.investment += figures.total_investment;
        if figures.profit_loss > Decimal::ZERO {
            self.win += figures.profit_loss;
        } else if figures.profit_loss < Decimal::ZERO {
            self.loss += figures.profit_loss.abs();
        }
        self.stocks.push(figures);
    }

    fn finalize(self) -> BrokerAggregate {
        // Rank on exact decimals; formatting happens after the order is fixed.
        let mut ranked: Vec<&StockFigures> = self.stocks.iter().collect();
        ranked.sort_by(|a, b| b.profit_loss.cmp(&a.profit_loss));

        let top_winners: Vec<StockStat> = ranked.iter().take(3).map(|f| f.to_stat()).collect();
        let top_losers: Vec<StockStat> = ranked[ranked.len().saturating_sub(3)..]
            .iter()
            .map(|f| f.to_stat())
            .collect();

        BrokerAggregate {
            total_portfolio_value: format_stat_value(self.portfolio_value),
            total_investment: format_stat_value(self.investment),
            total_win: format_stat_value(self.win),
            total_loss: format_stat_value(self.loss),
            total_profit: format_stat_value(self.win - self.loss),
            stocks: self.stocks.iter().map(|f| f.to_stat()).collect(),
            top_winners,
            top_losers,
        }
    }
}

/// Aggregates positions into a statistics record for the given time.
///
/// A position whose ticker has no entry in `prices` is left out of every
/// total, including broker membership. Fails when there are no positions
/// at all.
pub fn aggregate(
    positions: &[Position],
    prices: &PriceMap,
    generated_at: DateTime<Utc>,
) -> Result<PortfolioSnapshot> {
    if positions.is_empty() {
        bail!("No positions to aggregate");
    }

    // Snapshot names encode seconds, so the recorded time matches.
    let generated_at = generated_at.with_nanosecond(0).unwrap_or(generated_at);

    let mut portfolio_value = Decimal::ZERO;
    let mut invested_funds = Decimal::ZERO;
    let mut win = Decimal::ZERO;
    let mut loss = Decimal::ZERO;

    // Brokers are created lazily, so only priced positions introduce one.
    let mut by_broker: BTreeMap<String, BrokerTotals> = BTreeMap::new();

    for position in positions {
        let Some(&current_price) = prices.get(&position.ticker) else {
            continue;
        };

        let figures = StockFigures::compute(position, current_price);

        // Portfolio totals accumulate independently of the broker totals.
        portfolio_value += figures.total_stock_value;
        invested_funds += figures.total_investment;
        if figures.profit_loss > Decimal::ZERO {
            win += figures.profit_loss;
        } else if figures.profit_loss < Decimal::ZERO {
            loss += figures.profit_loss.abs();
        }

        by_broker
            .entry(position.broker.clone())
            .or_default()
            .add(figures);
    }

    Ok(PortfolioSnapshot {
        name: generation_name(generated_at),
        generated_at: Some(generated_at),
        total_portfolio_value: format_stat_value(portfolio_value),
        total_invested_funds: format_stat_value(invested_funds),
        total_win: format_stat_value(win),
        total_profit: format_stat_value(win - loss),
        total_loss: format_stat_value(loss),
        by_broker: by_broker
            .into_iter()
            .map(|(broker, totals)| (broker, totals.finalize()))
            .collect(),
    })
}
