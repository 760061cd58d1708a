//! Performance aggregation over realized trade lists.

use crate::error::DcalabError;
use crate::reconcile::RealizedTrade;

/// Headline figures from folding a trade list over a starting equity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceSummary {
    pub roi_pct: f64,
    /// Deepest decline from the running equity peak. Always `<= 0`; zero
    /// exactly when equity never dipped below its peak.
    pub max_drawdown_pct: f64,
}

/// Equity after each trade.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquityPoint {
    pub ts: i64,
    pub equity: f64,
}

/// Fold `trades` (in time order) over `start_equity` into ROI and max
/// drawdown. `start_equity` must be strictly positive — ROI has no meaning
/// without a positive basis.
pub fn summarize(
    trades: &[RealizedTrade],
    start_equity: f64,
) -> Result<PerformanceSummary, DcalabError> {
    if !start_equity.is_finite() || start_equity <= 0.0 {
        return Err(DcalabError::config(
            "start_equity",
            "must be a positive finite number",
        ));
    }

    let mut equity = start_equity;
    let mut peak = start_equity;
    let mut max_dd = 0.0_f64;

    for trade in trades {
        equity += trade.net_pnl;
        if equity > peak {
            peak = equity;
        }
        let dd = (equity / peak - 1.0) * 100.0;
        if dd < max_dd {
            max_dd = dd;
        }
    }

    Ok(PerformanceSummary {
        roi_pct: (equity / start_equity - 1.0) * 100.0,
        max_drawdown_pct: max_dd,
    })
}

/// The equity curve behind [`summarize`]: one point per trade, stamped with
/// the trade's timestamp.
pub fn equity_curve(trades: &[RealizedTrade], start_equity: f64) -> Vec<EquityPoint> {
    let mut equity = start_equity;
    trades
        .iter()
        .map(|trade| {
            equity += trade.net_pnl;
            EquityPoint {
                ts: trade.ts,
                equity,
            }
        })
        .collect()
}

/// Win/loss statistics over a realized trade list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeStats {
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl TradeStats {
    pub fn compute(trades: &[RealizedTrade]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades {
            let pnl = trade.net_pnl;
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                if pnl > largest_win {
                    largest_win = pnl;
                }
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                if pnl.abs() > largest_loss {
                    largest_loss = pnl.abs();
                }
            } else {
                trades_breakeven += 1;
            }
        }

        let total_trades = trades_won + trades_lost + trades_breakeven;
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };

        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        TradeStats {
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
        }
    }
}
