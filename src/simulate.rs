//! DCA position simulator.
//!
//! Replays a candle series under a fixed dollar-cost-averaging policy:
//! open at the first candle, scale into weakness in bounded compounding
//! legs, exit on a profit target, a trailing stop once the target has been
//! touched, or a holding-time cap.

use crate::candle::{Candle, first_unordered};
use crate::error::DcalabError;
use crate::fill::Side;
use crate::reconcile::{RealizedTrade, TradeSide};

/// Strategy parameters. Ratio/percentage fields are fractions (`0.05` = 5%).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DcaParams {
    /// Notional of the first leg.
    pub base_notional: f64,
    /// Each additional leg's notional is `base_notional * add_ratio^legs_used`.
    pub add_ratio: f64,
    /// Hard cap on legs, first entry included.
    pub max_legs: u32,
    /// Minimum seconds between consecutive legs.
    pub cooldown_sec: u64,
    /// Minimum drop from the last leg's fill price before adding.
    pub min_price_move_pct: f64,
    /// Taker fee charged on every leg's notional.
    pub fee_rate: f64,
    /// Fixed profit target above the average entry.
    pub take_profit_pct: f64,
    /// Pullback from the post-target peak that triggers the exit; 0 exits at
    /// the target itself.
    pub trailing_take_profit_pct: f64,
    /// Force-liquidate once the position has been held longer than this many
    /// bars; 0 disables the time stop.
    pub max_holding_bars: u32,
}

impl DcaParams {
    pub fn validate(&self) -> Result<(), DcalabError> {
        if !self.base_notional.is_finite() || self.base_notional <= 0.0 {
            return Err(DcalabError::config("base_notional", "must be positive"));
        }
        if !self.add_ratio.is_finite() || self.add_ratio < 0.0 {
            return Err(DcalabError::config("add_ratio", "must be non-negative"));
        }
        if self.max_legs < 1 {
            return Err(DcalabError::config("max_legs", "must be at least 1"));
        }
        if !self.min_price_move_pct.is_finite() || self.min_price_move_pct < 0.0 {
            return Err(DcalabError::config(
                "min_price_move_pct",
                "must be non-negative",
            ));
        }
        if !self.fee_rate.is_finite() || self.fee_rate < 0.0 {
            return Err(DcalabError::config("fee_rate", "must be non-negative"));
        }
        if !self.take_profit_pct.is_finite() || self.take_profit_pct <= 0.0 {
            return Err(DcalabError::config("take_profit_pct", "must be positive"));
        }
        if !self.trailing_take_profit_pct.is_finite() || self.trailing_take_profit_pct < 0.0 {
            return Err(DcalabError::config(
                "trailing_take_profit_pct",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

/// One simulated order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTrade {
    pub ts: i64,
    pub side: Side,
    pub price: f64,
    pub qty: f64,
    pub notional: f64,
    pub fee: f64,
    pub note: String,
}

/// Chart-marker projection of a simulated trade.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeMarker {
    pub time: i64,
    pub side: Side,
    pub price: f64,
}

/// Outcome of a simulation run. When the series ends with the position still
/// open, `closed` is false and the open position is reported as-is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    pub trades: Vec<SimTrade>,
    pub realized_pnl: f64,
    pub realized_roi: f64,
    pub total_fees: f64,
    pub closed: bool,
    pub avg_entry: f64,
    pub position_qty: f64,
    pub position_cost: f64,
}

impl SimulationResult {
    /// A closed simulation collapsed to one realized round trip, in the shape
    /// the performance aggregator consumes. `None` while still open.
    pub fn round_trip(&self) -> Option<RealizedTrade> {
        if !self.closed {
            return None;
        }
        let exit = self.trades.iter().rev().find(|t| t.side == Side::Sell)?;
        Some(RealizedTrade {
            ts: exit.ts,
            side: TradeSide::Long,
            net_pnl: self.realized_pnl,
        })
    }
}

/// Project trades to display markers. Stateless; the display layer decides
/// what to do with them.
pub fn markers(trades: &[SimTrade]) -> Vec<TradeMarker> {
    trades
        .iter()
        .map(|t| TradeMarker {
            time: t.ts,
            side: t.side,
            price: t.price,
        })
        .collect()
}

/// Record a buy leg and return its `(qty, fee)`.
fn open_leg(
    trades: &mut Vec<SimTrade>,
    ts: i64,
    price: f64,
    notional: f64,
    fee_rate: f64,
    note: String,
) -> (f64, f64) {
    let qty = notional / price;
    let fee = notional * fee_rate;
    trades.push(SimTrade {
        ts,
        side: Side::Buy,
        price,
        qty,
        notional,
        fee,
        note,
    });
    (qty, fee)
}

/// Replay `candles` under `params`.
///
/// All executions happen at the candle close; a new leg is armed off the
/// *last leg's* fill price, not the running average. Candles must be strictly
/// ordered by open time. Pure: no clock, no randomness.
pub fn simulate(candles: &[Candle], params: &DcaParams) -> Result<SimulationResult, DcalabError> {
    params.validate()?;
    if let Some(index) = first_unordered(candles) {
        return Err(DcalabError::UnorderedCandles { index });
    }

    let mut trades: Vec<SimTrade> = Vec::new();
    let mut total_fees = 0.0;
    let mut position_qty = 0.0;
    let mut position_cost = 0.0;
    let mut avg_entry = 0.0;
    let mut legs_used = 0u32;
    let mut last_leg_price = 0.0;
    let mut last_leg_ts = 0i64;
    let mut entry_index = 0usize;
    let mut tp_armed = false;
    let mut peak_since_arm = 0.0;
    let mut closed = false;
    let mut realized_pnl = 0.0;
    let mut realized_roi = 0.0;

    let cooldown_ms = params.cooldown_sec as i64 * 1000;
    let trailing_enabled = params.trailing_take_profit_pct > 0.0;

    for (i, candle) in candles.iter().enumerate() {
        let close = candle.close;
        let ts = candle.close_time;

        // 1. Entry: first leg at the candle close.
        if legs_used == 0 {
            let (qty, fee) = open_leg(
                &mut trades,
                ts,
                close,
                params.base_notional,
                params.fee_rate,
                "entry".to_string(),
            );
            total_fees += fee;
            position_qty += qty;
            position_cost += params.base_notional;
            avg_entry = position_cost / position_qty;
            legs_used = 1;
            last_leg_price = close;
            last_leg_ts = ts;
            entry_index = i;
        }

        // 2. Scale-in: armed off the last leg's fill price, gated by the
        // cooldown. Runs on the entry candle too; with degenerate zero
        // thresholds that means an immediate add.
        if legs_used < params.max_legs {
            let price_drop = (last_leg_price - close) / last_leg_price;
            let elapsed_ms = ts - last_leg_ts;
            if price_drop >= params.min_price_move_pct && elapsed_ms >= cooldown_ms {
                let notional = params.base_notional * params.add_ratio.powi(legs_used as i32);
                if notional > 0.0 {
                    let (qty, fee) = open_leg(
                        &mut trades,
                        ts,
                        close,
                        notional,
                        params.fee_rate,
                        format!("dca add {}", legs_used + 1),
                    );
                    total_fees += fee;
                    position_qty += qty;
                    position_cost += notional;
                    avg_entry = position_cost / position_qty;
                    legs_used += 1;
                    last_leg_price = close;
                    last_leg_ts = ts;
                }
            }
        }

        // 3. Exit evaluation: fixed target, then trailing once armed, then
        // the time stop.
        let target = avg_entry * (1.0 + params.take_profit_pct);
        let mut exit_note: Option<&str> = None;

        if close >= target {
            if !trailing_enabled {
                exit_note = Some("take profit");
            } else if !tp_armed {
                tp_armed = true;
                peak_since_arm = close;
            }
        }

        if exit_note.is_none() && trailing_enabled && tp_armed {
            if close > peak_since_arm {
                peak_since_arm = close;
            } else if close <= peak_since_arm * (1.0 - params.trailing_take_profit_pct) {
                exit_note = Some("trailing stop");
            }
        }

        if exit_note.is_none() && params.max_holding_bars > 0 {
            let bars_held = (i - entry_index) as u32;
            if bars_held > params.max_holding_bars {
                exit_note = Some("time stop");
            }
        }

        if let Some(note) = exit_note {
            let proceeds = position_qty * close;
            let exit_fee = proceeds * params.fee_rate;
            trades.push(SimTrade {
                ts,
                side: Side::Sell,
                price: close,
                qty: position_qty,
                notional: proceeds,
                fee: exit_fee,
                note: note.to_string(),
            });
            total_fees += exit_fee;
            realized_pnl = proceeds - position_cost - total_fees;
            realized_roi = realized_pnl / position_cost;
            position_qty = 0.0;
            position_cost = 0.0;
            closed = true;
            break;
        }
    }

    Ok(SimulationResult {
        trades,
        realized_pnl,
        realized_roi,
        total_fees,
        closed,
        avg_entry,
        position_qty,
        position_cost,
    })
}
