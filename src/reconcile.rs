//! FIFO fill reconciliation.
//!
//! Replays a raw fill stream in time order, matching each fill against the
//! oldest resting opposite-side inventory, and emits one realized round-trip
//! trade whenever the net position returns to zero or flips sign.

use std::collections::VecDeque;

use crate::error::{DcalabError, FillRejection};
use crate::fill::{Fill, Side};

/// Sizes at or below this are treated as fully consumed. Matched quantities
/// accumulate float error over long histories; an exact zero test would leave
/// phantom dust legs in the queue.
const SIZE_EPS: f64 = 1e-9;

/// Direction of a closed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TradeSide {
    Long,
    Short,
}

/// A realized round-trip trade: everything accumulated between two moments
/// the position was flat (or flipped).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealizedTrade {
    pub ts: i64,
    pub side: TradeSide,
    pub net_pnl: f64,
}

/// Result of a reconciliation run. `rejected` lists every malformed fill with
/// its input index; the run continues past them but never hides them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reconciliation {
    pub trades: Vec<RealizedTrade>,
    pub total_net: f64,
    pub rejected: Vec<FillRejection>,
}

/// An unmatched (or partially matched) inventory chunk resting in the queue.
#[derive(Debug, Clone)]
struct Leg {
    side: Side,
    remaining_size: f64,
    price: f64,
    remaining_fee: f64,
}

/// Net signed position implied by the queue: buy remainders minus sell
/// remainders. Recomputed after every fill instead of incrementally updated,
/// so float drift cannot accumulate across a long history.
fn signed_position(queue: &VecDeque<Leg>) -> f64 {
    queue
        .iter()
        .map(|leg| match leg.side {
            Side::Buy => leg.remaining_size,
            Side::Sell => -leg.remaining_size,
        })
        .sum()
}

/// Reconstruct realized round-trip trades from a raw fill stream.
///
/// Only `status == "filled"` records participate. Participants failing
/// validation (bad size, price, or missing timestamps) are reported in
/// [`Reconciliation::rejected`] and skipped. Fills are stably sorted by
/// effective timestamp, ties kept in input order. Pure: identical input
/// always yields identical output.
pub fn reconcile(fills: &[Fill], fee_rate: f64) -> Result<Reconciliation, DcalabError> {
    if !fee_rate.is_finite() || fee_rate < 0.0 {
        return Err(DcalabError::config(
            "fee_rate",
            "must be a non-negative finite number",
        ));
    }

    let mut rejected = Vec::new();
    let mut ordered: Vec<(i64, &Fill)> = Vec::new();
    for (index, fill) in fills.iter().enumerate() {
        if !fill.is_filled() {
            continue;
        }
        match fill.validate(index) {
            Err(rejection) => rejected.push(rejection),
            Ok(()) => {
                if let Some(ts) = fill.effective_ts() {
                    ordered.push((ts, fill));
                }
            }
        }
    }
    ordered.sort_by_key(|&(ts, _)| ts);

    let mut queue: VecDeque<Leg> = VecDeque::new();
    let mut trades = Vec::new();
    let mut total_net = 0.0;
    let mut acc = 0.0;
    let mut pos = 0.0_f64;

    for (ts, fill) in ordered {
        let pre_pos = pos;
        let mut remaining = fill.size;

        // Consume opposite-side inventory oldest-first.
        while remaining > SIZE_EPS {
            let Some(head) = queue.front_mut() else { break };
            if head.side == fill.side {
                break;
            }
            let q = remaining.min(head.remaining_size);
            let gross = match fill.side {
                Side::Sell => (fill.price - head.price) * q,
                Side::Buy => (head.price - fill.price) * q,
            };
            let entry_fee_portion = head.remaining_fee * (q / head.remaining_size);
            let exit_fee = fill.price * q * fee_rate;
            let net = gross - entry_fee_portion - exit_fee;
            acc += net;
            total_net += net;

            head.remaining_size -= q;
            head.remaining_fee -= entry_fee_portion;
            remaining -= q;
            if head.remaining_size <= SIZE_EPS {
                queue.pop_front();
            }
        }

        // Whatever the fill could not close opens new inventory at the tail.
        if remaining > SIZE_EPS {
            queue.push_back(Leg {
                side: fill.side,
                remaining_size: remaining,
                price: fill.price,
                remaining_fee: fill.price * remaining * fee_rate,
            });
        }

        pos = signed_position(&queue);

        let was_open = pre_pos.abs() > SIZE_EPS;
        let now_flat = pos.abs() <= SIZE_EPS;
        let flipped = !now_flat && pos.signum() != pre_pos.signum();
        if was_open && (now_flat || flipped) {
            trades.push(RealizedTrade {
                ts,
                side: if pre_pos > 0.0 {
                    TradeSide::Long
                } else {
                    TradeSide::Short
                },
                net_pnl: acc,
            });
            acc = 0.0;
        }
    }

    Ok(Reconciliation {
        trades,
        total_net,
        rejected,
    })
}
