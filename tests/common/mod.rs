#![allow(dead_code)]

use dcalab::{Candle, DcaParams, Fill, Side};

pub fn make_fill(side: Side, size: f64, price: f64, ts: i64) -> Fill {
    Fill {
        side,
        size,
        price,
        status: "filled".to_string(),
        filled_ts_ms: Some(ts),
        created_ts_ms: None,
    }
}

pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            open_time: i as i64 * 60_000,
            close_time: i as i64 * 60_000 + 59_999,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 100.0,
        })
        .collect()
}

pub fn sample_params() -> DcaParams {
    DcaParams {
        base_notional: 1_000.0,
        add_ratio: 1.5,
        max_legs: 4,
        cooldown_sec: 0,
        min_price_move_pct: 0.05,
        fee_rate: 0.0,
        take_profit_pct: 0.10,
        trailing_take_profit_pct: 0.0,
        max_holding_bars: 0,
    }
}
