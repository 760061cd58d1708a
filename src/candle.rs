//! OHLCV candle representation.

use chrono::{DateTime, Utc};

/// One OHLCV bar. Timestamps are epoch milliseconds; the series a caller
/// passes in must be strictly ordered by `open_time` with unique open times.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candle {
    pub open_time: i64,
    pub close_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.open_time)
    }

    pub fn close_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.close_time)
    }
}

/// Check that `open_time` is strictly increasing, returning the index of the
/// first offending candle.
pub(crate) fn first_unordered(candles: &[Candle]) -> Option<usize> {
    candles
        .windows(2)
        .position(|w| w[1].open_time <= w[0].open_time)
        .map(|i| i + 1)
}
