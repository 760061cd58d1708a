//! Raw order-fill records.

use crate::error::FillRejection;

/// Order direction, shared by fills and simulated trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// An executed-order event as reported by the exchange. Only records with
/// `status == "filled"` participate in reconciliation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fill {
    pub side: Side,
    pub size: f64,
    pub price: f64,
    pub status: String,
    pub filled_ts_ms: Option<i64>,
    pub created_ts_ms: Option<i64>,
}

impl Fill {
    pub fn is_filled(&self) -> bool {
        self.status == "filled"
    }

    /// The timestamp used for ordering: fill time, falling back to creation
    /// time for venues that only stamp order creation.
    pub fn effective_ts(&self) -> Option<i64> {
        self.filled_ts_ms.or(self.created_ts_ms)
    }

    /// Validate a filled record before it enters the matching pass.
    ///
    /// A malformed participant would corrupt position and PnL accounting, so
    /// each violation is reported with the record's index rather than dropped.
    pub(crate) fn validate(&self, index: usize) -> Result<(), FillRejection> {
        let reject = |reason: &str| FillRejection {
            index,
            reason: reason.to_string(),
        };
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(reject("size must be a positive finite number"));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(reject("price must be a positive finite number"));
        }
        if self.effective_ts().is_none() {
            return Err(reject("fill has neither filled_ts_ms nor created_ts_ms"));
        }
        Ok(())
    }
}
