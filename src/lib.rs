//! dcalab — deterministic strategy-evaluation core.
//!
//! Three pure, synchronous components: a FIFO fill-reconciliation engine
//! ([`reconcile`]), a dollar-cost-averaging position simulator
//! ([`simulate`]), and a performance aggregator ([`metrics`]). Each is a
//! plain fold over already-materialized data — no I/O, no clock, no shared
//! state — so the calling layer decides when to re-invoke them as new fills
//! or candles arrive.

pub mod candle;
pub mod error;
pub mod fill;
pub mod metrics;
pub mod reconcile;
pub mod simulate;

pub use candle::Candle;
pub use error::{DcalabError, FillRejection};
pub use fill::{Fill, Side};
pub use metrics::{EquityPoint, PerformanceSummary, TradeStats, equity_curve, summarize};
pub use reconcile::{RealizedTrade, Reconciliation, TradeSide, reconcile};
pub use simulate::{DcaParams, SimTrade, SimulationResult, TradeMarker, markers, simulate};
