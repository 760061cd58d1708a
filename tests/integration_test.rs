//! End-to-end scenarios across the three components:
//! - fill reconciliation round trips, partial closes, and sign flips
//! - the aggregator fold over a known trade list
//! - the simulate → round-trip → summarize pipeline
//! - reconcile → summarize on the same fill stream

mod common;

use approx::assert_relative_eq;
use common::*;
use dcalab::{
    DcaParams, Side, TradeSide, TradeStats, equity_curve, markers, reconcile, simulate, summarize,
};

mod reconciliation_scenarios {
    use super::*;

    #[test]
    fn simple_round_trip() {
        let fills = vec![
            make_fill(Side::Buy, 1.0, 100.0, 0),
            make_fill(Side::Sell, 1.0, 110.0, 10),
        ];
        let result = reconcile(&fills, 0.0).unwrap();

        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].side, TradeSide::Long);
        assert_relative_eq!(result.trades[0].net_pnl, 10.0);
        assert_relative_eq!(result.total_net, 10.0);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn partial_closes_across_two_sells() {
        let fills = vec![
            make_fill(Side::Buy, 2.0, 100.0, 0),
            make_fill(Side::Sell, 1.0, 90.0, 5),
            make_fill(Side::Sell, 1.0, 120.0, 10),
        ];
        let result = reconcile(&fills, 0.0).unwrap();

        // Position returns to zero only after the second sell.
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].ts, 10);
        assert_relative_eq!(result.trades[0].net_pnl, 10.0);
    }

    #[test]
    fn sign_flip_in_one_fill() {
        let fills = vec![
            make_fill(Side::Buy, 1.0, 100.0, 0),
            make_fill(Side::Sell, 2.0, 90.0, 5),
        ];
        let result = reconcile(&fills, 0.0).unwrap();

        // The matched unit closes the long at a loss; the leftover opens a
        // short that stays unrealized.
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].side, TradeSide::Long);
        assert_relative_eq!(result.trades[0].net_pnl, -10.0);
        assert_relative_eq!(result.total_net, -10.0);
    }

    #[test]
    fn determinism_repeated_runs() {
        let fills = vec![
            make_fill(Side::Buy, 1.5, 100.0, 0),
            make_fill(Side::Sell, 2.0, 105.0, 3),
            make_fill(Side::Buy, 0.5, 95.0, 7),
        ];
        let first = reconcile(&fills, 0.0025).unwrap();
        let second = reconcile(&fills, 0.0025).unwrap();
        assert_eq!(first, second);
    }
}

mod aggregator_scenarios {
    use super::*;
    use dcalab::RealizedTrade;

    fn trades() -> Vec<RealizedTrade> {
        [(0, 10.0), (1, -30.0), (2, 25.0)]
            .iter()
            .map(|&(ts, net_pnl)| RealizedTrade {
                ts,
                side: TradeSide::Long,
                net_pnl,
            })
            .collect()
    }

    #[test]
    fn known_equity_sequence() {
        let summary = summarize(&trades(), 1_000.0).unwrap();

        assert_relative_eq!(summary.roi_pct, 0.5, max_relative = 1e-9);
        assert_relative_eq!(
            summary.max_drawdown_pct,
            (980.0 / 1010.0 - 1.0) * 100.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn curve_matches_summary_fold() {
        let curve = equity_curve(&trades(), 1_000.0);
        assert_eq!(curve.len(), 3);
        assert_relative_eq!(curve[0].equity, 1_010.0);
        assert_relative_eq!(curve[1].equity, 980.0);
        assert_relative_eq!(curve[2].equity, 1_005.0);
    }

    #[test]
    fn stats_over_same_trades() {
        let stats = TradeStats::compute(&trades());
        assert_eq!(stats.trades_won, 2);
        assert_eq!(stats.trades_lost, 1);
        assert_relative_eq!(stats.largest_win, 25.0);
        assert_relative_eq!(stats.largest_loss, 30.0);
    }
}

mod pipelines {
    use super::*;

    #[test]
    fn simulation_feeds_aggregator() {
        // Entry at 100, DCA add at 94, take profit at 111.
        let candles = make_candles(&[100.0, 94.0, 111.0]);
        let result = simulate(&candles, &sample_params()).unwrap();
        assert!(result.closed);

        let trade = result.round_trip().unwrap();
        let summary = summarize(&[trade], 10_000.0).unwrap();

        assert!(summary.roi_pct > 0.0);
        // A single winning trade never dips below its peak.
        assert_relative_eq!(summary.max_drawdown_pct, 0.0);
    }

    #[test]
    fn reconciliation_feeds_aggregator() {
        let fills = vec![
            make_fill(Side::Buy, 1.0, 100.0, 0),
            make_fill(Side::Sell, 1.0, 110.0, 1),
            make_fill(Side::Buy, 2.0, 105.0, 2),
            make_fill(Side::Sell, 2.0, 95.0, 3),
            make_fill(Side::Buy, 1.0, 90.0, 4),
            make_fill(Side::Sell, 1.0, 99.0, 5),
        ];
        let reconciliation = reconcile(&fills, 0.0).unwrap();
        assert_eq!(reconciliation.trades.len(), 3);

        let summary = summarize(&reconciliation.trades, 1_000.0).unwrap();
        // +10, -20, +9 over 1000.
        assert_relative_eq!(summary.roi_pct, -0.1, max_relative = 1e-9);
        assert!(summary.max_drawdown_pct < 0.0);

        let sum: f64 = reconciliation.trades.iter().map(|t| t.net_pnl).sum();
        assert_relative_eq!(sum, reconciliation.total_net, max_relative = 1e-9);
    }

    #[test]
    fn simulation_markers_for_display() {
        let candles = make_candles(&[100.0, 94.0, 111.0]);
        let result = simulate(&candles, &sample_params()).unwrap();
        let markers = markers(&result.trades);

        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].side, Side::Buy);
        assert_eq!(markers[2].side, Side::Sell);
        assert_relative_eq!(markers[2].price, 111.0);
    }

    #[test]
    fn open_simulation_yields_no_round_trip() {
        let candles = make_candles(&[100.0, 99.0]);
        let result = simulate(&candles, &sample_params()).unwrap();
        assert!(!result.closed);
        assert!(result.round_trip().is_none());
    }

    #[test]
    fn config_errors_are_fatal_before_any_work() {
        let candles = make_candles(&[100.0, 111.0]);
        let params = DcaParams {
            max_legs: 0,
            ..sample_params()
        };
        assert!(simulate(&candles, &params).is_err());
        assert!(summarize(&[], -1.0).is_err());
        assert!(reconcile(&[], -0.5).is_err());
    }
}
