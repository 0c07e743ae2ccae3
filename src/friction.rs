//! Friction metrics aggregation
//!
//! Pure reductions over an analysis list. Both entry points are total:
//! empty input yields all-zero metrics rather than an error.

use std::collections::HashMap;

use serde::Serialize;
use solana_sdk::native_token::lamports_to_sol;

use crate::analyzer::TransactionAnalysis;

/// Failure reason used when a failed transaction carried no error string.
const UNKNOWN_ERROR: &str = "Unknown Error";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrictionMetrics {
    /// Percentage of successful transactions, 0-100
    pub success_rate: f64,
    /// Mean instruction count per transaction
    pub avg_complexity: f64,
    /// Total fees in SOL
    pub total_cost: f64,
    /// Error string (or "Unknown Error") -> occurrence count
    pub failure_reasons: HashMap<String, u64>,
}

/// Headline stats for the response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStats {
    pub total_transactions: usize,
    pub success_rate: f64,
    /// Total fees in lamports
    pub total_fees: u64,
    pub avg_fee: f64,
    pub avg_instructions: f64,
    pub failed_transactions: usize,
}

/// Reduce an analysis list to friction metrics.
pub fn aggregate(transactions: &[TransactionAnalysis]) -> FrictionMetrics {
    if transactions.is_empty() {
        return FrictionMetrics {
            success_rate: 0.0,
            avg_complexity: 0.0,
            total_cost: 0.0,
            failure_reasons: HashMap::new(),
        };
    }

    let total = transactions.len() as f64;
    let success_count = transactions.iter().filter(|tx| tx.success).count() as f64;
    let total_fees: u64 = transactions.iter().map(|tx| tx.fee).sum();
    let total_instructions: usize = transactions.iter().map(|tx| tx.instructions).sum();

    let mut failure_reasons: HashMap<String, u64> = HashMap::new();
    for tx in transactions.iter().filter(|tx| !tx.success) {
        let reason = tx
            .error
            .clone()
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        *failure_reasons.entry(reason).or_insert(0) += 1;
    }

    FrictionMetrics {
        success_rate: (success_count / total) * 100.0,
        avg_complexity: total_instructions as f64 / total,
        total_cost: lamports_to_sol(total_fees),
        failure_reasons,
    }
}

/// Build the stats block shown alongside the metrics.
pub fn wallet_stats(
    transactions: &[TransactionAnalysis],
    metrics: &FrictionMetrics,
) -> WalletStats {
    let total_fees: u64 = transactions.iter().map(|tx| tx.fee).sum();
    let avg_fee = if transactions.is_empty() {
        0.0
    } else {
        total_fees as f64 / transactions.len() as f64
    };

    WalletStats {
        total_transactions: transactions.len(),
        success_rate: metrics.success_rate,
        total_fees,
        avg_fee,
        avg_instructions: metrics.avg_complexity,
        failed_transactions: transactions.iter().filter(|tx| !tx.success).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TxCategory;

    fn tx(success: bool, fee: u64, instructions: usize, error: Option<&str>) -> TransactionAnalysis {
        TransactionAnalysis {
            signature: "sig".to_string(),
            block_time: 0,
            slot: 0,
            success,
            fee,
            instructions,
            tx_type: TxCategory::Transfer,
            description: String::new(),
            narrative: None,
            accounts: vec![],
            error: error.map(String::from),
        }
    }

    #[test]
    fn test_empty_input_yields_zero_metrics() {
        let metrics = aggregate(&[]);
        assert_eq!(metrics.success_rate, 0.0);
        assert_eq!(metrics.avg_complexity, 0.0);
        assert_eq!(metrics.total_cost, 0.0);
        assert!(metrics.failure_reasons.is_empty());
    }

    #[test]
    fn test_success_rate_in_range_and_exact() {
        let txs = vec![
            tx(true, 5000, 1, None),
            tx(true, 5000, 1, None),
            tx(true, 5000, 1, None),
            tx(false, 5000, 1, Some("A")),
        ];
        let metrics = aggregate(&txs);
        assert_eq!(metrics.success_rate, 75.0);
        assert!((0.0..=100.0).contains(&metrics.success_rate));
    }

    #[test]
    fn test_avg_complexity_reconstructs_total_instructions() {
        let txs = vec![
            tx(true, 0, 3, None),
            tx(true, 0, 5, None),
            tx(true, 0, 1, None),
        ];
        let metrics = aggregate(&txs);
        let reconstructed = metrics.avg_complexity * txs.len() as f64;
        assert!((reconstructed - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_cost_converts_lamports_to_sol() {
        let txs = vec![tx(true, 1_500_000_000, 1, None), tx(true, 500_000_000, 1, None)];
        let metrics = aggregate(&txs);
        assert!((metrics.total_cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_failure_reasons_grouped_by_error() {
        let txs = vec![
            tx(false, 0, 1, Some("A")),
            tx(false, 0, 1, Some("A")),
            tx(false, 0, 1, Some("B")),
            tx(true, 0, 1, None),
        ];
        let metrics = aggregate(&txs);
        assert_eq!(metrics.failure_reasons.len(), 2);
        assert_eq!(metrics.failure_reasons["A"], 2);
        assert_eq!(metrics.failure_reasons["B"], 1);
    }

    #[test]
    fn test_failure_without_error_counts_as_unknown() {
        let txs = vec![tx(false, 0, 1, None)];
        let metrics = aggregate(&txs);
        assert_eq!(metrics.failure_reasons[UNKNOWN_ERROR], 1);
    }

    #[test]
    fn test_wallet_stats_totals() {
        let txs = vec![
            tx(true, 4000, 2, None),
            tx(false, 6000, 4, Some("A")),
        ];
        let metrics = aggregate(&txs);
        let stats = wallet_stats(&txs, &metrics);
        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.total_fees, 10_000);
        assert_eq!(stats.avg_fee, 5000.0);
        assert_eq!(stats.avg_instructions, 3.0);
        assert_eq!(stats.failed_transactions, 1);
        assert_eq!(stats.success_rate, 50.0);
    }

    #[test]
    fn test_wallet_stats_empty() {
        let metrics = aggregate(&[]);
        let stats = wallet_stats(&[], &metrics);
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.avg_fee, 0.0);
    }
}
