//! HTTP route handlers for the wallet-stats API

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::analyzer::{self, TransactionAnalysis};
use crate::app_error::AppError;
use crate::app_state::AppState;
use crate::friction::{self, FrictionMetrics, WalletStats};
use crate::narrator::NARRATIVE_MAX_COUNT;

const DEFAULT_LIMIT: usize = 50;

/// Base58 pubkeys encode to 32-44 characters; anything outside is rejected
/// before touching the RPC.
const MIN_ADDRESS_LEN: usize = 32;
const MAX_ADDRESS_LEN: usize = 44;

#[derive(Deserialize)]
pub struct AnalyzeParams {
    pub address: Option<String>,
    pub limit: Option<usize>,
    pub narrative: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAnalysisResponse {
    pub address: String,
    pub transactions: Vec<TransactionAnalysis>,
    pub stats: WalletStats,
    pub friction_metrics: FrictionMetrics,
}

/// GET /analyze?address=...&limit=50&narrative=true
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<WalletAnalysisResponse>, AppError> {
    let address = params
        .address
        .ok_or_else(|| AppError::BadRequest("Wallet address is required".to_string()))?;

    if !address_length_ok(&address) {
        return Err(AppError::BadRequest(
            "Invalid Solana address format".to_string(),
        ));
    }

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let with_narrative = params.narrative.as_deref() == Some("true");

    let mut transactions = analyzer::analyze_wallet(&state.rpc, &address, limit).await?;

    if with_narrative && !transactions.is_empty() {
        transactions = state
            .narrator
            .enrich_batch(transactions, NARRATIVE_MAX_COUNT)
            .await;
    }

    let friction_metrics = friction::aggregate(&transactions);
    let stats = friction::wallet_stats(&transactions, &friction_metrics);

    Ok(Json(WalletAnalysisResponse {
        address,
        transactions,
        stats,
        friction_metrics,
    }))
}

/// Coarse length-only pre-check; full validation happens when the adapter
/// parses the key.
fn address_length_ok(address: &str) -> bool {
    (MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&address.len())
}

/// Health check
pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_length_bounds() {
        assert!(!address_length_ok(""));
        assert!(!address_length_ok(&"x".repeat(31)));
        assert!(address_length_ok(&"x".repeat(32)));
        assert!(address_length_ok("7cVfgArCheMR6Cs4t6vz5rfnqd56vZq4ndaBrY5xkxXy"));
        assert!(address_length_ok(&"x".repeat(44)));
        assert!(!address_length_ok(&"x".repeat(45)));
    }
}
