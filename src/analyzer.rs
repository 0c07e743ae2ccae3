//! Wallet history orchestration
//!
//! Pages a wallet's recent signatures in fixed-size batches, fetches each
//! batch concurrently, and reduces the results to `TransactionAnalysis`
//! records sorted newest-first. A failed or missing individual transaction
//! drops that item; only address parsing and signature listing abort the run.

use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::classifier::{self, TxCategory};
use crate::rpc::{LedgerClient, SignatureInfo, TransactionRecord};

/// Transactions fetched per concurrent batch.
pub const BATCH_SIZE: usize = 10;
/// Cooperative delay between batches, to stay under RPC rate limits.
pub const BATCH_DELAY: Duration = Duration::from_millis(200);
/// Account keys retained per analysis record.
const MAX_ACCOUNTS: usize = 5;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("invalid wallet address")]
    InvalidAddress,
    #[error("rpc error: {0}")]
    Rpc(String),
}

/// One analyzed transaction, the pipeline's canonical output unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalysis {
    pub signature: String,
    pub block_time: i64,
    pub slot: u64,
    pub success: bool,
    /// Fee in lamports
    pub fee: u64,
    pub instructions: usize,
    #[serde(rename = "type")]
    pub tx_type: TxCategory,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// First five account keys, in message order
    pub accounts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionAnalysis {
    /// Copy-on-write narrative attach. The pre-enrichment record is left
    /// untouched so callers can fall back to it wholesale.
    pub fn with_narrative(&self, narrative: Option<String>) -> Self {
        Self {
            narrative,
            ..self.clone()
        }
    }
}

/// Fetch and analyze up to `limit` recent transactions for a wallet.
pub async fn analyze_wallet<C: LedgerClient>(
    client: &C,
    address: &str,
    limit: usize,
) -> Result<Vec<TransactionAnalysis>, AnalyzeError> {
    let pubkey = address
        .parse::<Pubkey>()
        .map_err(|_| AnalyzeError::InvalidAddress)?;

    let signatures = client
        .recent_signatures(&pubkey, limit)
        .await
        .map_err(|e| AnalyzeError::Rpc(e.to_string()))?;

    if signatures.is_empty() {
        return Ok(Vec::new());
    }

    let total = signatures.len();
    let mut transactions = Vec::with_capacity(total);

    for (i, batch) in signatures.chunks(BATCH_SIZE).enumerate() {
        let fetches = batch
            .iter()
            .map(|sig| client.fetch_transaction(&sig.signature));
        let results = join_all(fetches).await;

        for (sig, result) in batch.iter().zip(results) {
            match result {
                Ok(Some(record)) => {
                    tracing::debug!("fetched {} at slot {}", record.signature, record.slot);
                    transactions.push(build_analysis(sig, &record));
                }
                // Not found / not finalized: skip silently
                Ok(None) => {}
                Err(e) => {
                    // One bad transaction never aborts the run
                    tracing::warn!("fetch failed for {}: {}", sig.signature, e);
                }
            }
        }

        if i * BATCH_SIZE + BATCH_SIZE < total {
            tokio::time::sleep(BATCH_DELAY).await;
        }
    }

    // Stable sort: equal or missing block times keep fetch order
    transactions.sort_by(|a, b| b.block_time.cmp(&a.block_time));

    Ok(transactions)
}

fn build_analysis(sig: &SignatureInfo, record: &TransactionRecord) -> TransactionAnalysis {
    let category = classifier::classify(record);
    let success = record.err.is_none();

    // The signature listing carries the error in wire form; fall back to the
    // record's meta err when the listing omitted it
    let error = if success {
        None
    } else {
        sig.err
            .as_ref()
            .or(record.err.as_ref())
            .map(|e| e.to_string())
    };

    let mut accounts = record.account_keys.clone();
    accounts.truncate(MAX_ACCOUNTS);

    TransactionAnalysis {
        signature: record.signature.clone(),
        // The listing is authoritative for block time; fall back to the
        // record when the listing omitted it, else 0
        block_time: sig.block_time.or(record.block_time).unwrap_or(0),
        slot: sig.slot,
        success,
        fee: record.fee,
        instructions: record.instructions,
        tx_type: category,
        description: classifier::describe(record, category),
        narrative: None,
        accounts,
        error,
    }
}
