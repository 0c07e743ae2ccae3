//! Solana RPC adapter for wallet transaction history
//!
//! Wraps the nonblocking RpcClient at Confirmed commitment. Transactions are
//! fetched as raw JSON via getTransaction (maxSupportedTransactionVersion 0)
//! and reduced here to the fields the analysis pipeline consumes - no
//! instruction decoding.

use anyhow::Result;
use serde_json::{json, Value};
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_client::GetConfirmedSignaturesForAddress2Config,
    rpc_request::RpcRequest,
};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
    signature::Signature,
};

/// One entry from getSignaturesForAddress, newest first.
#[derive(Debug, Clone)]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    /// Structured transaction error from the signature listing, if any
    pub err: Option<Value>,
}

/// A raw transaction record, reduced from the getTransaction JSON.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    /// meta.err - None means the transaction succeeded
    pub err: Option<Value>,
    /// Fee in lamports
    pub fee: u64,
    /// Top-level instruction count
    pub instructions: usize,
    /// Static account keys, in message order
    pub account_keys: Vec<String>,
    /// meta.logMessages - an absent field stays None, distinct from an
    /// empty log list
    pub log_messages: Option<Vec<String>>,
}

/// The RPC surface the orchestrator consumes. `WalletRpc` is the live
/// implementation; tests substitute fakes.
pub trait LedgerClient {
    async fn recent_signatures(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>>;

    async fn fetch_transaction(&self, signature: &str) -> Result<Option<TransactionRecord>>;
}

pub struct WalletRpc {
    connection: RpcClient,
}

impl WalletRpc {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        let url = rpc_url.into();
        let url = if url.starts_with("http") {
            url
        } else {
            format!("https://{}", url)
        };

        let connection = RpcClient::new_with_commitment(
            url,
            CommitmentConfig {
                commitment: CommitmentLevel::Confirmed,
            },
        );

        Self { connection }
    }
}

impl LedgerClient for WalletRpc {
    async fn recent_signatures(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        let sigs = self
            .connection
            .get_signatures_for_address_with_config(
                address,
                GetConfirmedSignaturesForAddress2Config {
                    before: None,
                    until: None,
                    limit: Some(limit),
                    commitment: Some(CommitmentConfig {
                        commitment: CommitmentLevel::Confirmed,
                    }),
                },
            )
            .await?;

        Ok(sigs
            .into_iter()
            .map(|s| SignatureInfo {
                signature: s.signature,
                slot: s.slot,
                block_time: s.block_time,
                err: s.err.and_then(|e| serde_json::to_value(e).ok()),
            })
            .collect())
    }

    async fn fetch_transaction(&self, signature: &str) -> Result<Option<TransactionRecord>> {
        let sig = signature
            .parse::<Signature>()
            .map_err(|e| anyhow::anyhow!("Invalid signature: {}", e))?;

        let params = json!([
            sig.to_string(),
            {
                "encoding": "json",
                "commitment": "confirmed",
                "maxSupportedTransactionVersion": 0
            }
        ]);

        let result: Result<Value, _> = self.connection.send(RpcRequest::GetTransaction, params).await;

        let tx_json = match result {
            Ok(v) => v,
            Err(e) => {
                let msg = e.to_string();
                // Not-found and unsupported-version responses mean "no
                // record at this commitment", not a failed call
                if msg.contains("not found") || msg.contains("Transaction version") {
                    return Ok(None);
                }
                return Err(e.into());
            }
        };

        // null response means the transaction was not found
        if tx_json.is_null() {
            return Ok(None);
        }

        Ok(Some(parse_transaction_record(signature, &tx_json)))
    }
}

/// Reduce a raw getTransaction response to a `TransactionRecord`.
fn parse_transaction_record(signature: &str, tx: &Value) -> TransactionRecord {
    let slot = tx.get("slot").and_then(|s| s.as_u64()).unwrap_or(0);
    let block_time = tx.get("blockTime").and_then(|t| t.as_i64());

    let meta = &tx["meta"];
    let err = match &meta["err"] {
        Value::Null => None,
        v => Some(v.clone()),
    };
    let fee = meta["fee"].as_u64().unwrap_or(0);

    let log_messages = meta
        .get("logMessages")
        .and_then(|v| v.as_array())
        .map(|lines| {
            lines
                .iter()
                .filter_map(|l| l.as_str().map(String::from))
                .collect()
        });

    let instructions = tx["transaction"]["message"]["instructions"]
        .as_array()
        .map(|a| a.len())
        .unwrap_or(0);

    let account_keys = parse_account_keys(&tx["transaction"]["message"]["accountKeys"]);

    TransactionRecord {
        signature: signature.to_string(),
        slot,
        block_time,
        err,
        fee,
        instructions,
        account_keys,
        log_messages,
    }
}

/// Extract account pubkeys from `accountKeys`.
///
/// Format can be either:
/// - Array of pubkey strings
/// - Array of objects with a "pubkey" field
fn parse_account_keys(keys: &Value) -> Vec<String> {
    let mut accounts = Vec::new();

    if let Some(keys) = keys.as_array() {
        for key in keys {
            if let Some(pubkey) = key["pubkey"].as_str() {
                // Object format: { "pubkey": "..." }
                accounts.push(pubkey.to_string());
            } else if let Some(pubkey) = key.as_str() {
                // String format: "..."
                accounts.push(pubkey.to_string());
            }
        }
    }

    accounts
}
