//! AI narrative enrichment
//!
//! Talks to an OpenAI-compatible chat-completions endpoint to attach a short
//! narrative to the newest transactions. Enrichment is strictly best-effort:
//! missing configuration disables it silently, a failed request leaves that
//! narrative absent, and the whole batch races a fixed timeout that falls
//! back to the unenriched input.

use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use solana_sdk::native_token::lamports_to_sol;
use thiserror::Error;

use crate::analyzer::TransactionAnalysis;
use crate::config::NarratorConfig;

/// Narratives are generated for at most this many of the newest transactions.
pub const NARRATIVE_MAX_COUNT: usize = 10;
/// Whole-batch budget. On expiry the unenriched input is returned as-is,
/// discarding any narratives that had already completed.
pub const NARRATIVE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid completion response")]
    InvalidResponse,
}

#[derive(Clone)]
pub struct Narrator {
    client: Client,
    config: NarratorConfig,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl Narrator {
    pub fn new(config: NarratorConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Both an endpoint and a credential are required; anything less keeps
    /// enrichment off.
    pub fn is_enabled(&self) -> bool {
        self.config.base_url.is_some() && self.config.api_key.is_some()
    }

    /// Attach narratives to the first `max_count` transactions; the rest
    /// pass through untouched. Output always has the same length and order
    /// as the input.
    pub async fn enrich_batch(
        &self,
        transactions: Vec<TransactionAnalysis>,
        max_count: usize,
    ) -> Vec<TransactionAnalysis> {
        let (Some(base_url), Some(api_key)) = (&self.config.base_url, &self.config.api_key)
        else {
            return transactions;
        };

        if transactions.is_empty() {
            return transactions;
        }

        let candidates = transactions.len().min(max_count);
        let attempts: Vec<_> = transactions[..candidates]
            .iter()
            .cloned()
            .map(|tx| {
                let narrator = self.clone();
                let base_url = base_url.clone();
                let api_key = api_key.clone();
                tokio::spawn(async move { narrator.narrate(&base_url, &api_key, &tx).await })
            })
            .collect();

        race_enrichment(transactions, attempts).await
    }

    /// One best-effort narrative request; any failure maps to None.
    async fn narrate(
        &self,
        base_url: &str,
        api_key: &str,
        tx: &TransactionAnalysis,
    ) -> Option<String> {
        match self.request_narrative(base_url, api_key, tx).await {
            Ok(narrative) => Some(narrative),
            Err(e) => {
                tracing::warn!("narrative failed for {}: {}", tx.signature, e);
                None
            }
        }
    }

    async fn request_narrative(
        &self,
        base_url: &str,
        api_key: &str,
        tx: &TransactionAnalysis,
    ) -> Result<String, NarratorError> {
        let url = format!("{}/chat/completions", base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": build_prompt(tx) }],
            "max_tokens": 100,
            "temperature": 0.7
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NarratorError::Status(response.status()));
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(NarratorError::InvalidResponse)
    }
}

/// Race the per-candidate attempts against the batch timeout.
///
/// Ok: candidates are rebuilt with their narrative (or None on a failed
/// attempt) and the remainder passes through untouched. Timeout: the original
/// list is returned unchanged - completed narratives are discarded rather
/// than salvaged, and still-running attempts are left to finish detached,
/// their results ignored.
async fn race_enrichment(
    transactions: Vec<TransactionAnalysis>,
    attempts: Vec<JoinHandle<Option<String>>>,
) -> Vec<TransactionAnalysis> {
    let candidates = attempts.len();
    let outcome = tokio::time::timeout(NARRATIVE_TIMEOUT, join_all(attempts)).await;

    match outcome {
        Ok(results) => {
            let mut enriched = Vec::with_capacity(transactions.len());
            for (tx, result) in transactions[..candidates].iter().zip(results) {
                enriched.push(tx.with_narrative(result.unwrap_or(None)));
            }
            enriched.extend(transactions[candidates..].iter().cloned());
            enriched
        }
        Err(_) => {
            tracing::warn!(
                "narrative generation timed out after {:?}, returning unenriched",
                NARRATIVE_TIMEOUT
            );
            transactions
        }
    }
}

/// Prompt for one transaction, framed from the wallet owner's perspective.
fn build_prompt(tx: &TransactionAnalysis) -> String {
    let mut prompt = format!(
        "You are analyzing a Solana blockchain transaction. Generate a SHORT \
         (1-2 sentences) human-friendly narrative.\n\n\
         Transaction Details:\n\
         - Type: {}\n\
         - Success: {}\n\
         - Instructions: {}\n\
         - Fee: {:.6} SOL\n\
         - Description: {}\n",
        tx.tx_type,
        if tx.success { "Yes" } else { "No" },
        tx.instructions,
        lamports_to_sol(tx.fee),
        tx.description,
    );

    if let Some(error) = &tx.error {
        prompt.push_str(&format!("- Error: {}\n", error));
    }

    prompt.push_str(
        "\nGenerate a brief, friendly explanation of what happened. \
         Focus on the user's perspective, not technical details.",
    );
    prompt
}
