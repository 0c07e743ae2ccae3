//! Process configuration, resolved once at startup
//!
//! Values come from the environment (a `.env` file is loaded by main via
//! dotenvy). The narrative service settings are all optional - a missing
//! endpoint or credential turns enrichment into a silent no-op.

use std::env;

use anyhow::Result;

/// Model requested from the narrative service when none is configured.
pub const DEFAULT_NARRATIVE_MODEL: &str = "glm4.7";

#[derive(Debug, Clone)]
pub struct Config {
    /// Solana RPC endpoint URL
    pub rpc_url: String,
    /// HTTP listen port
    pub port: u16,
    pub narrator: NarratorConfig,
}

/// Narrative service settings, injected into the Narrator.
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let rpc_url =
            env::var("SOLANA_RPC").map_err(|_| anyhow::anyhow!("SOLANA_RPC must be set"))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let narrator = NarratorConfig {
            base_url: env::var("ZHIPU_BASE_URL").ok().filter(|s| !s.is_empty()),
            api_key: env::var("ZHIPU_API_KEY").ok().filter(|s| !s.is_empty()),
            model: env::var("ZHIPU_MODEL")
                .unwrap_or_else(|_| DEFAULT_NARRATIVE_MODEL.to_string()),
        };

        Ok(Self {
            rpc_url,
            port,
            narrator,
        })
    }
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: DEFAULT_NARRATIVE_MODEL.to_string(),
        }
    }
}
