//! Shared application state

use crate::config::Config;
use crate::narrator::Narrator;
use crate::rpc::WalletRpc;

pub struct AppState {
    pub rpc: WalletRpc,
    pub narrator: Narrator,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            rpc: WalletRpc::new(config.rpc_url.clone()),
            narrator: Narrator::new(config.narrator.clone()),
        }
    }
}
