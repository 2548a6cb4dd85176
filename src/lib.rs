#![recursion_limit = "256"]
// src/lib.rs

use std::sync::Arc;

pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod utils;

use blockchain::{BackendRouter, CredentialResolver};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Routes each capability to the resolution or execution backend
    pub router: BackendRouter,
    /// Reads the active address and keypair from the Sui config directory
    pub credentials: Arc<CredentialResolver>,
}

impl AppState {
    pub fn new(config: config::Config, router: BackendRouter) -> Self {
        let credentials = Arc::new(CredentialResolver::new(config.sui_config_dir.clone()));
        Self {
            config,
            router,
            credentials,
        }
    }

    /// Connects both backends named by `config`.
    pub fn from_config(config: config::Config) -> anyhow::Result<Self> {
        let router = BackendRouter::from_config(&config)?;
        Ok(Self::new(config, router))
    }
}
