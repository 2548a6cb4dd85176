//! Backend routing for Sui full nodes.
//!
//! Two backend handles are configured, one for transaction resolution and
//! history lookups and one for state queries and execution. Call sites ask for
//! a [`Capability`] rather than a particular handle.

use std::sync::Arc;

use anyhow::{Context, Result};

pub use super::backend::{JsonRpcBackend, SuiBackend};
use crate::config::{Config, Network};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Turning intents into transaction bytes.
    Resolve,
    /// Dry-running transaction bytes.
    Simulate,
    /// Transaction and event lookups by digest.
    History,
    /// SuiNS lookups.
    NameService,
    /// Balances, objects, coins, packages and network status.
    Query,
    /// Submitting signed transactions.
    Execute,
}

#[derive(Clone)]
pub struct BackendRouter {
    network: Network,
    resolution: Arc<dyn SuiBackend>,
    execution: Arc<dyn SuiBackend>,
}

impl BackendRouter {
    pub fn new(
        network: Network,
        resolution: Arc<dyn SuiBackend>,
        execution: Arc<dyn SuiBackend>,
    ) -> Self {
        Self {
            network,
            resolution,
            execution,
        }
    }

    /// Builds both JSON-RPC handles from the configured endpoints.
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolution_url = url::Url::parse(&config.resolution_rpc_url)
            .with_context(|| format!("Invalid resolution RPC URL: {}", config.resolution_rpc_url))?;
        let execution_url = url::Url::parse(&config.execution_rpc_url)
            .with_context(|| format!("Invalid execution RPC URL: {}", config.execution_rpc_url))?;

        tracing::info!(
            "Sui {} backends: resolution={} execution={}",
            config.network,
            resolution_url,
            execution_url
        );
        Ok(Self::new(
            config.network,
            Arc::new(JsonRpcBackend::new("resolution", resolution_url.as_str())),
            Arc::new(JsonRpcBackend::new("execution", execution_url.as_str())),
        ))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn backend(&self, capability: Capability) -> &dyn SuiBackend {
        match capability {
            Capability::Resolve
            | Capability::Simulate
            | Capability::History
            | Capability::NameService => self.resolution.as_ref(),
            Capability::Query | Capability::Execute => self.execution.as_ref(),
        }
    }
}
