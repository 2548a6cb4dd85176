use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;

use crate::blockchain::client::{BackendRouter, Capability};

pub async fn get_transaction(router: &BackendRouter, digest: &str) -> Result<Value> {
    Ok(router
        .backend(Capability::History)
        .get_transaction(digest)
        .await?)
}

/// Simulates caller-supplied transaction bytes.
pub async fn dry_run(router: &BackendRouter, tx_bytes_b64: &str) -> Result<Value> {
    BASE64
        .decode(tx_bytes_b64.trim())
        .map_err(|e| anyhow!("txBytes is not valid base64: {}", e))?;
    Ok(router
        .backend(Capability::Simulate)
        .dry_run(tx_bytes_b64.trim())
        .await?)
}
