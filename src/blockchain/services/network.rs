use anyhow::Result;
use serde_json::{json, Value};

use crate::blockchain::client::{BackendRouter, Capability};

/// Well-known chain identifiers returned by `sui_getChainIdentifier`.
fn chain_name(chain_id: &str) -> &'static str {
    match chain_id {
        "35834a8a" => "mainnet",
        "4c78adac" => "testnet",
        _ => "unknown",
    }
}

/// Chain identity, current epoch and latest checkpoint of the connected node.
pub async fn get_network_status(router: &BackendRouter) -> Result<Value> {
    let backend = router.backend(Capability::Query);
    let (chain_id, checkpoint, system_state) = tokio::try_join!(
        backend.get_chain_identifier(),
        backend.get_latest_checkpoint(),
        backend.get_system_state(),
    )?;
    let chain_id = chain_id.as_str().unwrap_or_default().to_string();
    Ok(json!({
        "network": router.network().as_str(),
        "chain": chain_name(&chain_id),
        "chainId": chain_id,
        "epoch": system_state["epoch"],
        "latestCheckpoint": checkpoint,
    }))
}
