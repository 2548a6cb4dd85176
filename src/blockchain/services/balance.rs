use anyhow::Result;
use serde_json::{json, Value};

use crate::blockchain::client::{BackendRouter, Capability};

/// All coin balances owned by `address`.
pub async fn get_balances(router: &BackendRouter, address: &str) -> Result<Value> {
    let balances = router
        .backend(Capability::Query)
        .get_all_balances(address)
        .await?;
    let coins: Vec<Value> = balances
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|b| json!({ "type": b["coinType"], "balance": b["totalBalance"] }))
                .collect()
        })
        .unwrap_or_default();
    Ok(json!({ "address": address, "coins": coins }))
}
