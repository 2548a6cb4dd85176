use anyhow::Result;
use serde_json::{json, Value};

use crate::blockchain::client::{BackendRouter, Capability};

pub async fn get_coins(
    router: &BackendRouter,
    address: &str,
    coin_type: &str,
    cursor: Option<&str>,
    limit: u64,
) -> Result<Value> {
    let page = router
        .backend(Capability::Query)
        .get_coins(address, coin_type, cursor, limit)
        .await?;
    let data: Vec<Value> = page["data"]
        .as_array()
        .map(|coins| {
            coins
                .iter()
                .map(|c| {
                    json!({
                        "id": c["coinObjectId"],
                        "balance": c["balance"],
                        "version": c["version"],
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(json!({
        "data": data,
        "cursor": page["nextCursor"],
        "hasNextPage": page["hasNextPage"].as_bool().unwrap_or(false),
    }))
}
