use anyhow::Result;
use serde_json::{json, Value};

use crate::blockchain::client::{BackendRouter, Capability};

pub async fn get_object(router: &BackendRouter, object_id: &str) -> Result<Value> {
    Ok(router
        .backend(Capability::Query)
        .get_object(object_id)
        .await?)
}

/// One page of objects owned by `address`, optionally filtered by struct type.
pub async fn get_owned_objects(
    router: &BackendRouter,
    address: &str,
    struct_type: Option<&str>,
    cursor: Option<&str>,
    limit: u64,
) -> Result<Value> {
    let page = router
        .backend(Capability::Query)
        .get_owned_objects(address, struct_type, cursor, limit)
        .await?;
    Ok(json!({
        "data": page["data"],
        "cursor": page["nextCursor"],
        "hasNextPage": page["hasNextPage"].as_bool().unwrap_or(false),
    }))
}
