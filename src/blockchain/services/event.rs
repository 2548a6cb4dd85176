use anyhow::Result;
use serde_json::{json, Value};

use crate::blockchain::client::{BackendRouter, Capability};

/// Events emitted by the transaction `digest`.
pub async fn get_events(router: &BackendRouter, digest: &str) -> Result<Value> {
    let events = router
        .backend(Capability::History)
        .get_transaction_events(digest)
        .await?;
    Ok(json!({ "digest": digest, "events": events }))
}
