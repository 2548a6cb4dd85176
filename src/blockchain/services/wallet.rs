use anyhow::Result;
use serde_json::{json, Value};

use crate::blockchain::{
    address::SuiAddress,
    backend::SUI_COIN_TYPE,
    client::{BackendRouter, Capability},
};
use crate::utils::format_sui;

/// Active address, network and SUI balance.
pub async fn wallet_status(router: &BackendRouter, address: SuiAddress) -> Result<Value> {
    let balance = router
        .backend(Capability::Query)
        .get_balance(&address.to_string(), SUI_COIN_TYPE)
        .await?;
    let raw_balance = match &balance["totalBalance"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "0".to_string(),
    };
    let mist: u128 = raw_balance.parse().unwrap_or_default();
    Ok(json!({
        "address": address,
        "network": router.network().as_str(),
        "sui_balance": format_sui(mist),
        "raw_balance": raw_balance,
    }))
}
