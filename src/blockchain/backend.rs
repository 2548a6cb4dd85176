// src/blockchain/backend.rs

//! The capability interface shared by both Sui backends.
//!
//! Implementors provide a single JSON-RPC primitive, [`SuiBackend::call`]; the
//! capability methods are built on top of it so either backend can serve any
//! capability the router assigns to it.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::blockchain::intent::{CallArg, IntentKind, TransactionIntent};

pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Largest number of gas coins handed to `unsafe_paySui` in one transfer.
const MAX_TRANSFER_INPUT_COINS: u64 = 50;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request to {backend} failed: {source}")]
    Transport {
        backend: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },
    #[error("response to {0} has no result")]
    MissingResult(String),
    #[error("unexpected response to {method}: {detail}")]
    Malformed { method: String, detail: String },
    #[error("cannot resolve transaction: {0}")]
    Resolution(String),
}

/// Transaction bytes produced by the resolution backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTransaction {
    pub tx_bytes: Vec<u8>,
}

impl ResolvedTransaction {
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.tx_bytes)
    }
}

fn response_options() -> Value {
    json!({
        "showInput": true,
        "showEffects": true,
        "showEvents": true,
        "showObjectChanges": true,
        "showBalanceChanges": true
    })
}

#[async_trait]
pub trait SuiBackend: Send + Sync {
    /// Label used in logs and errors.
    fn name(&self) -> &str;

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, BackendError>;

    // --- resolution ---

    /// Builds transaction bytes for `intent`, selecting gas and input objects on chain.
    /// Publishing through `unsafe_publish` hands the upgrade capability to the sender.
    async fn resolve_transaction(
        &self,
        intent: &TransactionIntent,
        default_gas_budget: u64,
    ) -> Result<ResolvedTransaction, BackendError> {
        let sender = intent
            .sender()
            .ok_or_else(|| BackendError::Resolution("intent has no sender".into()))?;
        let gas_budget = intent.gas_budget().unwrap_or(default_gas_budget).to_string();

        let (method, params) = match intent.kind() {
            IntentKind::Transfer {
                recipient,
                amount_mist,
            } => {
                let coins = self
                    .get_coins(
                        &sender.to_string(),
                        SUI_COIN_TYPE,
                        None,
                        MAX_TRANSFER_INPUT_COINS,
                    )
                    .await?;
                let coin_ids: Vec<Value> = coins["data"]
                    .as_array()
                    .map(|data| data.iter().map(|c| c["coinObjectId"].clone()).collect())
                    .unwrap_or_default();
                if coin_ids.is_empty() {
                    return Err(BackendError::Resolution(format!(
                        "{} owns no SUI coins to pay from",
                        sender
                    )));
                }
                (
                    "unsafe_paySui",
                    vec![
                        json!(sender),
                        json!(coin_ids),
                        json!([recipient]),
                        json!([amount_mist.to_string()]),
                        json!(gas_budget),
                    ],
                )
            }
            IntentKind::MoveCall {
                target,
                type_args,
                args,
            } => {
                let args: Vec<Value> = args
                    .iter()
                    .map(|arg| match arg {
                        CallArg::Object(id) => json!(id),
                        CallArg::Pure(value) => json!(value),
                    })
                    .collect();
                (
                    "unsafe_moveCall",
                    vec![
                        json!(sender),
                        json!(target.package),
                        json!(target.module),
                        json!(target.function),
                        json!(type_args),
                        json!(args),
                        Value::Null,
                        json!(gas_budget),
                        Value::Null,
                    ],
                )
            }
            IntentKind::Publish {
                modules,
                dependencies,
            } => (
                "unsafe_publish",
                vec![
                    json!(sender),
                    json!(modules),
                    json!(dependencies),
                    Value::Null,
                    json!(gas_budget),
                ],
            ),
        };

        let built = self.call(method, params).await?;
        let encoded = built["txBytes"]
            .as_str()
            .ok_or_else(|| BackendError::Malformed {
                method: method.to_string(),
                detail: "missing txBytes".into(),
            })?;
        let tx_bytes = BASE64.decode(encoded).map_err(|e| BackendError::Malformed {
            method: method.to_string(),
            detail: format!("txBytes is not base64: {}", e),
        })?;
        debug!("{} resolved {} bytes via {}", self.name(), tx_bytes.len(), method);
        Ok(ResolvedTransaction { tx_bytes })
    }

    async fn dry_run(&self, tx_bytes_b64: &str) -> Result<Value, BackendError> {
        self.call("sui_dryRunTransactionBlock", vec![json!(tx_bytes_b64)])
            .await
    }

    // --- history ---

    async fn get_transaction(&self, digest: &str) -> Result<Value, BackendError> {
        self.call(
            "sui_getTransactionBlock",
            vec![json!(digest), response_options()],
        )
        .await
    }

    async fn get_transaction_events(&self, digest: &str) -> Result<Value, BackendError> {
        let tx = self
            .call(
                "sui_getTransactionBlock",
                vec![json!(digest), json!({ "showEvents": true })],
            )
            .await?;
        Ok(match tx.get("events") {
            Some(Value::Array(events)) => Value::Array(events.clone()),
            _ => json!([]),
        })
    }

    // --- name service ---

    async fn resolve_name_address(&self, name: &str) -> Result<Value, BackendError> {
        self.call("suix_resolveNameServiceAddress", vec![json!(name)])
            .await
    }

    async fn resolve_address_names(&self, address: &str) -> Result<Value, BackendError> {
        self.call(
            "suix_resolveNameServiceNames",
            vec![json!(address), Value::Null, Value::Null],
        )
        .await
    }

    // --- queries ---

    async fn get_all_balances(&self, owner: &str) -> Result<Value, BackendError> {
        self.call("suix_getAllBalances", vec![json!(owner)]).await
    }

    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Value, BackendError> {
        self.call("suix_getBalance", vec![json!(owner), json!(coin_type)])
            .await
    }

    async fn get_object(&self, object_id: &str) -> Result<Value, BackendError> {
        self.call(
            "sui_getObject",
            vec![
                json!(object_id),
                json!({
                    "showType": true,
                    "showOwner": true,
                    "showPreviousTransaction": true,
                    "showContent": true,
                    "showStorageRebate": true,
                    "showDisplay": true
                }),
            ],
        )
        .await
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: Option<&str>,
        cursor: Option<&str>,
        limit: u64,
    ) -> Result<Value, BackendError> {
        let mut query = json!({
            "options": { "showType": true, "showOwner": true, "showContent": true }
        });
        if let Some(struct_type) = struct_type {
            query["filter"] = json!({ "StructType": struct_type });
        }
        self.call(
            "suix_getOwnedObjects",
            vec![json!(owner), query, json!(cursor), json!(limit)],
        )
        .await
    }

    async fn get_coins(
        &self,
        owner: &str,
        coin_type: &str,
        cursor: Option<&str>,
        limit: u64,
    ) -> Result<Value, BackendError> {
        self.call(
            "suix_getCoins",
            vec![json!(owner), json!(coin_type), json!(cursor), json!(limit)],
        )
        .await
    }

    async fn get_normalized_modules(&self, package_id: &str) -> Result<Value, BackendError> {
        self.call("sui_getNormalizedMoveModulesByPackage", vec![json!(package_id)])
            .await
    }

    async fn get_chain_identifier(&self) -> Result<Value, BackendError> {
        self.call("sui_getChainIdentifier", vec![]).await
    }

    async fn get_latest_checkpoint(&self) -> Result<Value, BackendError> {
        self.call("sui_getLatestCheckpointSequenceNumber", vec![])
            .await
    }

    async fn get_system_state(&self) -> Result<Value, BackendError> {
        self.call("suix_getLatestSuiSystemState", vec![]).await
    }

    // --- execution ---

    async fn execute_transaction(
        &self,
        tx_bytes_b64: &str,
        signatures: Vec<String>,
    ) -> Result<Value, BackendError> {
        self.call(
            "sui_executeTransactionBlock",
            vec![
                json!(tx_bytes_b64),
                json!(signatures),
                json!({
                    "showEffects": true,
                    "showEvents": true,
                    "showObjectChanges": true,
                    "showBalanceChanges": true
                }),
                json!("WaitForEffectsCert"),
            ],
        )
        .await
    }
}

/// A Sui full node reached over JSON-RPC 2.0 via HTTP.
#[derive(Clone)]
pub struct JsonRpcBackend {
    name: String,
    url: String,
    http: Client,
}

impl JsonRpcBackend {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl SuiBackend for JsonRpcBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, BackendError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!("{} -> {}", self.name, method);

        let transport = |source| BackendError::Transport {
            backend: self.name.clone(),
            source,
        };
        let mut response: Value = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        if let Some(error) = response.get("error") {
            return Err(BackendError::Rpc {
                code: error["code"].as_i64().unwrap_or_default(),
                message: error["message"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            });
        }
        match response.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(BackendError::MissingResult(method.to_string())),
        }
    }
}

