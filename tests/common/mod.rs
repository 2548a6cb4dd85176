//! Shared fixtures: an in-memory Sui backend and a throwaway Sui config directory.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use sui_mcp_server::{
    blockchain::{
        keypair::SignatureScheme, keystore, BackendError, BackendRouter, SuiBackend, SuiKeyPair,
    },
    config::{Config, Network},
    mcp::{handler::handle_mcp_request, protocol::Request},
    AppState,
};

/// Every call made against any mock, as `backend:method`, in order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub const TX_BYTES_B64: &str = "AAECAwQFBgc=";

pub struct MockBackend {
    name: &'static str,
    log: CallLog,
    params: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    responses: HashMap<String, Result<Value, String>>,
    stalled: HashSet<String>,
}

impl MockBackend {
    pub fn new(name: &'static str, log: CallLog) -> Self {
        Self {
            name,
            log,
            params: Arc::new(Mutex::new(HashMap::new())),
            responses: HashMap::new(),
            stalled: HashSet::new(),
        }
    }

    pub fn respond(mut self, method: &str, result: Value) -> Self {
        self.responses.insert(method.to_string(), Ok(result));
        self
    }

    pub fn fail(mut self, method: &str, message: &str) -> Self {
        self.responses.insert(method.to_string(), Err(message.to_string()));
        self
    }

    /// Calls to `method` are accepted but never answered.
    pub fn stall(mut self, method: &str) -> Self {
        self.stalled.insert(method.to_string());
        self
    }

    /// Handle on the parameters of the most recent call per method.
    pub fn params(&self) -> Arc<Mutex<HashMap<String, Vec<Value>>>> {
        self.params.clone()
    }
}

#[async_trait]
impl SuiBackend for MockBackend {
    fn name(&self) -> &str {
        self.name
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, BackendError> {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, method));
        self.params.lock().unwrap().insert(method.to_string(), params);
        if self.stalled.contains(method) {
            std::future::pending::<()>().await;
        }
        match self.responses.get(method) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(BackendError::Rpc {
                code: -32000,
                message: message.clone(),
            }),
            None => Err(BackendError::Rpc {
                code: -32601,
                message: format!("Method not found: {}", method),
            }),
        }
    }
}

/// A resolution backend able to build and dry-run transfers, calls and publishes.
pub fn resolution_backend(log: CallLog) -> MockBackend {
    MockBackend::new("resolution", log)
        .respond(
            "suix_getCoins",
            json!({
                "data": [{
                    "coinType": "0x2::sui::SUI",
                    "coinObjectId": "0x5c1f0e4b2d1a3c6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6",
                    "version": 41,
                    "balance": "5000000000"
                }],
                "nextCursor": null,
                "hasNextPage": false
            }),
        )
        .respond("unsafe_paySui", json!({ "txBytes": TX_BYTES_B64 }))
        .respond("unsafe_moveCall", json!({ "txBytes": TX_BYTES_B64 }))
        .respond("unsafe_publish", json!({ "txBytes": TX_BYTES_B64 }))
        .respond(
            "sui_dryRunTransactionBlock",
            json!({
                "effects": {
                    "status": { "status": "success" },
                    "gasUsed": { "computationCost": 1000000, "storageCost": 1976000 }
                }
            }),
        )
}

pub fn execution_backend(log: CallLog) -> MockBackend {
    MockBackend::new("execution", log).respond(
        "sui_executeTransactionBlock",
        json!({
            "digest": "8Hc5JgZ6XuMZFfRG5zmEpjYQ2ZqStHVYBmCb7aBQMgtK",
            "effects": { "status": { "status": "success" } }
        }),
    )
}

pub fn test_keypair() -> SuiKeyPair {
    SuiKeyPair::from_secret(SignatureScheme::Ed25519, &[7u8; 32]).unwrap()
}

/// Writes `client.yaml` naming `active` and a keystore holding `entries`.
pub fn write_sui_config(dir: &Path, active: Option<&str>, entries: &[String]) {
    let mut client = String::from("---\nkeystore:\n  File: sui.keystore\nenvs:\n  - alias: testnet\n    rpc: \"https://fullnode.testnet.sui.io:443\"\n");
    if let Some(active) = active {
        client.push_str(&format!("active_env: testnet\nactive_address: \"{}\"\n", active));
    }
    fs::write(dir.join(keystore::CLIENT_CONFIG_FILE), client).unwrap();
    fs::write(
        dir.join(keystore::KEYSTORE_FILE),
        serde_json::to_string_pretty(entries).unwrap(),
    )
    .unwrap();
}

/// Config dir whose active address is backed by [`test_keypair`].
pub fn write_active_wallet(dir: &Path) -> SuiKeyPair {
    let keypair = test_keypair();
    let entry = keystore::encode_bech32_key(SignatureScheme::Ed25519, &[7u8; 32]).unwrap();
    write_sui_config(dir, Some(&keypair.address().to_string()), &[entry]);
    keypair
}

pub fn test_state(config_dir: &Path, resolution: MockBackend, execution: MockBackend) -> AppState {
    let mut config = Config::for_network(Network::Testnet);
    config.sui_config_dir = config_dir.to_path_buf();
    let router = BackendRouter::new(Network::Testnet, Arc::new(resolution), Arc::new(execution));
    AppState::new(config, router)
}

/// Runs `tools/call` and returns the tool result object.
pub async fn call_tool(state: &AppState, name: &str, arguments: Value) -> Value {
    let req: Request = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    }))
    .unwrap();
    let resp = handle_mcp_request(req, state.clone()).await.unwrap();
    assert!(resp.error.is_none(), "unexpected JSON-RPC error: {:?}", resp.error);
    resp.result.unwrap()
}

/// Text of the first content block of a tool result.
pub fn tool_text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

pub fn tool_json(result: &Value) -> Value {
    serde_json::from_str(tool_text(result)).unwrap()
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
