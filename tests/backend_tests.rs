//! Tests for the JSON-RPC backend against a local mock node

use mockito::{mock, server_url, Matcher};
use serde_json::json;

use sui_mcp_server::blockchain::{BackendError, JsonRpcBackend, SuiBackend};

#[tokio::test]
async fn test_call_returns_result_member() {
    let _m = mock("POST", "/node-balances")
        .match_body(Matcher::PartialJson(json!({
            "jsonrpc": "2.0",
            "method": "suix_getAllBalances",
            "params": ["0xab"]
        })))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"result":[{"coinType":"0x2::sui::SUI","coinObjectCount":3,"totalBalance":"1500000000","lockedBalance":{}}]}"#,
        )
        .create();

    let backend = JsonRpcBackend::new("execution", format!("{}/node-balances", server_url()));
    let balances = backend.get_all_balances("0xab").await.unwrap();
    assert_eq!(balances[0]["totalBalance"], "1500000000");
}

#[tokio::test]
async fn test_rpc_error_is_surfaced() {
    let _m = mock("POST", "/node-error")
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid params: digest"}}"#,
        )
        .create();

    let backend = JsonRpcBackend::new("resolution", format!("{}/node-error", server_url()));
    let err = backend.get_transaction("nope").await.unwrap_err();
    match err {
        BackendError::Rpc { code, message } => {
            assert_eq!(code, -32602);
            assert_eq!(message, "Invalid params: digest");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_response_without_result_is_rejected() {
    let _m = mock("POST", "/node-empty")
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":1}"#)
        .create();

    let backend = JsonRpcBackend::new("execution", format!("{}/node-empty", server_url()));
    let err = backend.get_chain_identifier().await.unwrap_err();
    assert!(matches!(err, BackendError::MissingResult(ref m) if m == "sui_getChainIdentifier"));
}

#[tokio::test]
async fn test_unreachable_node_is_a_transport_error() {
    let backend = JsonRpcBackend::new("execution", "http://127.0.0.1:9/unreachable");
    let err = backend.get_latest_checkpoint().await.unwrap_err();
    assert!(matches!(err, BackendError::Transport { ref backend, .. } if backend == "execution"));
}

#[tokio::test]
async fn test_events_are_extracted_from_transaction() {
    let _m = mock("POST", "/node-events")
        .match_body(Matcher::PartialJson(json!({ "method": "sui_getTransactionBlock" })))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"result":{"digest":"D1","events":[{"type":"0x2::coin::CoinMinted","parsedJson":{"amount":"7"}}]}}"#,
        )
        .create();

    let backend = JsonRpcBackend::new("resolution", format!("{}/node-events", server_url()));
    let events = backend.get_transaction_events("D1").await.unwrap();
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["parsedJson"]["amount"], "7");
}
