//! Tests for the line-delimited MCP transport

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::timeout;

use sui_mcp_server::mcp::stdio;

use common::{test_state, CallLog, MockBackend};

async fn next_response<R: tokio::io::AsyncBufRead + Unpin>(
    lines: &mut tokio::io::Lines<R>,
) -> Value {
    let line = timeout(Duration::from_secs(5), lines.next_line())
        .await
        .expect("response within 5s")
        .unwrap()
        .expect("open output");
    serde_json::from_str(&line).unwrap()
}

#[tokio::test]
async fn test_stalled_tool_call_does_not_block_later_requests() {
    let dir = tempdir().unwrap();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let resolution =
        MockBackend::new("resolution", log.clone()).stall("sui_getTransactionBlock");
    let state = test_state(dir.path(), resolution, MockBackend::new("execution", log.clone()));

    let (mut client_in, server_in) = duplex(4096);
    let (server_out, client_out) = duplex(4096);
    tokio::spawn(stdio::serve(BufReader::new(server_in), server_out, state));

    let call = json!({
        "jsonrpc": "2.0", "id": 1, "method": "tools/call",
        "params": { "name": "sui_get_transaction", "arguments": { "digest": "D1" } }
    });
    let ping = json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" });
    client_in
        .write_all(format!("{}\n{}\n", call, ping).as_bytes())
        .await
        .unwrap();

    let mut lines = BufReader::new(client_out).lines();
    let response = next_response(&mut lines).await;
    assert_eq!(response["id"], 2);
    assert_eq!(response["result"], json!({}));

    // the tool call reached the backend and is still waiting on it
    timeout(Duration::from_secs(5), async {
        while log.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(
        log.lock().unwrap().clone(),
        vec!["resolution:sui_getTransactionBlock"]
    );
    assert!(timeout(Duration::from_millis(200), lines.next_line())
        .await
        .is_err());
}

#[tokio::test]
async fn test_parse_errors_and_notifications() {
    let dir = tempdir().unwrap();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let state = test_state(
        dir.path(),
        MockBackend::new("resolution", log.clone()),
        MockBackend::new("execution", log),
    );

    let (mut client_in, server_in) = duplex(4096);
    let (server_out, client_out) = duplex(4096);
    let server = tokio::spawn(stdio::serve(BufReader::new(server_in), server_out, state));

    client_in.write_all(b"{not json\n").await.unwrap();
    let mut lines = BufReader::new(client_out).lines();
    let response = next_response(&mut lines).await;
    assert_eq!(response["error"]["code"], -32700);

    client_in
        .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n\n")
        .await
        .unwrap();
    client_in
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"tools/list\"}\n")
        .await
        .unwrap();
    let response = next_response(&mut lines).await;
    assert_eq!(response["id"], 9);
    assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 14);

    // EOF ends the transport once nothing is in flight
    drop(client_in);
    timeout(Duration::from_secs(5), server)
        .await
        .expect("serve returns after EOF")
        .unwrap()
        .unwrap();
    assert!(lines.next_line().await.unwrap().is_none());
}
