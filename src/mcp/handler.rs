//! # MCP Handler Module
//!
//! This module implements the Model Context Protocol (MCP) for the Sui server.
//! It handles incoming MCP requests and dispatches them to the query services
//! or, for mutating tools, to the approval pipeline.
//!
//! ## Supported Tools
//!
//! ### Queries
//! - `sui_get_balance`, `sui_get_coins` - Coin balances and coin objects
//! - `sui_get_object`, `sui_get_owned_objects` - Object lookups
//! - `sui_get_transaction`, `sui_get_events`, `sui_dry_run` - Transactions
//! - `sui_get_latest_checkpoint` - Network status
//! - `sui_resolve_name` - SuiNS forward and reverse lookups
//! - `sui_get_package` - Move package introspection
//!
//! ### Wallet
//! - `sui_wallet_status` - Active address and SUI balance
//! - `sui_wallet_transfer`, `sui_wallet_call`, `sui_wallet_publish` - Dry-run
//!   first; executed only when re-invoked with `execute=true`

use crate::{
    blockchain::{
        approval::{Action, ApprovalPipeline, ApprovalRequest},
        backend::SUI_COIN_TYPE,
        intent::{
            assemble, sui_to_mist, IntentRequest, DEFAULT_CALL_GAS_BUDGET,
            DEFAULT_PUBLISH_GAS_BUDGET,
        },
        services::{
            balance, coins, event, names, network, object, package, transaction, wallet,
            DEFAULT_PAGE_LIMIT,
        },
        SuiAddress,
    },
    mcp::{
        protocol::{error_codes, Request, Response, ToolResult},
        tools,
    },
    utils, AppState,
};
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

const NO_ACTIVE_WALLET: &str =
    "Error: No active SUI wallet. Run `sui client active-address` to check.";
const NO_SIGNER: &str = "Error: No active wallet";

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let method = req.method.clone();
    let response = match method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => Response::success(req.id.clone(), json!({})),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Direct calls by tool name are rewritten into tools/call
        name if tools::TOOL_NAMES.contains(&name) => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the correct tool logic.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);

    match call_tool(tool_name, args, &req.id, &state).await {
        Ok(result) => {
            if result.is_error {
                warn!("Tool {} returned an error: {}", tool_name, result.first_text());
            }
            Response::success(req.id.clone(), result.into_value())
        }
        Err(err_resp) => err_resp,
    }
}

/// Wraps a service result; backend failures become error payloads.
fn query_result(tool: &str, result: anyhow::Result<Value>) -> ToolResult {
    match result {
        Ok(payload) => ToolResult::json(&payload),
        Err(e) => {
            error!("{} failed: {:#}", tool, e);
            ToolResult::error(format!("{:#}", e))
        }
    }
}

/// Runs a tool. `Err` is reserved for malformed arguments, which are reported
/// as JSON-RPC errors; everything else is a `ToolResult`.
async fn call_tool(
    tool_name: &str,
    args: &Value,
    req_id: &Value,
    state: &AppState,
) -> Result<ToolResult, Response> {
    let router = &state.router;

    let result = match tool_name {
        "sui_get_balance" => {
            let address = utils::get_required_arg::<String>(args, "address", req_id)?;
            query_result(tool_name, balance::get_balances(router, &address).await)
        }
        "sui_get_object" => {
            let object_id = utils::get_required_arg::<String>(args, "objectId", req_id)?;
            query_result(tool_name, object::get_object(router, &object_id).await)
        }
        "sui_get_owned_objects" => {
            let address = utils::get_required_arg::<String>(args, "address", req_id)?;
            let struct_type = utils::get_optional_arg::<String>(args, "type", req_id)?;
            let limit = utils::get_optional_arg::<u64>(args, "limit", req_id)?
                .unwrap_or(DEFAULT_PAGE_LIMIT);
            let cursor = utils::get_optional_arg::<String>(args, "cursor", req_id)?;
            query_result(
                tool_name,
                object::get_owned_objects(
                    router,
                    &address,
                    struct_type.as_deref(),
                    cursor.as_deref(),
                    limit,
                )
                .await,
            )
        }
        "sui_get_transaction" => {
            let digest = utils::get_required_arg::<String>(args, "digest", req_id)?;
            query_result(tool_name, transaction::get_transaction(router, &digest).await)
        }
        "sui_dry_run" => {
            let tx_bytes = utils::get_required_arg::<String>(args, "txBytes", req_id)?;
            query_result(tool_name, transaction::dry_run(router, &tx_bytes).await)
        }
        "sui_get_events" => {
            let digest = utils::get_required_arg::<String>(args, "digest", req_id)?;
            query_result(tool_name, event::get_events(router, &digest).await)
        }
        "sui_get_coins" => {
            let address = utils::get_required_arg::<String>(args, "address", req_id)?;
            let coin_type = utils::get_optional_arg::<String>(args, "coinType", req_id)?
                .unwrap_or_else(|| SUI_COIN_TYPE.to_string());
            let limit = utils::get_optional_arg::<u64>(args, "limit", req_id)?
                .unwrap_or(DEFAULT_PAGE_LIMIT);
            let cursor = utils::get_optional_arg::<String>(args, "cursor", req_id)?;
            query_result(
                tool_name,
                coins::get_coins(router, &address, &coin_type, cursor.as_deref(), limit).await,
            )
        }
        "sui_get_latest_checkpoint" => {
            query_result(tool_name, network::get_network_status(router).await)
        }
        "sui_resolve_name" => {
            let name = utils::get_optional_arg::<String>(args, "name", req_id)?;
            let address = utils::get_optional_arg::<String>(args, "address", req_id)?;
            match names::NameQuery::from_args(name, address) {
                Some(query) => query_result(tool_name, names::resolve(router, &query).await),
                None => ToolResult::error("Error: provide either name or address"),
            }
        }
        "sui_get_package" => {
            let package_id = utils::get_required_arg::<String>(args, "packageId", req_id)?;
            query_result(tool_name, package::get_package(router, &package_id).await)
        }
        "sui_wallet_status" => match state.credentials.active_address() {
            Some(address) => query_result(tool_name, wallet::wallet_status(router, address).await),
            None => ToolResult::error(NO_ACTIVE_WALLET),
        },
        "sui_wallet_transfer" => wallet_transfer(args, req_id, state).await?,
        "sui_wallet_call" => wallet_call(args, req_id, state).await?,
        "sui_wallet_publish" => wallet_publish(args, req_id, state).await?,
        unknown => {
            return Err(Response::error(
                req_id.clone(),
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", unknown),
            ))
        }
    };

    Ok(result)
}

fn execute_requested(args: &Value, req_id: &Value) -> Result<bool, Response> {
    Ok(utils::get_optional_arg::<bool>(args, "execute", req_id)?.unwrap_or(false))
}

async fn run_approval(state: &AppState, request: ApprovalRequest, execute: bool) -> ToolResult {
    let pipeline = ApprovalPipeline::new(
        &state.router,
        &state.credentials,
        state.config.transfer_gas_budget,
    );
    match pipeline.run(request, execute).await {
        Ok(payload) => ToolResult::json(&payload),
        Err(e) => {
            error!("{}", e);
            ToolResult::error(e.to_string())
        }
    }
}

fn active_sender(state: &AppState) -> Option<SuiAddress> {
    state.credentials.active_address()
}

async fn wallet_transfer(
    args: &Value,
    req_id: &Value,
    state: &AppState,
) -> Result<ToolResult, Response> {
    let recipient = utils::get_required_arg::<String>(args, "recipient", req_id)?;
    let amount = utils::get_required_arg::<f64>(args, "amount", req_id)?;
    let execute = execute_requested(args, req_id)?;

    let Some(sender) = active_sender(state) else {
        return Ok(ToolResult::error(NO_SIGNER));
    };
    let amount_mist = match sui_to_mist(amount) {
        Ok(mist) => mist,
        Err(e) => return Ok(ToolResult::error(format!("Error: {}", e))),
    };
    let intent = match assemble(
        IntentRequest::Transfer {
            recipient: recipient.clone(),
            amount_sui: amount,
        },
        sender,
    ) {
        Ok(intent) => intent,
        Err(e) => return Ok(ToolResult::error(format!("Error: {}", e))),
    };

    let mut summary = Map::new();
    summary.insert("from".into(), json!(sender));
    summary.insert("to".into(), json!(recipient));
    // f64 Display never switches to exponent form: 1e-7 renders as 0.0000001
    summary.insert(
        "amount".into(),
        json!(format!("{} SUI ({} MIST)", amount, amount_mist)),
    );

    let request = ApprovalRequest {
        action: Action::TransferSui,
        intent,
        summary,
    };
    Ok(run_approval(state, request, execute).await)
}

async fn wallet_call(
    args: &Value,
    req_id: &Value,
    state: &AppState,
) -> Result<ToolResult, Response> {
    let package_id = utils::get_required_arg::<String>(args, "package_id", req_id)?;
    let module = utils::get_required_arg::<String>(args, "module", req_id)?;
    let function = utils::get_required_arg::<String>(args, "function_name", req_id)?;
    let type_args = utils::get_optional_arg::<Vec<String>>(args, "type_args", req_id)?
        .unwrap_or_default();
    let call_args = utils::get_optional_arg::<Vec<String>>(args, "args", req_id)?
        .unwrap_or_default();
    let gas_budget = utils::get_optional_arg::<u64>(args, "gas_budget", req_id)?
        .unwrap_or(DEFAULT_CALL_GAS_BUDGET);
    let execute = execute_requested(args, req_id)?;

    let Some(sender) = active_sender(state) else {
        return Ok(ToolResult::error(NO_SIGNER));
    };
    let target = format!("{}::{}::{}", package_id, module, function);
    let intent = match assemble(
        IntentRequest::Call {
            package_id,
            module,
            function,
            type_args: type_args.clone(),
            args: call_args.clone(),
            gas_budget,
        },
        sender,
    ) {
        Ok(intent) => intent,
        Err(e) => return Ok(ToolResult::error(format!("Error: {}", e))),
    };

    let mut summary = Map::new();
    summary.insert("signer".into(), json!(sender));
    summary.insert("target".into(), json!(target));
    summary.insert("type_args".into(), json!(type_args));
    summary.insert("args".into(), json!(call_args));
    summary.insert("gas_budget".into(), json!(gas_budget));

    let request = ApprovalRequest {
        action: Action::MoveCall,
        intent,
        summary,
    };
    Ok(run_approval(state, request, execute).await)
}

async fn wallet_publish(
    args: &Value,
    req_id: &Value,
    state: &AppState,
) -> Result<ToolResult, Response> {
    let package_path = utils::get_required_arg::<String>(args, "package_path", req_id)?;
    let gas_budget = utils::get_optional_arg::<u64>(args, "gas_budget", req_id)?
        .unwrap_or(DEFAULT_PUBLISH_GAS_BUDGET);
    let skip_verification =
        utils::get_optional_arg::<bool>(args, "skip_dependency_verification", req_id)?
            .unwrap_or(false);
    let execute = execute_requested(args, req_id)?;

    let Some(sender) = active_sender(state) else {
        return Ok(ToolResult::error(NO_SIGNER));
    };
    let built = package::build_package(&state.config, &package_path, skip_verification).await;
    let compiled = match built {
        Ok(compiled) => compiled,
        Err(e) => return Ok(ToolResult::error(format!("Build failed: {:#}", e))),
    };
    let modules_count = compiled.modules.len();
    let intent = match assemble(
        IntentRequest::Publish {
            package: compiled,
            gas_budget,
        },
        sender,
    ) {
        Ok(intent) => intent,
        Err(e) => return Ok(ToolResult::error(format!("Error: {}", e))),
    };

    let mut summary = Map::new();
    summary.insert("signer".into(), json!(sender));
    summary.insert("package_path".into(), json!(package_path));
    summary.insert("gas_budget".into(), json!(gas_budget));
    summary.insert("modules_count".into(), json!(modules_count));

    let request = ApprovalRequest {
        action: Action::PublishPackage,
        intent,
        summary,
    };
    Ok(run_approval(state, request, execute).await)
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "sui_mcp",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Sui blockchain MCP server for ledger queries and human-approved transactions. \
         Mutating tools return a dry-run first; re-invoke with execute=true to submit.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning a JSON definition of all available tools.
fn handle_tools_list(req: &Request) -> Response {
    Response::success(req.id.clone(), json!({ "tools": tools::tool_definitions() }))
}
