// src/mcp/tools.rs

use serde_json::{json, Value};

use crate::blockchain::intent::{DEFAULT_CALL_GAS_BUDGET, DEFAULT_PUBLISH_GAS_BUDGET};

/// Names of every tool served by `tools/call`.
pub const TOOL_NAMES: &[&str] = &[
    "sui_get_balance",
    "sui_get_object",
    "sui_get_owned_objects",
    "sui_get_transaction",
    "sui_dry_run",
    "sui_get_events",
    "sui_get_coins",
    "sui_get_latest_checkpoint",
    "sui_resolve_name",
    "sui_get_package",
    "sui_wallet_status",
    "sui_wallet_transfer",
    "sui_wallet_call",
    "sui_wallet_publish",
];

fn execute_flag() -> Value {
    json!({
        "type": "boolean",
        "default": false,
        "description": "Set true to execute after approval (default: dry-run only)"
    })
}

/// Definitions returned by `tools/list`.
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": "sui_get_balance",
            "description": "Get all coin balances for an address",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "SUI address"}
                },
                "required": ["address"]
            }
        },
        {
            "name": "sui_get_object",
            "description": "Get object details by ID",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "objectId": {"type": "string", "description": "Object ID"}
                },
                "required": ["objectId"]
            }
        },
        {
            "name": "sui_get_owned_objects",
            "description": "List objects owned by an address",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "Owner address"},
                    "type": {"type": "string", "description": "Filter by object type (e.g. 0x2::coin::Coin<0x2::sui::SUI>)"},
                    "limit": {"type": "integer", "default": 50, "description": "Max results (default 50)"},
                    "cursor": {"type": "string", "description": "Pagination cursor"}
                },
                "required": ["address"]
            }
        },
        {
            "name": "sui_get_transaction",
            "description": "Get transaction details by digest",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "digest": {"type": "string", "description": "Transaction digest"}
                },
                "required": ["digest"]
            }
        },
        {
            "name": "sui_dry_run",
            "description": "Dry-run a transaction (base64 tx bytes) without executing",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "txBytes": {"type": "string", "description": "Base64-encoded transaction bytes"}
                },
                "required": ["txBytes"]
            }
        },
        {
            "name": "sui_get_events",
            "description": "Get events for a transaction digest",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "digest": {"type": "string", "description": "Transaction digest to get events for"}
                },
                "required": ["digest"]
            }
        },
        {
            "name": "sui_get_coins",
            "description": "Get coins of a specific type for an address",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "Owner address"},
                    "coinType": {"type": "string", "default": "0x2::sui::SUI", "description": "Coin type (default: 0x2::sui::SUI)"},
                    "limit": {"type": "integer", "default": 50, "description": "Max results"},
                    "cursor": {"type": "string", "description": "Pagination cursor"}
                },
                "required": ["address"]
            }
        },
        {
            "name": "sui_get_latest_checkpoint",
            "description": "Get the latest checkpoint sequence number and details",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
        },
        {
            "name": "sui_resolve_name",
            "description": "Resolve a SuiNS name to an address, or an address to its SuiNS names",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "SuiNS name to resolve (e.g. example.sui)"},
                    "address": {"type": "string", "description": "Address to reverse-resolve"}
                }
            }
        },
        {
            "name": "sui_get_package",
            "description": "Get all modules in a Move package",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "packageId": {"type": "string", "description": "Package object ID"}
                },
                "required": ["packageId"]
            }
        },
        {
            "name": "sui_wallet_status",
            "description": "Show active wallet address, network, and SUI balance",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
        },
        {
            "name": "sui_wallet_transfer",
            "description": "Transfer SUI to a recipient. Returns a dry-run summary for user confirmation and does NOT auto-execute.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "recipient": {"type": "string", "description": "Recipient SUI address"},
                    "amount": {"type": "number", "description": "Amount in SUI (e.g. 1.5)"},
                    "execute": execute_flag()
                },
                "required": ["recipient", "amount"]
            }
        },
        {
            "name": "sui_wallet_call",
            "description": "Call a Move function. Returns a dry-run summary for user confirmation and does NOT auto-execute.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "package_id": {"type": "string", "description": "Package ID"},
                    "module": {"type": "string", "description": "Module name"},
                    "function_name": {"type": "string", "description": "Function name"},
                    "type_args": {"type": "array", "items": {"type": "string"}, "default": [], "description": "Type arguments"},
                    "args": {"type": "array", "items": {"type": "string"}, "default": [], "description": "Function arguments; 0x-prefixed values are object IDs"},
                    "gas_budget": {"type": "integer", "default": DEFAULT_CALL_GAS_BUDGET, "description": "Gas budget in MIST"},
                    "execute": execute_flag()
                },
                "required": ["package_id", "module", "function_name"]
            }
        },
        {
            "name": "sui_wallet_publish",
            "description": "Publish a Move package. Bytecode is built with the sui CLI. Returns a dry-run for confirmation.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "package_path": {"type": "string", "description": "Path to Move package directory"},
                    "gas_budget": {"type": "integer", "default": DEFAULT_PUBLISH_GAS_BUDGET, "description": "Gas budget in MIST"},
                    "skip_dependency_verification": {"type": "boolean", "default": false},
                    "execute": execute_flag()
                },
                "required": ["package_path"]
            }
        }
    ])
}
