//! Utility functions for the Sui MCP server

use serde::de::DeserializeOwned;
use serde_json::{from_value, Map, Number, Value};

use crate::mcp::protocol::{error_codes, Response};

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
    req_id: &Value,
) -> Result<T, Response> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}

/// Like [`get_required_arg`], but absent or null values yield `None`.
pub fn get_optional_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
    req_id: &Value,
) -> Result<Option<T>, Response> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => from_value(value.clone()).map(Some).map_err(|_| {
            Response::error(
                req_id.clone(),
                error_codes::INVALID_PARAMS,
                format!("Invalid argument: '{}'", key),
            )
        }),
    }
}

/// Integer literals keep their full digits; serde_json is built with
/// `arbitrary_precision`, so values beyond 64 bits are never rounded through f64.
fn is_integer(n: &Number) -> bool {
    !n.to_string().contains(['.', 'e', 'E'])
}

/// Replaces every integer in `value` with its decimal string. Balances,
/// versions and checkpoints can exceed what JSON clients hold exactly.
pub fn stringify_integers(value: Value) -> Value {
    match value {
        Value::Number(n) if is_integer(&n) => Value::String(n.to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(stringify_integers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, stringify_integers(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Pretty-prints `value` after [`stringify_integers`].
pub fn safe_stringify(value: &Value) -> String {
    serde_json::to_string_pretty(&stringify_integers(value.clone()))
        .unwrap_or_else(|_| value.to_string())
}

/// Formats a MIST amount as SUI with four decimals, e.g. `1.2500 SUI`.
pub fn format_sui(mist: u128) -> String {
    format!("{:.4} SUI", mist as f64 / 1e9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_become_strings_at_any_depth() {
        let value = json!({
            "epoch": 812,
            "nested": [{ "balance": 18446744073709551615u64, "delta": -5 }],
            "ratio": 0.5,
            "ok": true
        });
        assert_eq!(
            stringify_integers(value),
            json!({
                "epoch": "812",
                "nested": [{ "balance": "18446744073709551615", "delta": "-5" }],
                "ratio": 0.5,
                "ok": true
            })
        );
    }

    #[test]
    fn integers_wider_than_64_bits_keep_every_digit() {
        let value: Value = serde_json::from_str(
            r#"{"total": 340282366920938463463374607431768211455, "x": 18446744073709551616, "big": 1.5e40}"#,
        )
        .unwrap();
        let rendered: Value = serde_json::from_str(&safe_stringify(&value)).unwrap();
        assert_eq!(rendered["total"], "340282366920938463463374607431768211455");
        assert_eq!(rendered["x"], "18446744073709551616");
        assert!(rendered["big"].is_number());
    }

    #[test]
    fn formats_sui_amounts() {
        assert_eq!(format_sui(1_250_000_000), "1.2500 SUI");
        assert_eq!(format_sui(99), "0.0000 SUI");
        assert_eq!(format_sui(12_345_678_901), "12.3457 SUI");
    }

    #[test]
    fn optional_args_accept_absence() {
        let args = json!({ "cursor": null, "limit": 5 });
        let id = json!(1);
        assert_eq!(get_optional_arg::<String>(&args, "cursor", &id).unwrap(), None);
        assert_eq!(get_optional_arg::<u64>(&args, "limit", &id).unwrap(), Some(5));
        assert!(get_optional_arg::<u64>(&json!({ "limit": "x" }), "limit", &id).is_err());
    }
}
