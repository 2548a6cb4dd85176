//! Move package introspection and the external `sui move build` step.

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

use crate::blockchain::{
    client::{BackendRouter, Capability},
    intent::CompiledPackage,
};
use crate::config::Config;

/// Module, struct and function names of a published package.
pub async fn get_package(router: &BackendRouter, package_id: &str) -> Result<Value> {
    let normalized = router
        .backend(Capability::Query)
        .get_normalized_modules(package_id)
        .await?;
    let names = |v: &Value| -> Vec<String> {
        v.as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    };
    let modules: Vec<Value> = normalized
        .as_object()
        .map(|modules| {
            modules
                .iter()
                .map(|(name, module)| {
                    json!({
                        "module": name,
                        "structs": names(&module["structs"]),
                        "functions": names(&module["exposedFunctions"]),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(json!({ "packageId": package_id, "modules": modules }))
}

/// Runs `sui move build --dump-bytecode-as-base64` for `package_path`.
pub async fn build_package(
    config: &Config,
    package_path: &str,
    skip_dependency_verification: bool,
) -> Result<CompiledPackage> {
    let mut command = Command::new(&config.sui_binary);
    command
        .args(["move", "build", "--dump-bytecode-as-base64", "--path", package_path])
        .kill_on_drop(true);
    if skip_dependency_verification {
        command.arg("--skip-dependency-verification");
    }

    info!("Building Move package at {}", package_path);
    let output = tokio::time::timeout(
        Duration::from_secs(config.build_timeout_secs),
        command.output(),
    )
    .await
    .map_err(|_| anyhow!("build timed out after {}s", config.build_timeout_secs))?
    .with_context(|| format!("cannot run '{}'", config.sui_binary))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("{}", stderr.trim()));
    }
    parse_build_output(&String::from_utf8_lossy(&output.stdout))
}

/// The JSON document is the last `{`-prefixed line of the build output.
pub fn parse_build_output(raw: &str) -> Result<CompiledPackage> {
    let trimmed = raw.trim();
    if let Ok(package) = serde_json::from_str(trimmed) {
        return Ok(package);
    }
    let line = trimmed
        .lines()
        .rev()
        .find(|line| line.trim_start().starts_with('{'))
        .ok_or_else(|| anyhow!("build produced no bytecode JSON"))?;
    serde_json::from_str(line).context("unexpected build output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_build_json_after_log_lines() {
        let raw = "INCLUDING DEPENDENCY Sui\nBUILDING demo\n{\"modules\":[\"oRzrCwYAAAA=\"],\"dependencies\":[\"0x1\",\"0x2\"],\"digest\":[1,2,3]}\n";
        let package = parse_build_output(raw).unwrap();
        assert_eq!(package.modules.len(), 1);
        assert_eq!(package.dependencies, vec!["0x1".to_string(), "0x2".to_string()]);
        assert!(parse_build_output("error: no Move.toml").is_err());
    }

    #[tokio::test]
    async fn missing_binary_is_reported() {
        let mut config = Config::default();
        config.sui_binary = "/nonexistent/sui-binary".into();
        let err = build_package(&config, ".", false).await.unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/sui-binary"));
    }
}
