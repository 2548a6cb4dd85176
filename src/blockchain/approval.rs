//! Two-phase approval for mutating operations.
//!
//! A request without `execute` is resolved and dry-run, and the simulated
//! effects are returned for a human to review. The same request with
//! `execute = true` is signed with the active keypair and submitted. No state
//! is kept between the two calls.

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::blockchain::{
    backend::BackendError,
    client::{BackendRouter, Capability},
    credentials::CredentialResolver,
    intent::TransactionIntent,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    PendingApproval,
    Executed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    TransferSui,
    MoveCall,
    PublishPackage,
}

impl Action {
    fn instruction(self) -> &'static str {
        match self {
            Action::PublishPackage => "Call this tool again with execute=true to publish.",
            _ => "Call this tool again with execute=true to send the transaction.",
        }
    }

    fn execution_label(self) -> &'static str {
        match self {
            Action::PublishPackage => "Publish",
            _ => "Execution",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApprovalError {
    #[error("Dry-run failed: {0}")]
    DryRun(#[source] BackendError),
    #[error("Error: No active wallet. Cannot load a keypair for the active address")]
    NoActiveWallet,
    #[error("{label} failed: {source}")]
    Execution {
        label: &'static str,
        #[source]
        source: BackendError,
    },
}

/// A mutating operation awaiting approval or execution.
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub action: Action,
    pub intent: TransactionIntent,
    /// Fields shown next to the dry-run result (participants, amounts, targets).
    pub summary: Map<String, Value>,
}

pub struct ApprovalPipeline<'a> {
    router: &'a BackendRouter,
    credentials: &'a CredentialResolver,
    default_gas_budget: u64,
}

impl<'a> ApprovalPipeline<'a> {
    pub fn new(
        router: &'a BackendRouter,
        credentials: &'a CredentialResolver,
        default_gas_budget: u64,
    ) -> Self {
        Self {
            router,
            credentials,
            default_gas_budget,
        }
    }

    pub async fn run(
        &self,
        request: ApprovalRequest,
        execute: bool,
    ) -> Result<Value, ApprovalError> {
        if execute {
            self.sign_and_execute(request).await
        } else {
            self.dry_run(request).await
        }
    }

    /// Resolves and simulates on the resolution backend only.
    pub async fn dry_run(&self, request: ApprovalRequest) -> Result<Value, ApprovalError> {
        let resolver = self.router.backend(Capability::Resolve);
        let resolved = resolver
            .resolve_transaction(&request.intent, self.default_gas_budget)
            .await
            .map_err(ApprovalError::DryRun)?;
        let dry_run = self
            .router
            .backend(Capability::Simulate)
            .dry_run(&resolved.to_base64())
            .await
            .map_err(ApprovalError::DryRun)?;

        info!(
            "{:?} dry-run complete for {:?}, awaiting approval",
            request.action,
            request.intent.sender()
        );

        let mut payload = Map::new();
        payload.insert("action".into(), json!(request.action));
        payload.insert("status".into(), json!(ApprovalStatus::PendingApproval));
        payload.insert("network".into(), json!(self.router.network().as_str()));
        payload.extend(request.summary);
        payload.insert("dry_run".into(), dry_run);
        payload.insert("instruction".into(), json!(request.action.instruction()));
        Ok(Value::Object(payload))
    }

    /// Loads the active keypair before any network call, then resolves on the
    /// resolution backend and submits on the execution backend.
    pub async fn sign_and_execute(&self, request: ApprovalRequest) -> Result<Value, ApprovalError> {
        let identity = self
            .credentials
            .resolve_active_identity()
            .ok_or(ApprovalError::NoActiveWallet)?;
        let keypair = identity.keypair.as_ref().ok_or(ApprovalError::NoActiveWallet)?;

        let label = request.action.execution_label();
        let mut intent = request.intent;
        intent.set_sender_if_not_set(identity.address);

        let resolved = self
            .router
            .backend(Capability::Resolve)
            .resolve_transaction(&intent, self.default_gas_budget)
            .await
            .map_err(|source| ApprovalError::Execution { label, source })?;
        let signature = keypair.sign_transaction(&resolved.tx_bytes);

        let result = self
            .router
            .backend(Capability::Execute)
            .execute_transaction(&resolved.to_base64(), vec![signature])
            .await
            .map_err(|source| {
                warn!("{:?} from {} failed: {}", request.action, identity.address, source);
                ApprovalError::Execution { label, source }
            })?;

        info!(
            "{:?} executed from {} (digest {})",
            request.action,
            identity.address,
            result["digest"].as_str().unwrap_or("unknown")
        );

        Ok(json!({
            "action": request.action,
            "status": ApprovalStatus::Executed,
            "network": self.router.network().as_str(),
            "result": result,
        }))
    }
}
