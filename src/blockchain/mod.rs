// src/blockchain/mod.rs

pub mod address;
pub mod approval;
pub mod backend;
pub mod client;
pub mod credentials;
pub mod intent;
pub mod keypair;
pub mod keystore;
pub mod services;

// Re-export commonly used types
pub use address::SuiAddress;
pub use backend::{BackendError, JsonRpcBackend, SuiBackend};
pub use client::{BackendRouter, Capability};
pub use credentials::{CredentialResolver, Identity};
pub use keypair::{SignatureScheme, SuiKeyPair};
