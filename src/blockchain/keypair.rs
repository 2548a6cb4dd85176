//! Sui signing keys for the three supported signature schemes.
//!
//! Transactions are signed over the BLAKE2b-256 digest of the intent message
//! `[scope, version, app_id] || tx_bytes`. Ed25519 signs that digest directly;
//! both ECDSA curves hash it again with SHA-256 and emit low-S signatures.
//! The wire form of a signature is `flag || signature || public_key`, base64.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use blake2::Digest;
use k256::ecdsa::signature::Signer;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::blockchain::address::{Blake2b256, SuiAddress};

pub const SECRET_KEY_LENGTH: usize = 32;

/// Intent prefix for a transaction: TransactionData scope, version 0, Sui app.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SignatureScheme {
    #[serde(rename = "ED25519")]
    Ed25519,
    Secp256k1,
    Secp256r1,
}

impl SignatureScheme {
    pub fn flag(self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
            SignatureScheme::Secp256r1 => 0x02,
        }
    }

    pub fn from_flag(flag: u8) -> Result<Self, KeyDecodeError> {
        match flag {
            0x00 => Ok(SignatureScheme::Ed25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            0x02 => Ok(SignatureScheme::Secp256r1),
            other => Err(KeyDecodeError::UnknownScheme(other)),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureScheme::Ed25519 => "ED25519",
            SignatureScheme::Secp256k1 => "Secp256k1",
            SignatureScheme::Secp256r1 => "Secp256r1",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum KeyDecodeError {
    #[error("not a bech32 string: {0}")]
    Bech32(String),
    #[error("unexpected bech32 prefix '{0}'")]
    WrongPrefix(String),
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unknown signature scheme flag {0}")]
    UnknownScheme(u8),
    #[error("expected {expected} bytes of key material, found {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("secret key is not valid for {0}")]
    InvalidSecret(SignatureScheme),
}

/// A private key able to sign Sui transactions.
pub enum SuiKeyPair {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
    Secp256r1(p256::ecdsa::SigningKey),
}

impl SuiKeyPair {
    pub fn from_secret(scheme: SignatureScheme, secret: &[u8]) -> Result<Self, KeyDecodeError> {
        if secret.len() != SECRET_KEY_LENGTH {
            return Err(KeyDecodeError::InvalidLength {
                expected: SECRET_KEY_LENGTH,
                found: secret.len(),
            });
        }
        match scheme {
            SignatureScheme::Ed25519 => {
                let mut bytes = zeroize::Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
                bytes.copy_from_slice(secret);
                Ok(SuiKeyPair::Ed25519(ed25519_dalek::SigningKey::from_bytes(&bytes)))
            }
            SignatureScheme::Secp256k1 => k256::ecdsa::SigningKey::from_slice(secret)
                .map(SuiKeyPair::Secp256k1)
                .map_err(|_| KeyDecodeError::InvalidSecret(scheme)),
            SignatureScheme::Secp256r1 => p256::ecdsa::SigningKey::from_slice(secret)
                .map(SuiKeyPair::Secp256r1)
                .map_err(|_| KeyDecodeError::InvalidSecret(scheme)),
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            SuiKeyPair::Ed25519(_) => SignatureScheme::Ed25519,
            SuiKeyPair::Secp256k1(_) => SignatureScheme::Secp256k1,
            SuiKeyPair::Secp256r1(_) => SignatureScheme::Secp256r1,
        }
    }

    /// Ed25519 keys are 32 bytes; both ECDSA keys are 33-byte compressed points.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            SuiKeyPair::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
            SuiKeyPair::Secp256k1(key) => key
                .verifying_key()
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
            SuiKeyPair::Secp256r1(key) => key
                .verifying_key()
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
        }
    }

    pub fn address(&self) -> SuiAddress {
        SuiAddress::from_public_key(self.scheme().flag(), &self.public_key_bytes())
    }

    /// Raw 64-byte signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            SuiKeyPair::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
            SuiKeyPair::Secp256k1(key) => {
                let signature: k256::ecdsa::Signature = key.sign(message);
                let signature = signature.normalize_s().unwrap_or(signature);
                signature.to_bytes().to_vec()
            }
            SuiKeyPair::Secp256r1(key) => {
                let signature: p256::ecdsa::Signature = key.sign(message);
                let signature = signature.normalize_s().unwrap_or(signature);
                signature.to_bytes().to_vec()
            }
        }
    }

    /// Signs resolved transaction bytes and returns the serialized signature.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let digest = transaction_digest(tx_bytes);
        let signature = self.sign(&digest);

        let public_key = self.public_key_bytes();
        let mut serialized = Vec::with_capacity(1 + signature.len() + public_key.len());
        serialized.push(self.scheme().flag());
        serialized.extend_from_slice(&signature);
        serialized.extend_from_slice(&public_key);
        BASE64.encode(serialized)
    }
}

/// BLAKE2b-256 of the transaction intent message.
pub fn transaction_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);
    hasher.finalize().into()
}

impl fmt::Debug for SuiKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeyPair")
            .field("scheme", &self.scheme())
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
