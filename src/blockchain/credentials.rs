//! Resolves the active signing identity from the local Sui configuration.
//!
//! Nothing is cached: both files are read again on every call, and every
//! failure (missing file, malformed content, no matching key) is reported as
//! `None` rather than an error.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::blockchain::{
    address::SuiAddress,
    keypair::SuiKeyPair,
    keystore::{self, KeyDecoder},
};

/// An address with an optional signing key.
#[derive(Debug)]
pub struct Identity {
    pub address: SuiAddress,
    pub keypair: Option<SuiKeyPair>,
}

pub struct CredentialResolver {
    config_dir: PathBuf,
    decoders: Vec<Box<dyn KeyDecoder>>,
}

impl CredentialResolver {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            decoders: keystore::default_decoders(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// The address named by `active_address` in `client.yaml`.
    pub fn active_address(&self) -> Option<SuiAddress> {
        let path = self.config_dir.join(keystore::CLIENT_CONFIG_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        let value = keystore::parse_client_config(&raw).remove("active_address")?;
        match value.parse() {
            Ok(address) => Some(address),
            Err(e) => {
                warn!("Ignoring malformed active_address '{}': {}", value, e);
                None
            }
        }
    }

    /// The active address together with its keypair from `sui.keystore`.
    pub fn resolve_active_identity(&self) -> Option<Identity> {
        let address = self.active_address()?;
        let path = self.config_dir.join(keystore::KEYSTORE_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        let entries = match keystore::parse_keystore(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Keystore {} is not a JSON list: {}", path.display(), e);
                return None;
            }
        };

        let keypair = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| self.decode_entry(index, entry))
            .find(|keypair| keypair.address() == address);

        if keypair.is_none() {
            debug!("No keystore entry matches active address {}", address);
        }
        keypair.map(|keypair| Identity {
            address,
            keypair: Some(keypair),
        })
    }

    /// First decoder producing a usable key wins; entries nothing can decode are skipped.
    fn decode_entry(&self, index: usize, entry: &str) -> Option<SuiKeyPair> {
        for decoder in &self.decoders {
            let decoded = match decoder.decode(entry) {
                Ok(decoded) => decoded,
                Err(e) => {
                    debug!("Keystore entry {} is not {}: {}", index, decoder.name(), e);
                    continue;
                }
            };
            match SuiKeyPair::from_secret(decoded.scheme, &decoded.secret) {
                Ok(keypair) => return Some(keypair),
                Err(e) => debug!(
                    "Keystore entry {} decoded as {} but is unusable: {}",
                    index,
                    decoder.name(),
                    e
                ),
            }
        }
        debug!("Skipping keystore entry {}", index);
        None
    }
}
