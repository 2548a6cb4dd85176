//! Readers for the Sui CLI configuration files.
//!
//! `client.yaml` only contributes top-level scalars (`active_address`,
//! `active_env`), so it is read line by line instead of through a YAML parser.
//! `sui.keystore` is a JSON array of encoded private keys; each entry is handed
//! to an ordered list of [`KeyDecoder`]s.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bech32::Hrp;
use std::collections::HashMap;
use zeroize::Zeroizing;

use crate::blockchain::keypair::{KeyDecodeError, SignatureScheme, SECRET_KEY_LENGTH};

pub const CLIENT_CONFIG_FILE: &str = "client.yaml";
pub const KEYSTORE_FILE: &str = "sui.keystore";

const SUI_PRIVATE_KEY_PREFIX: Hrp = Hrp::parse_unchecked("suiprivkey");

/// Key material recovered from one keystore entry.
pub struct DecodedKey {
    pub scheme: SignatureScheme,
    pub secret: Zeroizing<Vec<u8>>,
}

/// One encoding a keystore entry may use.
pub trait KeyDecoder: Send + Sync {
    fn name(&self) -> &'static str;
    fn decode(&self, encoded: &str) -> Result<DecodedKey, KeyDecodeError>;
}

/// `suiprivkey1...`: Bech32 over `flag || secret`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bech32KeyDecoder;

impl KeyDecoder for Bech32KeyDecoder {
    fn name(&self) -> &'static str {
        "bech32"
    }

    fn decode(&self, encoded: &str) -> Result<DecodedKey, KeyDecodeError> {
        let (hrp, data) =
            bech32::decode(encoded).map_err(|e| KeyDecodeError::Bech32(e.to_string()))?;
        if hrp != SUI_PRIVATE_KEY_PREFIX {
            return Err(KeyDecodeError::WrongPrefix(hrp.to_string()));
        }
        split_flagged(Zeroizing::new(data))
    }
}

/// Older keystores: base64 over `flag || secret`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyKeyDecoder;

impl KeyDecoder for LegacyKeyDecoder {
    fn name(&self) -> &'static str {
        "legacy-base64"
    }

    fn decode(&self, encoded: &str) -> Result<DecodedKey, KeyDecodeError> {
        let raw = Zeroizing::new(BASE64.decode(encoded.trim())?);
        split_flagged(raw)
    }
}

fn split_flagged(raw: Zeroizing<Vec<u8>>) -> Result<DecodedKey, KeyDecodeError> {
    let Some((&flag, secret)) = raw.split_first() else {
        return Err(KeyDecodeError::InvalidLength {
            expected: SECRET_KEY_LENGTH + 1,
            found: 0,
        });
    };
    let scheme = SignatureScheme::from_flag(flag)?;
    if secret.len() != SECRET_KEY_LENGTH {
        return Err(KeyDecodeError::InvalidLength {
            expected: SECRET_KEY_LENGTH + 1,
            found: raw.len(),
        });
    }
    Ok(DecodedKey {
        scheme,
        secret: Zeroizing::new(secret.to_vec()),
    })
}

/// Decoders in the order they are attempted.
pub fn default_decoders() -> Vec<Box<dyn KeyDecoder>> {
    vec![Box::new(Bech32KeyDecoder), Box::new(LegacyKeyDecoder)]
}

/// Encodes a key the way `sui keytool export` prints it.
pub fn encode_bech32_key(scheme: SignatureScheme, secret: &[u8]) -> Result<String, KeyDecodeError> {
    let mut payload = Vec::with_capacity(1 + secret.len());
    payload.push(scheme.flag());
    payload.extend_from_slice(secret);
    bech32::encode::<bech32::Bech32>(SUI_PRIVATE_KEY_PREFIX, &payload)
        .map_err(|e| KeyDecodeError::Bech32(e.to_string()))
}

/// Extracts top-level `key: value` scalars. Comments after `#` and surrounding
/// quotes are stripped; indented lines and lines without a value are ignored.
pub fn parse_client_config(raw: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in raw.lines() {
        if line.starts_with(char::is_whitespace) || line.starts_with('#') {
            continue;
        }
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }
        let value = rest.split('#').next().unwrap_or_default().trim();
        let value = strip_quotes(value).trim();
        if value.is_empty() || value == "~" {
            continue;
        }
        values.insert(key.to_string(), value.to_string());
    }
    values
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Parses the keystore file body: a JSON array of encoded keys.
pub fn parse_keystore(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}
