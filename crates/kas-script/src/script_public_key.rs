//! Versioned locking script attached to every transaction output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TxScriptError;

/// The only script version currently defined by the ledger.
pub const SCRIPT_PUBLIC_KEY_VERSION: u16 = 0;

/// A locking script together with its script-language version.
///
/// Serializes as `{"version": 0, "script": "<hex>"}`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptPublicKey {
    /// Script-language version.
    pub version: u16,
    /// Raw script bytes.
    #[serde(with = "kas_primitives::util::serde_hex")]
    pub script: Vec<u8>,
}

impl ScriptPublicKey {
    /// Create a script public key from a version and script bytes.
    pub fn new(version: u16, script: Vec<u8>) -> Self {
        ScriptPublicKey { version, script }
    }

    /// Create a version-0 script public key.
    pub fn from_vec(script: Vec<u8>) -> Self {
        Self::new(SCRIPT_PUBLIC_KEY_VERSION, script)
    }

    /// Parse a version-0 script from hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, TxScriptError> {
        Ok(Self::from_vec(hex::decode(hex_str)?))
    }

    /// Parse the node's compact form: a 4-hex-digit big-endian version
    /// followed by the script hex (e.g. `"000020ab..ac"`).
    pub fn from_versioned_hex(s: &str) -> Result<Self, TxScriptError> {
        if s.len() < 4 || !s.is_char_boundary(4) {
            return Err(TxScriptError::PubKeyFormat(format!(
                "versioned script too short: {}",
                s
            )));
        }
        let version_bytes = hex::decode(&s[..4])?;
        let version = u16::from_be_bytes([version_bytes[0], version_bytes[1]]);
        Ok(Self::new(version, hex::decode(&s[4..])?))
    }

    /// The compact form accepted by [`ScriptPublicKey::from_versioned_hex`].
    pub fn to_versioned_hex(&self) -> String {
        format!("{}{}", hex::encode(self.version.to_be_bytes()), hex::encode(&self.script))
    }

    /// Borrow the script bytes.
    pub fn script(&self) -> &[u8] {
        &self.script
    }

    /// Hex encoding of the script bytes (without version).
    pub fn script_hex(&self) -> String {
        hex::encode(&self.script)
    }
}

impl fmt::Debug for ScriptPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptPublicKey({}, {})", self.version, self.script_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_hex_roundtrip() {
        let spk = ScriptPublicKey::from_vec(vec![0x20, 0xaa, 0xac]);
        let compact = spk.to_versioned_hex();
        assert_eq!(compact, "000020aaac");
        assert_eq!(ScriptPublicKey::from_versioned_hex(&compact).unwrap(), spk);
    }

    #[test]
    fn test_versioned_hex_too_short() {
        assert!(ScriptPublicKey::from_versioned_hex("00").is_err());
    }

    #[test]
    fn test_serde_shape() {
        let spk = ScriptPublicKey::from_vec(vec![0xab, 0xcd]);
        let json = serde_json::to_value(&spk).unwrap();
        assert_eq!(json, serde_json::json!({"version": 0, "script": "abcd"}));
    }
}
