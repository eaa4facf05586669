//! Subnetwork identifiers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TransactionError;

/// Size of a subnetwork id in bytes.
pub const SUBNETWORK_ID_SIZE: usize = 20;

/// A 20-byte subnetwork id. Regular payments use the native subnetwork.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SubnetworkId([u8; SUBNETWORK_ID_SIZE]);

impl SubnetworkId {
    /// The native subnetwork (all zero).
    pub const NATIVE: SubnetworkId = SubnetworkId([0u8; SUBNETWORK_ID_SIZE]);

    /// The coinbase subnetwork.
    pub const COINBASE: SubnetworkId = SubnetworkId::from_byte(1);

    /// The registry subnetwork.
    pub const REGISTRY: SubnetworkId = SubnetworkId::from_byte(2);

    /// A subnetwork id whose first byte is `b` and the rest zero.
    pub const fn from_byte(b: u8) -> Self {
        let mut bytes = [0u8; SUBNETWORK_ID_SIZE];
        bytes[0] = b;
        SubnetworkId(bytes)
    }

    /// Wrap raw bytes.
    pub const fn from_bytes(bytes: [u8; SUBNETWORK_ID_SIZE]) -> Self {
        SubnetworkId(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; SUBNETWORK_ID_SIZE] {
        &self.0
    }

    /// Whether this is the native subnetwork.
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    /// Whether this is the coinbase subnetwork.
    pub fn is_coinbase(&self) -> bool {
        *self == Self::COINBASE
    }

    /// Parse from 40 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::InvalidTransaction(format!("invalid subnetwork id: {}", e))
        })?;
        let arr: [u8; SUBNETWORK_ID_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            TransactionError::InvalidTransaction(format!(
                "subnetwork id must be {} bytes, got {}",
                SUBNETWORK_ID_SIZE,
                bytes.len()
            ))
        })?;
        Ok(SubnetworkId(arr))
    }
}

impl fmt::Display for SubnetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl AsRef<[u8]> for SubnetworkId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for SubnetworkId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SubnetworkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SubnetworkId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
