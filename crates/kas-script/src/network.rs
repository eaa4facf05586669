//! Network identifiers.
//!
//! `NetworkType` selects the address prefix; `NetworkId` adds the optional
//! numeric suffix that distinguishes testnets (`testnet-10`, `testnet-11`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::Prefix;
use crate::TxScriptError;

/// Kind of network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkType {
    /// Production network.
    Mainnet,
    /// Public test network.
    Testnet,
    /// Local simulation network.
    Simnet,
    /// Developer network.
    Devnet,
}

impl NetworkType {
    /// Lowercase name used in network id strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Testnet => "testnet",
            NetworkType::Simnet => "simnet",
            NetworkType::Devnet => "devnet",
        }
    }

    /// Address prefix for this network.
    pub fn prefix(&self) -> Prefix {
        Prefix::from(*self)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = TxScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(NetworkType::Mainnet),
            "testnet" => Ok(NetworkType::Testnet),
            "simnet" => Ok(NetworkType::Simnet),
            "devnet" => Ok(NetworkType::Devnet),
            _ => Err(TxScriptError::InvalidNetworkId(s.to_string())),
        }
    }
}

/// A network type with an optional numeric suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NetworkId {
    /// Network kind.
    pub network_type: NetworkType,
    /// Suffix, e.g. `10` for `testnet-10`.
    pub suffix: Option<u32>,
}

impl NetworkId {
    /// A network id without suffix.
    pub const fn new(network_type: NetworkType) -> Self {
        NetworkId {
            network_type,
            suffix: None,
        }
    }

    /// A network id with a suffix.
    pub const fn with_suffix(network_type: NetworkType, suffix: u32) -> Self {
        NetworkId {
            network_type,
            suffix: Some(suffix),
        }
    }

    /// Mainnet.
    pub const fn mainnet() -> Self {
        Self::new(NetworkType::Mainnet)
    }

    /// `testnet-10`.
    pub const fn testnet10() -> Self {
        Self::with_suffix(NetworkType::Testnet, 10)
    }

    /// Address prefix for this network.
    pub fn prefix(&self) -> Prefix {
        self.network_type.prefix()
    }
}

impl From<NetworkId> for NetworkType {
    fn from(id: NetworkId) -> Self {
        id.network_type
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suffix {
            Some(suffix) => write!(f, "{}-{}", self.network_type, suffix),
            None => write!(f, "{}", self.network_type),
        }
    }
}

impl FromStr for NetworkId {
    type Err = TxScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, suffix) = match s.split_once('-') {
            Some((kind, suffix)) => {
                let suffix = suffix
                    .parse::<u32>()
                    .map_err(|_| TxScriptError::InvalidNetworkId(s.to_string()))?;
                (kind, Some(suffix))
            }
            None => (s, None),
        };
        Ok(NetworkId {
            network_type: kind.parse()?,
            suffix,
        })
    }
}

impl Serialize for NetworkId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
