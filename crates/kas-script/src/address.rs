//! Kaspa address handling.
//!
//! An address is `prefix:payload` where the payload is the version byte and
//! the public key (or script hash), converted to 5-bit groups and followed by
//! an 8-character 40-bit BCH checksum that commits to the prefix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::network::NetworkType;
use crate::TxScriptError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Number of 5-bit checksum characters appended to the payload.
const CHECKSUM_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Prefix / Version
// ---------------------------------------------------------------------------

/// Human-readable network prefix of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `kaspa`
    Mainnet,
    /// `kaspatest`
    Testnet,
    /// `kaspasim`
    Simnet,
    /// `kaspadev`
    Devnet,
}

impl Prefix {
    /// The prefix string without the separator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Mainnet => "kaspa",
            Prefix::Testnet => "kaspatest",
            Prefix::Simnet => "kaspasim",
            Prefix::Devnet => "kaspadev",
        }
    }
}

impl FromStr for Prefix {
    type Err = TxScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kaspa" => Ok(Prefix::Mainnet),
            "kaspatest" => Ok(Prefix::Testnet),
            "kaspasim" => Ok(Prefix::Simnet),
            "kaspadev" => Ok(Prefix::Devnet),
            other => Err(TxScriptError::InvalidPrefix(other.to_string())),
        }
    }
}

impl From<NetworkType> for Prefix {
    fn from(network: NetworkType) -> Self {
        match network {
            NetworkType::Mainnet => Prefix::Mainnet,
            NetworkType::Testnet => Prefix::Testnet,
            NetworkType::Simnet => Prefix::Simnet,
            NetworkType::Devnet => Prefix::Devnet,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address kind, encoded as the first payload byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Version {
    /// Schnorr pay-to-pubkey (32-byte x-only key).
    PubKey,
    /// ECDSA pay-to-pubkey (33-byte compressed key).
    PubKeyECDSA,
    /// Pay-to-script-hash (32-byte Blake2b hash).
    ScriptHash,
}

impl Version {
    /// Version byte.
    pub fn as_u8(&self) -> u8 {
        match self {
            Version::PubKey => 0,
            Version::PubKeyECDSA => 1,
            Version::ScriptHash => 8,
        }
    }

    /// Payload length required by this version.
    pub fn payload_len(&self) -> usize {
        match self {
            Version::PubKey | Version::ScriptHash => 32,
            Version::PubKeyECDSA => 33,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = TxScriptError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Version::PubKey),
            1 => Ok(Version::PubKeyECDSA),
            8 => Ok(Version::ScriptHash),
            other => Err(TxScriptError::InvalidVersion(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A Kaspa address: prefix, version and payload.
///
/// Equality is by value; `Display` and serde use the canonical string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    /// Network prefix.
    pub prefix: Prefix,
    /// Address kind.
    pub version: Version,
    /// Public key or script hash bytes.
    pub payload: Vec<u8>,
}

impl Address {
    /// Create an address, checking the payload length against the version.
    ///
    /// # Arguments
    /// * `prefix` - Network prefix.
    /// * `version` - Address kind.
    /// * `payload` - Key or hash bytes.
    ///
    /// # Returns
    /// The address, or `InvalidPayloadLength`.
    pub fn new(prefix: Prefix, version: Version, payload: &[u8]) -> Result<Self, TxScriptError> {
        if payload.len() != version.payload_len() {
            return Err(TxScriptError::InvalidPayloadLength {
                version: version.as_u8(),
                expected: version.payload_len(),
                got: payload.len(),
            });
        }
        Ok(Address {
            prefix,
            version,
            payload: payload.to_vec(),
        })
    }

    /// Parse and validate an address string.
    ///
    /// # Arguments
    /// * `address` - A `prefix:payload` string.
    ///
    /// # Returns
    /// The decoded `Address`, or an error if the prefix, characters, checksum,
    /// version or payload length are invalid.
    pub fn from_string(address: &str) -> Result<Self, TxScriptError> {
        let (prefix_str, data) = address
            .split_once(':')
            .ok_or_else(|| TxScriptError::InvalidAddress(format!("missing prefix in '{}'", address)))?;
        let prefix: Prefix = prefix_str.parse()?;

        if data.len() < CHECKSUM_LEN + 1 {
            return Err(TxScriptError::InvalidAddress(format!("too short: '{}'", address)));
        }

        let values = data
            .chars()
            .map(|c| {
                u8::try_from(c)
                    .ok()
                    .and_then(|b| CHARSET.iter().position(|x| *x == b))
                    .map(|i| i as u8)
                    .ok_or(TxScriptError::EncodingBadChar(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let (payload5, checksum5) = values.split_at(values.len() - CHECKSUM_LEN);
        let mut checksum_bytes = [0u8; 8];
        checksum_bytes[3..].copy_from_slice(&conv5to8(checksum5));
        if checksum(payload5, prefix.as_str()) != u64::from_be_bytes(checksum_bytes) {
            return Err(TxScriptError::EncodingChecksumFailed);
        }

        let decoded = conv5to8(payload5);
        let (version_byte, payload) = decoded
            .split_first()
            .ok_or_else(|| TxScriptError::InvalidAddress(format!("empty payload: '{}'", address)))?;
        let version = Version::try_from(*version_byte)?;
        Address::new(prefix, version, payload)
    }

    /// Check whether a string is a valid address.
    pub fn validate(address: &str) -> bool {
        Self::from_string(address).is_ok()
    }

    /// Encode the address to its canonical string.
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(1 + self.payload.len());
        raw.push(self.version.as_u8());
        raw.extend_from_slice(&self.payload);
        let payload5 = conv8to5(&raw);

        let sum = checksum(&payload5, self.prefix.as_str()).to_be_bytes();
        let checksum5 = conv8to5(&sum[3..]);

        let mut out = String::with_capacity(self.prefix.as_str().len() + 1 + payload5.len() + 8);
        out.push_str(self.prefix.as_str());
        out.push(':');
        for v in payload5.iter().chain(checksum5.iter()) {
            out.push(CHARSET[*v as usize] as char);
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl FromStr for Address {
    type Err = TxScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = TxScriptError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Address::from_string(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_string(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Checksum and bit conversion
// ---------------------------------------------------------------------------

fn polymod(values: impl Iterator<Item = u8>) -> u64 {
    let mut c = 1u64;
    for d in values {
        let c0 = c >> 35;
        c = ((c & 0x07_ffff_ffff) << 5) ^ d as u64;
        if c0 & 0x01 != 0 {
            c ^= 0x98_f2bc_8e61;
        }
        if c0 & 0x02 != 0 {
            c ^= 0x79_b76d_99e2;
        }
        if c0 & 0x04 != 0 {
            c ^= 0xf3_3e5f_b3c4;
        }
        if c0 & 0x08 != 0 {
            c ^= 0xae_2eab_e2a8;
        }
        if c0 & 0x10 != 0 {
            c ^= 0x1e_4f43_e470;
        }
    }
    c ^ 1
}

fn checksum(payload5: &[u8], prefix: &str) -> u64 {
    polymod(
        prefix
            .bytes()
            .map(|b| b & 0x1f)
            .chain(std::iter::once(0))
            .chain(payload5.iter().copied())
            .chain([0u8; CHECKSUM_LEN]),
    )
}

/// Regroup 8-bit bytes into 5-bit values, zero-padding the final group.
fn conv8to5(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity((payload.len() * 8).div_ceil(5));
    let mut buff: u16 = 0;
    let mut bits: u8 = 0;
    for &byte in payload {
        buff = (buff << 8) | byte as u16;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((buff >> bits) & 0x1f) as u8);
        }
        buff &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(((buff << (5 - bits)) & 0x1f) as u8);
    }
    out
}

/// Regroup 5-bit values into bytes, dropping trailing padding bits.
fn conv5to8(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() * 5 / 8);
    let mut buff: u16 = 0;
    let mut bits: u8 = 0;
    for &value in payload {
        buff = (buff << 5) | value as u16;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buff >> bits) as u8);
        }
        buff &= (1 << bits) - 1;
    }
    out
}
