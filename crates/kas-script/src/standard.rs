//! Standard script classes and the address <-> locking script mapping.
//!
//! Supported classes:
//! - `PubKey`:      `OP_DATA_32 <x-only key> OP_CHECKSIG`
//! - `PubKeyECDSA`: `OP_DATA_33 <compressed key> OP_CHECKSIGECDSA`
//! - `ScriptHash`:  `OP_BLAKE2B OP_DATA_32 <hash> OP_EQUAL`

use kas_primitives::hash::blake2b_256;

use crate::address::{Address, Prefix, Version};
use crate::builder::ScriptBuilder;
use crate::opcodes::*;
use crate::script_public_key::{ScriptPublicKey, SCRIPT_PUBLIC_KEY_VERSION};
use crate::TxScriptError;

/// Classification of a locking script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptClass {
    /// Anything not matching a standard template.
    NonStandard,
    /// Schnorr pay-to-pubkey.
    PubKey,
    /// ECDSA pay-to-pubkey.
    PubKeyECDSA,
    /// Pay-to-script-hash.
    ScriptHash,
}

impl ScriptClass {
    /// Classify raw script bytes.
    pub fn from_script(script: &[u8]) -> Self {
        if is_pay_to_pubkey(script) {
            ScriptClass::PubKey
        } else if is_pay_to_pubkey_ecdsa(script) {
            ScriptClass::PubKeyECDSA
        } else if is_pay_to_script_hash(script) {
            ScriptClass::ScriptHash
        } else {
            ScriptClass::NonStandard
        }
    }

    /// Address version for this class, if it has one.
    pub fn address_version(&self) -> Option<Version> {
        match self {
            ScriptClass::NonStandard => None,
            ScriptClass::PubKey => Some(Version::PubKey),
            ScriptClass::PubKeyECDSA => Some(Version::PubKeyECDSA),
            ScriptClass::ScriptHash => Some(Version::ScriptHash),
        }
    }
}

/// Check for `OP_DATA_32 <32 bytes> OP_CHECKSIG`.
pub fn is_pay_to_pubkey(script: &[u8]) -> bool {
    script.len() == 34 && script[0] == OP_DATA_32 && script[33] == OP_CHECKSIG
}

/// Check for `OP_DATA_33 <33 bytes> OP_CHECKSIGECDSA`.
pub fn is_pay_to_pubkey_ecdsa(script: &[u8]) -> bool {
    script.len() == 35 && script[0] == OP_DATA_33 && script[34] == OP_CHECKSIGECDSA
}

/// Check for `OP_BLAKE2B OP_DATA_32 <32 bytes> OP_EQUAL`.
pub fn is_pay_to_script_hash(script: &[u8]) -> bool {
    script.len() == 35
        && script[0] == OP_BLAKE2B
        && script[1] == OP_DATA_32
        && script[34] == OP_EQUAL
}

/// Schnorr pay-to-pubkey locking script for an x-only key.
pub fn pay_to_pub_key(xonly: &[u8; 32]) -> ScriptPublicKey {
    let mut script = Vec::with_capacity(34);
    script.push(OP_DATA_32);
    script.extend_from_slice(xonly);
    script.push(OP_CHECKSIG);
    ScriptPublicKey::new(SCRIPT_PUBLIC_KEY_VERSION, script)
}

/// Build the locking script that pays to `address`.
pub fn pay_to_address_script(address: &Address) -> ScriptPublicKey {
    let payload = address.payload.as_slice();
    let script = match address.version {
        Version::PubKey => [&[OP_DATA_32][..], payload, &[OP_CHECKSIG][..]].concat(),
        Version::PubKeyECDSA => [&[OP_DATA_33][..], payload, &[OP_CHECKSIGECDSA][..]].concat(),
        Version::ScriptHash => {
            [&[OP_BLAKE2B, OP_DATA_32][..], payload, &[OP_EQUAL][..]].concat()
        }
    };
    ScriptPublicKey::new(SCRIPT_PUBLIC_KEY_VERSION, script)
}

/// Pay-to-script-hash locking script committing to `redeem_script`.
pub fn pay_to_script_hash_script(redeem_script: &[u8]) -> ScriptPublicKey {
    let hash = blake2b_256(redeem_script);
    let script = [&[OP_BLAKE2B, OP_DATA_32][..], &hash[..], &[OP_EQUAL][..]].concat();
    ScriptPublicKey::new(SCRIPT_PUBLIC_KEY_VERSION, script)
}

/// Signature script spending a pay-to-script-hash output.
///
/// `signature` must already be a push sequence (e.g. `[65, sig(64), sighash]`);
/// the redeem script is appended as a canonical push.
///
/// # Arguments
/// * `redeem_script` - The script whose hash the output commits to.
/// * `signature` - Signature push bytes satisfying the redeem script.
///
/// # Returns
/// The complete signature script, or an error if the redeem script exceeds
/// the push element limit.
pub fn pay_to_script_hash_signature_script(
    redeem_script: &[u8],
    signature: &[u8],
) -> Result<Vec<u8>, TxScriptError> {
    let redeem_push = ScriptBuilder::new().add_data(redeem_script)?.drain();
    Ok([signature, &redeem_push[..]].concat())
}

/// Recover the address a locking script pays to.
///
/// # Arguments
/// * `script_public_key` - The locking script.
/// * `prefix` - Network prefix for the resulting address.
///
/// # Returns
/// The address, or `PubKeyFormat` for non-standard scripts.
pub fn extract_script_pub_key_address(
    script_public_key: &ScriptPublicKey,
    prefix: Prefix,
) -> Result<Address, TxScriptError> {
    let script = script_public_key.script();
    if script_public_key.version != SCRIPT_PUBLIC_KEY_VERSION {
        return Err(TxScriptError::PubKeyFormat(format!(
            "unsupported script version {}",
            script_public_key.version
        )));
    }
    match ScriptClass::from_script(script) {
        ScriptClass::PubKey => Address::new(prefix, Version::PubKey, &script[1..33]),
        ScriptClass::PubKeyECDSA => Address::new(prefix, Version::PubKeyECDSA, &script[1..34]),
        ScriptClass::ScriptHash => Address::new(prefix, Version::ScriptHash, &script[2..34]),
        ScriptClass::NonStandard => Err(TxScriptError::PubKeyFormat(hex::encode(script))),
    }
}

/// Address for a locking script on the given network.
pub fn address_from_script_public_key(
    script_public_key: &ScriptPublicKey,
    network: impl Into<Prefix>,
) -> Result<Address, TxScriptError> {
    extract_script_pub_key_address(script_public_key, network.into())
}
