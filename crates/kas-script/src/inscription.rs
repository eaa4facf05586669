//! Inscription envelope scripts.
//!
//! An inscription is a pay-to-pubkey redeem script followed by a data block
//! that is never executed:
//!
//! ```text
//! <x-only pubkey> OP_CHECKSIG
//! OP_FALSE OP_IF
//!   <protocol tag> 0 <payload>
//! OP_ENDIF
//! ```
//!
//! The envelope is part of the script hash, so committing to the P2SH address
//! commits to the payload.

use crate::address::{Address, Prefix, Version};
use crate::builder::ScriptBuilder;
use crate::opcodes::*;
use crate::script_public_key::ScriptPublicKey;
use crate::standard::{pay_to_script_hash_script, pay_to_script_hash_signature_script};
use crate::TxScriptError;

/// A built inscription redeem script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inscription {
    redeem_script: Vec<u8>,
}

impl Inscription {
    /// Build the envelope for a signer key, protocol tag and payload.
    ///
    /// # Arguments
    /// * `xonly_pubkey` - The key that must sign the reveal.
    /// * `protocol` - Protocol tag pushed first inside the envelope (e.g. `kasplex`).
    /// * `payload` - Payload bytes, typically JSON.
    ///
    /// # Returns
    /// The inscription, or a builder error if the payload exceeds push limits.
    pub fn new(
        xonly_pubkey: &[u8; 32],
        protocol: &str,
        payload: &[u8],
    ) -> Result<Self, TxScriptError> {
        let mut builder = ScriptBuilder::new();
        builder
            .add_data(xonly_pubkey)?
            .add_op(OP_CHECKSIG)?
            .add_op(OP_FALSE)?
            .add_op(OP_IF)?
            .add_data(protocol.as_bytes())?
            .add_i64(0)?
            .add_data(payload)?
            .add_op(OP_ENDIF)?;
        Ok(Inscription {
            redeem_script: builder.drain(),
        })
    }

    /// The redeem script revealed when spending.
    pub fn redeem_script(&self) -> &[u8] {
        &self.redeem_script
    }

    /// Locking script for the commit output.
    pub fn script_public_key(&self) -> ScriptPublicKey {
        pay_to_script_hash_script(&self.redeem_script)
    }

    /// P2SH address of the commit output.
    pub fn address(&self, prefix: Prefix) -> Result<Address, TxScriptError> {
        let spk = self.script_public_key();
        Address::new(prefix, Version::ScriptHash, &spk.script[2..34])
    }

    /// Signature script spending the commit output with `signature` pushes.
    pub fn signature_script(&self, signature: &[u8]) -> Result<Vec<u8>, TxScriptError> {
        pay_to_script_hash_signature_script(&self.redeem_script, signature)
    }
}
