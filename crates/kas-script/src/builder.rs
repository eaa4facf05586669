//! Incremental script assembly with canonical push encoding.
//!
//! `ScriptBuilder` always emits the smallest push for a given value:
//! small integers become `OP_0`/`OP_1NEGATE`/`OP_1..OP_16`, everything else
//! uses the shortest direct or `OP_PUSHDATA*` prefix. Pushes larger than the
//! element limit and scripts larger than the script limit are rejected.

use kas_primitives::hash::blake2b_256;

use crate::chunk::push_data_prefix;
use crate::opcodes::*;
use crate::script_public_key::ScriptPublicKey;
use crate::standard::pay_to_script_hash_script;
use crate::TxScriptError;

/// Maximum size of a single pushed element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum size of an assembled script.
pub const MAX_SCRIPTS_SIZE: usize = 10_000;

/// Builder for custom scripts.
#[derive(Clone, Debug, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        ScriptBuilder { script: Vec::new() }
    }

    /// Borrow the script assembled so far.
    pub fn script(&self) -> &[u8] {
        &self.script
    }

    /// Current script length in bytes.
    pub fn len(&self) -> usize {
        self.script.len()
    }

    /// Check whether nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// Take the assembled script, leaving the builder empty.
    pub fn drain(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.script)
    }

    fn ensure_room(&self, added: usize) -> Result<(), TxScriptError> {
        if self.script.len() + added > MAX_SCRIPTS_SIZE {
            return Err(TxScriptError::ScriptTooLarge {
                current: self.script.len(),
                added,
            });
        }
        Ok(())
    }

    /// Append a single opcode.
    ///
    /// # Arguments
    /// * `opcode` - The opcode byte.
    ///
    /// # Returns
    /// The builder, or `ScriptTooLarge` if the script is full.
    pub fn add_op(&mut self, opcode: u8) -> Result<&mut Self, TxScriptError> {
        self.ensure_room(1)?;
        self.script.push(opcode);
        Ok(self)
    }

    /// Append several opcodes in order.
    pub fn add_ops(&mut self, opcodes: &[u8]) -> Result<&mut Self, TxScriptError> {
        self.ensure_room(opcodes.len())?;
        self.script.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Push data using the canonical (smallest) encoding.
    ///
    /// Empty data and `[0]` become `OP_0`, a single byte `1..=16` becomes
    /// `OP_1..OP_16`, and `[0x81]` becomes `OP_1NEGATE`.
    ///
    /// # Arguments
    /// * `data` - Bytes to push.
    ///
    /// # Returns
    /// The builder, or `ElementTooBig`/`ScriptTooLarge` on limit violations.
    pub fn add_data(&mut self, data: &[u8]) -> Result<&mut Self, TxScriptError> {
        if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(TxScriptError::ElementTooBig(data.len()));
        }
        match data {
            [] | [0] => return self.add_op(OP_0),
            [n @ 1..=16] => return self.add_op(OP_1 - 1 + n),
            [0x81] => return self.add_op(OP_1NEGATE),
            _ => {}
        }
        let prefix = push_data_prefix(data.len())?;
        self.ensure_room(prefix.len() + data.len())?;
        self.script.extend_from_slice(&prefix);
        self.script.extend_from_slice(data);
        Ok(self)
    }

    /// Push a signed integer.
    ///
    /// `-1` and `0..=16` use the small-int opcodes; other values are pushed
    /// as minimally encoded script numbers.
    pub fn add_i64(&mut self, val: i64) -> Result<&mut Self, TxScriptError> {
        match val {
            0 => self.add_op(OP_0),
            -1 => self.add_op(OP_1NEGATE),
            1..=16 => self.add_op(OP_1 - 1 + val as u8),
            _ => self.add_data(&serialize_i64(val)),
        }
    }

    /// Push an unsigned 64-bit integer as a script number.
    pub fn add_u64(&mut self, val: u64) -> Result<&mut Self, TxScriptError> {
        match val {
            0..=16 => self.add_i64(val as i64),
            _ => self.add_data(&serialize_u64(val)),
        }
    }

    /// Push a lock time for `OP_CHECKLOCKTIMEVERIFY` scripts.
    pub fn add_lock_time(&mut self, lock_time: u64) -> Result<&mut Self, TxScriptError> {
        self.add_u64(lock_time)
    }

    /// Push a sequence number for `OP_CHECKSEQUENCEVERIFY` scripts.
    pub fn add_sequence(&mut self, sequence: u64) -> Result<&mut Self, TxScriptError> {
        self.add_u64(sequence)
    }

    /// Blake2b-256 of the assembled script.
    pub fn script_hash(&self) -> [u8; 32] {
        blake2b_256(&self.script)
    }

    /// Wrap the hash of the assembled script in a pay-to-script-hash locking script.
    pub fn create_pay_to_script_hash_script(&self) -> ScriptPublicKey {
        pay_to_script_hash_script(&self.script)
    }
}

/// Minimal little-endian script-number encoding with a sign bit.
pub fn serialize_i64(val: i64) -> Vec<u8> {
    if val == 0 {
        return Vec::new();
    }
    let negative = val < 0;
    let mut result = magnitude_bytes(val.unsigned_abs());
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }
    result
}

fn serialize_u64(val: u64) -> Vec<u8> {
    let mut result = magnitude_bytes(val);
    if result.last().is_some_and(|b| b & 0x80 != 0) {
        result.push(0x00);
    }
    result
}

fn magnitude_bytes(mut abs: u64) -> Vec<u8> {
    let mut result = Vec::with_capacity(9);
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    result
}
