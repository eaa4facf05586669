//! Signature hash computation for Schnorr signing.
//!
//! The sighash commits to the spent output (script and amount), the
//! outpoints, sequences and sig-op counts of the inputs, the outputs, and the
//! header fields. Sub-hashes and the final digest all use the
//! `TransactionSigningHash` domain.

use kas_primitives::chainhash::Hash;
use kas_primitives::hash::DomainHasher;
use kas_primitives::util::HashWriter;

use crate::hashing::{write_outpoint, write_output};
use crate::transaction::Transaction;
use crate::utxo::UtxoEntry;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIG_HASH_ALL: SigHashType = SigHashType(0b0000_0001);

/// Sign all inputs but no outputs.
pub const SIG_HASH_NONE: SigHashType = SigHashType(0b0000_0010);

/// Sign all inputs and only the output with the same index.
pub const SIG_HASH_SINGLE: SigHashType = SigHashType(0b0000_0100);

/// Modifier: only sign the current input.
pub const SIG_HASH_ANY_ONE_CAN_PAY: SigHashType = SigHashType(0b1000_0000);

/// `ALL | ANYONECANPAY`.
pub const SIG_HASH_ALL_ANYONECANPAY: SigHashType = SigHashType(0b1000_0001);

/// `NONE | ANYONECANPAY`.
pub const SIG_HASH_NONE_ANYONECANPAY: SigHashType = SigHashType(0b1000_0010);

/// `SINGLE | ANYONECANPAY`.
pub const SIG_HASH_SINGLE_ANYONECANPAY: SigHashType = SigHashType(0b1000_0100);

const SIG_HASH_MASK: u8 = 0b0000_0111;

const ALLOWED_SIG_HASH_TYPES: [SigHashType; 6] = [
    SIG_HASH_ALL,
    SIG_HASH_NONE,
    SIG_HASH_SINGLE,
    SIG_HASH_ALL_ANYONECANPAY,
    SIG_HASH_NONE_ANYONECANPAY,
    SIG_HASH_SINGLE_ANYONECANPAY,
];

/// A validated sighash type byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SigHashType(u8);

impl SigHashType {
    /// Validate a raw sighash byte.
    pub fn from_u8(val: u8) -> Result<Self, TransactionError> {
        let ty = SigHashType(val);
        if ALLOWED_SIG_HASH_TYPES.contains(&ty) {
            Ok(ty)
        } else {
            Err(TransactionError::InvalidSigHashType(val))
        }
    }

    /// The raw byte, appended to signatures.
    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// Base type is ALL.
    pub fn is_sighash_all(self) -> bool {
        self.0 & SIG_HASH_MASK == SIG_HASH_ALL.0
    }

    /// Base type is NONE.
    pub fn is_sighash_none(self) -> bool {
        self.0 & SIG_HASH_MASK == SIG_HASH_NONE.0
    }

    /// Base type is SINGLE.
    pub fn is_sighash_single(self) -> bool {
        self.0 & SIG_HASH_MASK == SIG_HASH_SINGLE.0
    }

    /// ANYONECANPAY modifier set.
    pub fn is_sighash_anyone_can_pay(self) -> bool {
        self.0 & SIG_HASH_ANY_ONE_CAN_PAY.0 == SIG_HASH_ANY_ONE_CAN_PAY.0
    }
}

impl TryFrom<u8> for SigHashType {
    type Error = TransactionError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        SigHashType::from_u8(val)
    }
}

// -----------------------------------------------------------------------
// Schnorr signature hash
// -----------------------------------------------------------------------

/// Compute the Schnorr signature hash for one input.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `entries` - The spent UTXO entries, one per input, in input order.
/// * `input_index` - Index of the input being signed.
/// * `hash_type` - Sighash flags.
///
/// # Returns
/// The 32-byte digest to sign, or an error if the index is out of range or
/// the entries do not line up with the inputs.
pub fn calc_schnorr_signature_hash(
    tx: &Transaction,
    entries: &[UtxoEntry],
    input_index: usize,
    hash_type: SigHashType,
) -> Result<Hash, TransactionError> {
    if entries.len() != tx.inputs.len() {
        return Err(TransactionError::EntriesMismatch {
            inputs: tx.inputs.len(),
            entries: entries.len(),
        });
    }
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(TransactionError::InputIndexOutOfRange {
            index: input_index,
            len: tx.inputs.len(),
        })?;
    let entry = &entries[input_index];

    let mut hasher = DomainHasher::transaction_signing();
    hasher
        .write_u16(tx.version)
        .update(previous_outputs_hash(tx, hash_type).as_bytes())
        .update(sequences_hash(tx, hash_type).as_bytes())
        .update(sig_op_counts_hash(tx, hash_type).as_bytes());
    write_outpoint(&mut hasher, &input.previous_outpoint);
    hasher
        .write_u16(entry.script_public_key.version)
        .write_var_bytes(&entry.script_public_key.script)
        .write_u64(entry.amount)
        .write_u64(input.sequence)
        .write_u8(input.sig_op_count)
        .update(outputs_hash(tx, hash_type, input_index).as_bytes())
        .write_u64(tx.lock_time)
        .update(tx.subnetwork_id.as_bytes())
        .write_u64(tx.gas)
        .update(payload_hash(tx).as_bytes())
        .write_u8(hash_type.to_u8());
    Ok(hasher.finalize())
}

// -----------------------------------------------------------------------
// Internal helper functions
// -----------------------------------------------------------------------

fn previous_outputs_hash(tx: &Transaction, hash_type: SigHashType) -> Hash {
    if hash_type.is_sighash_anyone_can_pay() {
        return Hash::ZERO;
    }
    let mut hasher = DomainHasher::transaction_signing();
    for input in &tx.inputs {
        write_outpoint(&mut hasher, &input.previous_outpoint);
    }
    hasher.finalize()
}

fn sequences_hash(tx: &Transaction, hash_type: SigHashType) -> Hash {
    if hash_type.is_sighash_single()
        || hash_type.is_sighash_anyone_can_pay()
        || hash_type.is_sighash_none()
    {
        return Hash::ZERO;
    }
    let mut hasher = DomainHasher::transaction_signing();
    for input in &tx.inputs {
        hasher.write_u64(input.sequence);
    }
    hasher.finalize()
}

fn sig_op_counts_hash(tx: &Transaction, hash_type: SigHashType) -> Hash {
    if hash_type.is_sighash_anyone_can_pay() {
        return Hash::ZERO;
    }
    let mut hasher = DomainHasher::transaction_signing();
    for input in &tx.inputs {
        hasher.write_u8(input.sig_op_count);
    }
    hasher.finalize()
}

fn payload_hash(tx: &Transaction) -> Hash {
    if tx.subnetwork_id.is_native() && tx.payload.is_empty() {
        return Hash::ZERO;
    }
    let mut hasher = DomainHasher::transaction_signing();
    hasher.write_var_bytes(&tx.payload);
    hasher.finalize()
}

fn outputs_hash(tx: &Transaction, hash_type: SigHashType, input_index: usize) -> Hash {
    if hash_type.is_sighash_none() {
        return Hash::ZERO;
    }
    if hash_type.is_sighash_single() {
        let Some(output) = tx.outputs.get(input_index) else {
            return Hash::ZERO;
        };
        let mut hasher = DomainHasher::transaction_signing();
        write_output(&mut hasher, output);
        return hasher.finalize();
    }
    let mut hasher = DomainHasher::transaction_signing();
    for output in &tx.outputs {
        write_output(&mut hasher, output);
    }
    hasher.finalize()
}
