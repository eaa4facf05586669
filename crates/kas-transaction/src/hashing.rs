//! Canonical transaction encoding and the id/hash derived from it.
//!
//! Field order (all integers little-endian, lengths as u64):
//!
//! | Field            | Encoding                                    |
//! |------------------|---------------------------------------------|
//! | version          | u16                                         |
//! | inputs           | count, then each input (see below)          |
//! | outputs          | count, then value u64, script version u16, script bytes |
//! | lock_time        | u64                                         |
//! | subnetwork_id    | 20 raw bytes                                |
//! | gas              | u64                                         |
//! | payload          | length-prefixed bytes                       |
//! | mass             | u64, only when committed and non-zero       |
//!
//! An input is the outpoint (32-byte id, u32 index), then either the
//! length-prefixed signature script followed by the sig-op count byte, or,
//! when signature scripts are excluded, an empty length-prefixed script
//! only; then the u64 sequence.

use kas_primitives::chainhash::Hash;
use kas_primitives::hash::DomainHasher;
use kas_primitives::util::{ByteWriter, HashWriter};

use crate::input::TransactionInput;
use crate::outpoint::TransactionOutpoint;
use crate::output::TransactionOutput;
use crate::transaction::Transaction;

/// Which optional parts of a transaction the encoding covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EncodingFlags {
    /// Replace every signature script with an empty one and drop sig-op counts.
    pub exclude_signature_script: bool,
    /// Append the mass field when it is non-zero.
    pub include_mass: bool,
}

impl EncodingFlags {
    /// Everything, without the mass commitment.
    pub const FULL: EncodingFlags = EncodingFlags {
        exclude_signature_script: false,
        include_mass: false,
    };

    /// Signature scripts blanked, as used for non-coinbase ids.
    pub const EXCLUDE_SIGNATURE_SCRIPT: EncodingFlags = EncodingFlags {
        exclude_signature_script: true,
        include_mass: false,
    };
}

/// Full transaction hash under the `TransactionHash` domain.
///
/// # Arguments
/// * `tx` - The transaction.
/// * `include_mass_field` - Whether a non-zero mass is committed to.
pub fn hash(tx: &Transaction, include_mass_field: bool) -> Hash {
    let flags = EncodingFlags {
        exclude_signature_script: false,
        include_mass: include_mass_field,
    };
    let mut hasher = DomainHasher::transaction_hash();
    write_transaction(&mut hasher, tx, flags);
    hasher.finalize()
}

/// Transaction id under the `TransactionID` domain.
///
/// Signature scripts are excluded for every transaction except coinbase,
/// and mass is never committed, so signing or setting mass leaves the id
/// unchanged.
pub fn id(tx: &Transaction) -> Hash {
    let flags = if tx.is_coinbase() {
        EncodingFlags::FULL
    } else {
        EncodingFlags::EXCLUDE_SIGNATURE_SCRIPT
    };
    let mut hasher = DomainHasher::transaction_id();
    write_transaction(&mut hasher, tx, flags);
    hasher.finalize()
}

/// The canonical byte encoding the hashers consume.
pub fn encode(tx: &Transaction, flags: EncodingFlags) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(256);
    write_transaction(&mut writer, tx, flags);
    writer.into_bytes()
}

/// Write `tx` in canonical order into any `HashWriter`.
pub fn write_transaction<W: HashWriter>(writer: &mut W, tx: &Transaction, flags: EncodingFlags) {
    writer.write_u16(tx.version).write_len(tx.inputs.len());
    for input in &tx.inputs {
        write_input(writer, input, flags);
    }

    writer.write_len(tx.outputs.len());
    for output in &tx.outputs {
        write_output(writer, output);
    }

    writer
        .write_u64(tx.lock_time)
        .update(tx.subnetwork_id.as_bytes())
        .write_u64(tx.gas)
        .write_var_bytes(&tx.payload);

    if flags.include_mass && tx.mass() > 0 {
        writer.write_u64(tx.mass());
    }
}

fn write_input<W: HashWriter>(writer: &mut W, input: &TransactionInput, flags: EncodingFlags) {
    write_outpoint(writer, &input.previous_outpoint);
    if flags.exclude_signature_script {
        writer.write_var_bytes(&[]);
    } else {
        writer
            .write_var_bytes(&input.signature_script)
            .write_u8(input.sig_op_count);
    }
    writer.write_u64(input.sequence);
}

pub(crate) fn write_outpoint<W: HashWriter>(writer: &mut W, outpoint: &TransactionOutpoint) {
    writer
        .update(outpoint.transaction_id.as_bytes())
        .write_u32(outpoint.index);
}

pub(crate) fn write_output<W: HashWriter>(writer: &mut W, output: &TransactionOutput) {
    writer
        .write_u64(output.value)
        .write_u16(output.script_public_key.version)
        .write_var_bytes(&output.script_public_key.script);
}
