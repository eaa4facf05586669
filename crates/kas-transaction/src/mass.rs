//! Transaction mass and fee arithmetic.
//!
//! Mass is the cost metric used for fees and size limits:
//!
//! ```text
//! mass = serialized_size * MASS_PER_TX_BYTE
//!      + sum(2 + script_len of each output) * MASS_PER_SCRIPT_PUB_KEY_BYTE
//!      + sum(sig_op_count of each input) * MASS_PER_SIG_OP
//! ```
//!
//! Unsigned transactions are measured with empty signature scripts; the
//! signature bytes are added separately via [`calc_signature_mass`].

use kas_primitives::chainhash::HASH_SIZE;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::subnetwork::SUBNETWORK_ID_SIZE;
use crate::transaction::Transaction;

/// Mass charged per serialized byte.
pub const MASS_PER_TX_BYTE: u64 = 1;

/// Mass charged per byte of output locking script (including its version).
pub const MASS_PER_SCRIPT_PUB_KEY_BYTE: u64 = 10;

/// Mass charged per signature operation.
pub const MASS_PER_SIG_OP: u64 = 1000;

/// Largest mass a standard transaction may have.
pub const MAXIMUM_STANDARD_TRANSACTION_MASS: u64 = 100_000;

/// Minimum relay fee in sompi per 1000 mass.
pub const MINIMUM_RELAY_TRANSACTION_FEE: u64 = 1000;

/// Size of a Schnorr signature script: push byte, 64-byte signature, sighash byte.
pub const SIGNATURE_SIZE: u64 = 1 + 64 + 1;

/// Sompi per KAS.
pub const SOMPI_PER_KASPA: u64 = 100_000_000;

/// Serialized size of an outpoint.
const OUTPOINT_SIZE: u64 = HASH_SIZE as u64 + 4;

/// Serialized size of an input, including its current signature script.
pub fn transaction_input_serialized_byte_size(input: &TransactionInput) -> u64 {
    OUTPOINT_SIZE
        + 8 // signature script length
        + input.signature_script.len() as u64
        + 1 // sig op count
        + 8 // sequence
}

/// Serialized size of an output.
pub fn transaction_output_serialized_byte_size(output: &TransactionOutput) -> u64 {
    8 // value
        + 2 // script version
        + 8 // script length
        + output.script_public_key.script.len() as u64
}

/// Serialized size of a transaction with no inputs, outputs or payload.
pub fn blank_transaction_serialized_byte_size() -> u64 {
    2 // version
        + 8 // input count
        + 8 // output count
        + 8 // lock time
        + SUBNETWORK_ID_SIZE as u64
        + 8 // gas
        + HASH_SIZE as u64 // payload hash
        + 8 // payload length
}

/// Serialized size of a whole transaction.
pub fn transaction_serialized_byte_size(tx: &Transaction) -> u64 {
    blank_transaction_serialized_byte_size()
        + tx.inputs.iter().map(transaction_input_serialized_byte_size).sum::<u64>()
        + tx.outputs.iter().map(transaction_output_serialized_byte_size).sum::<u64>()
        + tx.payload.len() as u64
}

/// Mass contributed by one input on top of the blank transaction.
pub fn calc_mass_for_input(input: &TransactionInput) -> u64 {
    transaction_input_serialized_byte_size(input) * MASS_PER_TX_BYTE
        + input.sig_op_count as u64 * MASS_PER_SIG_OP
}

/// Mass contributed by one output on top of the blank transaction.
pub fn calc_mass_for_output(output: &TransactionOutput) -> u64 {
    let script_mass = (2 + output.script_public_key.script.len() as u64) * MASS_PER_SCRIPT_PUB_KEY_BYTE;
    transaction_output_serialized_byte_size(output) * MASS_PER_TX_BYTE + script_mass
}

/// Mass of a transaction with no inputs and outputs but the given payload.
pub fn blank_transaction_mass(payload_len: usize) -> u64 {
    (blank_transaction_serialized_byte_size() + payload_len as u64) * MASS_PER_TX_BYTE
}

/// Mass of the signature scripts still to be attached.
///
/// # Arguments
/// * `minimum_signatures` - Number of Schnorr signatures expected.
pub fn calc_signature_mass(minimum_signatures: u64) -> u64 {
    minimum_signatures * SIGNATURE_SIZE * MASS_PER_TX_BYTE
}

/// Compute mass of a transaction as it currently stands.
pub fn calc_compute_mass(tx: &Transaction) -> u64 {
    blank_transaction_mass(tx.payload.len())
        + tx.inputs.iter().map(calc_mass_for_input).sum::<u64>()
        + tx.outputs.iter().map(calc_mass_for_output).sum::<u64>()
}

/// Fee for `mass` at `rate` sompi per 1000 mass, rounded up.
pub fn calc_fee_for_mass(mass: u64, rate: u64) -> u64 {
    (mass as u128 * rate as u128).div_ceil(1000) as u64
}

/// Minimum relay fee for `mass`.
pub fn calc_minimum_transaction_relay_fee(mass: u64) -> u64 {
    calc_fee_for_mass(mass, MINIMUM_RELAY_TRANSACTION_FEE)
}

/// Whether an output is too small to be worth spending at `relay_rate`.
///
/// An output is dust when spending it would cost more than a third of its
/// value at the given relay rate. A zero rate makes nothing dust except zero
/// value outputs.
pub fn is_transaction_output_dust(output: &TransactionOutput, relay_rate: u64) -> bool {
    if output.value == 0 {
        return true;
    }
    // The spending input: outpoint, signature script, sig op count, sequence.
    let spend_size = transaction_output_serialized_byte_size(output)
        + OUTPOINT_SIZE
        + 8
        + SIGNATURE_SIZE
        + 1
        + 8;
    (output.value as u128) * 1000 / 3 < spend_size as u128 * relay_rate as u128
}
