//! Transaction input spending a previous output.

use serde::{Deserialize, Serialize};

use crate::outpoint::TransactionOutpoint;

/// A single input of a transaction.
///
/// # Canonical encoding
///
/// | Field              | Size                         |
/// |--------------------|------------------------------|
/// | outpoint txid      | 32 bytes                     |
/// | outpoint index     | 4 bytes (LE)                 |
/// | signature script   | u64 length (LE) + bytes      |
/// | sig op count       | 1 byte                       |
/// | sequence           | 8 bytes (LE)                 |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// The output being spent.
    pub previous_outpoint: TransactionOutpoint,
    /// Unlocking data. Empty until the input is signed.
    #[serde(with = "kas_primitives::util::serde_hex")]
    pub signature_script: Vec<u8>,
    /// Relative lock / replacement sequence.
    pub sequence: u64,
    /// Number of signature operations this input performs.
    pub sig_op_count: u8,
}

impl TransactionInput {
    /// Create an input.
    ///
    /// # Arguments
    /// * `previous_outpoint` - The output being spent.
    /// * `signature_script` - Unlocking data (empty when unsigned).
    /// * `sequence` - Sequence number.
    /// * `sig_op_count` - Signature operations the unlocking performs.
    pub fn new(
        previous_outpoint: TransactionOutpoint,
        signature_script: Vec<u8>,
        sequence: u64,
        sig_op_count: u8,
    ) -> Self {
        TransactionInput {
            previous_outpoint,
            signature_script,
            sequence,
            sig_op_count,
        }
    }

    /// Whether a signature script has been attached.
    pub fn is_signed(&self) -> bool {
        !self.signature_script.is_empty()
    }
}
