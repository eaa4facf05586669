//! Core transaction type.
//!
//! The id is derived from the canonical encoding when the transaction is
//! built and cached. Mass is set after construction (it depends on the
//! finished transaction) and is excluded from the id.

use kas_primitives::chainhash::Hash;

use crate::hashing;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::subnetwork::SubnetworkId;
use crate::TransactionError;

/// Current transaction version.
pub const TX_VERSION: u16 = 0;

/// A Kaspa transaction.
///
/// Fields other than `mass` feed the id. After mutating inputs, outputs or
/// header fields directly, call [`Transaction::finalize`] to refresh the id.
/// Signature scripts of non-coinbase inputs do not feed the id, so signing
/// needs no refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u16,
    /// Inputs, in signing order.
    pub inputs: Vec<TransactionInput>,
    /// Outputs.
    pub outputs: Vec<TransactionOutput>,
    /// Absolute lock time (DAA score or timestamp).
    pub lock_time: u64,
    /// Subnetwork the transaction belongs to.
    pub subnetwork_id: SubnetworkId,
    /// Gas, unused on the native subnetwork.
    pub gas: u64,
    /// Arbitrary payload.
    pub payload: Vec<u8>,
    mass: u64,
    id: Hash,
}

impl Transaction {
    /// Build a transaction and compute its id.
    ///
    /// # Arguments
    /// * `version` - Transaction version.
    /// * `inputs` - Inputs.
    /// * `outputs` - Outputs.
    /// * `lock_time` - Lock time.
    /// * `subnetwork_id` - Subnetwork.
    /// * `gas` - Gas.
    /// * `payload` - Payload bytes.
    pub fn new(
        version: u16,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        lock_time: u64,
        subnetwork_id: SubnetworkId,
        gas: u64,
        payload: Vec<u8>,
    ) -> Self {
        let mut tx = Transaction {
            version,
            inputs,
            outputs,
            lock_time,
            subnetwork_id,
            gas,
            payload,
            mass: 0,
            id: Hash::ZERO,
        };
        tx.finalize();
        tx
    }

    /// A native-subnetwork transaction with default header fields.
    pub fn new_native(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self::new(
            TX_VERSION,
            inputs,
            outputs,
            0,
            SubnetworkId::NATIVE,
            0,
            Vec::new(),
        )
    }

    /// Recompute and cache the id.
    pub fn finalize(&mut self) {
        self.id = hashing::id(self);
    }

    /// The cached transaction id.
    pub fn id(&self) -> Hash {
        self.id
    }

    /// Full hash including signature scripts and the mass commitment.
    pub fn hash(&self) -> Hash {
        hashing::hash(self, true)
    }

    /// Mass committed by the transaction, `0` when not yet set.
    pub fn mass(&self) -> u64 {
        self.mass
    }

    /// Set the mass. Does not affect the id.
    pub fn set_mass(&mut self, mass: u64) {
        self.mass = mass;
    }

    /// Whether this is a coinbase transaction.
    pub fn is_coinbase(&self) -> bool {
        self.subnetwork_id.is_coinbase()
    }

    /// Replace the signature script of one input.
    ///
    /// # Returns
    /// `InputIndexOutOfRange` if `index` is past the last input.
    pub fn set_signature_script(
        &mut self,
        index: usize,
        signature_script: Vec<u8>,
    ) -> Result<(), TransactionError> {
        let len = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(TransactionError::InputIndexOutOfRange { index, len })?;
        input.signature_script = signature_script;
        if self.subnetwork_id.is_coinbase() {
            self.finalize();
        }
        Ok(())
    }

    /// Sum of all output values, or `None` on overflow.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.value))
    }
}
