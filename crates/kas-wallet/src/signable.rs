//! Generated transactions awaiting signatures.

use kas_primitives::chainhash::Hash;
use kas_primitives::ec::PrivateKey;
use kas_script::Address;
use kas_transaction::mass::calc_compute_mass;
use kas_transaction::{
    sign_with_multiple_v2, Signable, SignedTransaction, SubmittableTransaction, Transaction,
    TransactionError, UtxoEntry,
};

use crate::error::WalletError;

/// Position of a transaction within a generated batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Not produced by a generator run.
    #[default]
    NoOp,
    /// First compound transaction of a batch.
    Node,
    /// Later compound transaction, spending the previous one's change.
    Edge,
    /// The transaction carrying the requested outputs.
    Final,
}

/// A generated transaction, its spent entries and its accounting.
///
/// `aggregate_input_amount == aggregate_output_amount + fee_amount` holds
/// for every transaction the generator emits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignableTransaction {
    /// The transaction.
    pub tx: Transaction,
    entries: Vec<UtxoEntry>,
    addresses: Vec<Address>,
    /// Amount paid to the requested outputs, `None` for compound transactions.
    pub payment_amount: Option<u64>,
    /// Amount returned to the change address.
    pub change_amount: u64,
    /// Sum of spent entries.
    pub aggregate_input_amount: u64,
    /// Sum of outputs.
    pub aggregate_output_amount: u64,
    /// Signatures needed per input.
    pub minimum_signatures: u16,
    /// Mass of the signed transaction.
    pub mass: u64,
    /// Total fee paid.
    pub fee_amount: u64,
    /// Position within the batch.
    pub kind: DataKind,
}

impl SignableTransaction {
    /// Wrap a transaction with its entries and accounting.
    ///
    /// # Returns
    /// `EntriesMismatch` unless there is one entry per input.
    pub fn new(
        tx: Transaction,
        entries: Vec<UtxoEntry>,
        addresses: Vec<Address>,
        payment_amount: Option<u64>,
        change_amount: u64,
        minimum_signatures: u16,
        fee_amount: u64,
        kind: DataKind,
    ) -> Result<Self, WalletError> {
        if tx.inputs.len() != entries.len() {
            return Err(TransactionError::EntriesMismatch {
                inputs: tx.inputs.len(),
                entries: entries.len(),
            }
            .into());
        }
        let aggregate_input_amount = entries.iter().map(|e| e.amount).sum();
        let aggregate_output_amount = tx.outputs.iter().map(|o| o.value).sum();
        Ok(SignableTransaction {
            mass: tx.mass(),
            tx,
            entries,
            addresses,
            payment_amount,
            change_amount,
            aggregate_input_amount,
            aggregate_output_amount,
            minimum_signatures,
            fee_amount,
            kind,
        })
    }

    /// Transaction id.
    pub fn id(&self) -> Hash {
        self.tx.id()
    }

    /// Addresses the spent entries belong to, without duplicates.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Whether this is the last transaction of its batch.
    pub fn is_final(&self) -> bool {
        self.kind == DataKind::Final
    }

    /// Whether every input carries a signature script.
    pub fn is_fully_signed(&self) -> bool {
        Signable::is_fully_signed(self)
    }

    /// Sign every input locked to one of `keys`.
    pub fn sign(self, keys: &[PrivateKey]) -> Result<SignedTransaction<Self>, WalletError> {
        Ok(sign_with_multiple_v2(self, keys)?)
    }

    /// Refresh the mass from the attached signature scripts.
    pub fn update_mass(&mut self) {
        let mass = calc_compute_mass(&self.tx);
        self.tx.set_mass(mass);
        self.mass = mass;
    }

    /// Wire shape for `submitTransaction`.
    pub fn to_submittable(&self) -> SubmittableTransaction {
        SubmittableTransaction::from(&self.tx)
    }
}

impl Signable for SignableTransaction {
    fn tx(&self) -> &Transaction {
        &self.tx
    }

    fn tx_mut(&mut self) -> &mut Transaction {
        &mut self.tx
    }

    fn entries(&self) -> &[UtxoEntry] {
        &self.entries
    }
}
