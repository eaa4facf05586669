//! Multi-key Schnorr signing of transaction inputs.
//!
//! The signer matches each input's spent locking script against the
//! pay-to-pubkey scripts of the supplied keys. Inputs locked to anything
//! else (notably pay-to-script-hash commit outputs) are left untouched and
//! reported through [`SignedTransaction::Partially`], so the caller can
//! complete them with [`Signable::fill_input`].

use kas_primitives::ec::{PrivateKey, PublicKey};
use kas_script::opcodes::OP_DATA_65;
use kas_script::standard::{is_pay_to_pubkey, pay_to_pub_key};
use kas_script::ScriptPublicKey;

use crate::sighash::{calc_schnorr_signature_hash, SigHashType, SIG_HASH_ALL};
use crate::transaction::Transaction;
use crate::utxo::UtxoEntry;
use crate::TransactionError;

/// A transaction bundled with the UTXO entries its inputs spend.
pub trait Signable {
    /// The transaction.
    fn tx(&self) -> &Transaction;

    /// Mutable access to the transaction, used to attach signature scripts.
    fn tx_mut(&mut self) -> &mut Transaction;

    /// Spent entries, one per input, in input order.
    fn entries(&self) -> &[UtxoEntry];

    /// Attach a signature script to one input.
    ///
    /// Used to complete inputs the key-matching signer cannot handle.
    fn fill_input(&mut self, index: usize, signature_script: Vec<u8>) -> Result<(), TransactionError> {
        self.tx_mut().set_signature_script(index, signature_script)
    }

    /// Whether every input carries a signature script.
    fn is_fully_signed(&self) -> bool {
        self.tx().inputs.iter().all(|i| i.is_signed())
    }
}

/// The minimal `Signable`: a transaction and its spent entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutableTransaction {
    /// The transaction being signed.
    pub tx: Transaction,
    entries: Vec<UtxoEntry>,
}

impl MutableTransaction {
    /// Pair a transaction with its entries.
    ///
    /// # Returns
    /// `EntriesMismatch` unless there is exactly one entry per input.
    pub fn new(tx: Transaction, entries: Vec<UtxoEntry>) -> Result<Self, TransactionError> {
        if tx.inputs.len() != entries.len() {
            return Err(TransactionError::EntriesMismatch {
                inputs: tx.inputs.len(),
                entries: entries.len(),
            });
        }
        Ok(MutableTransaction { tx, entries })
    }
}

impl Signable for MutableTransaction {
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

/// Result of a signing pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignedTransaction<T> {
    /// Every input carries a signature script.
    Fully(T),
    /// At least one input is still unsigned.
    Partially(T),
}

impl<T> SignedTransaction<T> {
    /// Whether the transaction is fully signed.
    pub fn is_fully_signed(&self) -> bool {
        matches!(self, SignedTransaction::Fully(_))
    }

    /// The signed transaction regardless of completeness.
    pub fn unwrap(self) -> T {
        match self {
            SignedTransaction::Fully(t) | SignedTransaction::Partially(t) => t,
        }
    }

    /// The transaction if fully signed.
    pub fn fully_signed(self) -> Result<T, TransactionError> {
        match self {
            SignedTransaction::Fully(t) => Ok(t),
            SignedTransaction::Partially(_) => Err(TransactionError::SigningError(
                "transaction is only partially signed".to_string(),
            )),
        }
    }

    /// The transaction if partially signed.
    pub fn partially_signed(self) -> Result<T, TransactionError> {
        match self {
            SignedTransaction::Partially(t) => Ok(t),
            SignedTransaction::Fully(_) => Err(TransactionError::SigningError(
                "transaction is fully signed".to_string(),
            )),
        }
    }
}

/// Encode a Schnorr signature as a signature-script push: `65 || sig || hash type`.
pub fn schnorr_signature_script(signature: &[u8; 64], hash_type: SigHashType) -> Vec<u8> {
    let mut script = Vec::with_capacity(66);
    script.push(OP_DATA_65);
    script.extend_from_slice(signature);
    script.push(hash_type.to_u8());
    script
}

/// Sign a single input and return its signature push.
///
/// The caller decides where the push goes; for pay-to-pubkey inputs it is
/// the whole signature script, for pay-to-script-hash inputs it precedes the
/// redeem script.
///
/// # Arguments
/// * `tx` - The transaction.
/// * `entries` - Spent entries, one per input.
/// * `input_index` - Index of the input.
/// * `key` - Signing key.
/// * `hash_type` - Sighash flags.
pub fn sign_input(
    tx: &Transaction,
    entries: &[UtxoEntry],
    input_index: usize,
    key: &PrivateKey,
    hash_type: SigHashType,
) -> Result<Vec<u8>, TransactionError> {
    let sig_hash = calc_schnorr_signature_hash(tx, entries, input_index, hash_type)?;
    let signature = key.sign_schnorr(sig_hash.as_bytes())?;
    Ok(schnorr_signature_script(&signature, hash_type))
}

/// Sign every input locked to one of `keys` with `SIG_HASH_ALL`.
///
/// # Arguments
/// * `signable` - Transaction and spent entries.
/// * `keys` - Candidate signing keys.
///
/// # Returns
/// `Fully` when every input ends up with a signature script, otherwise
/// `Partially`. Errors only on malformed input (entries mismatch) or a
/// signing backend failure.
pub fn sign_with_multiple_v2<T: Signable>(
    mut signable: T,
    keys: &[PrivateKey],
) -> Result<SignedTransaction<T>, TransactionError> {
    let scripts: Vec<ScriptPublicKey> = keys
        .iter()
        .map(|k| pay_to_pub_key(&k.public_key().to_bytes()))
        .collect();

    let mut signatures = Vec::new();
    for (index, entry) in signable.entries().iter().enumerate() {
        if let Some(pos) = scripts.iter().position(|s| *s == entry.script_public_key) {
            let script = sign_input(signable.tx(), signable.entries(), index, &keys[pos], SIG_HASH_ALL)?;
            signatures.push((index, script));
        }
    }
    for (index, script) in signatures {
        signable.fill_input(index, script)?;
    }

    if signable.is_fully_signed() {
        Ok(SignedTransaction::Fully(signable))
    } else {
        Ok(SignedTransaction::Partially(signable))
    }
}

/// Verify the signature on a pay-to-pubkey input.
///
/// # Returns
/// `Ok(true)` if the signature script is a valid Schnorr signature by the
/// key the entry pays to, `Ok(false)` if it is missing or does not verify,
/// and an error for inputs that are not pay-to-pubkey.
pub fn verify_input_signature(
    tx: &Transaction,
    entries: &[UtxoEntry],
    input_index: usize,
) -> Result<bool, TransactionError> {
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(TransactionError::InputIndexOutOfRange {
            index: input_index,
            len: tx.inputs.len(),
        })?;
    let entry = entries.get(input_index).ok_or(TransactionError::EntriesMismatch {
        inputs: tx.inputs.len(),
        entries: entries.len(),
    })?;
    let script = &entry.script_public_key.script;
    if !is_pay_to_pubkey(script) {
        return Err(TransactionError::SigningError(format!(
            "input {} is not pay-to-pubkey",
            input_index
        )));
    }

    let sig_script = &input.signature_script;
    if sig_script.len() != 66 || sig_script[0] != OP_DATA_65 {
        return Ok(false);
    }
    let hash_type = SigHashType::from_u8(sig_script[65])?;
    let public_key = PublicKey::from_bytes(&script[1..33])?;
    let sig_hash = calc_schnorr_signature_hash(tx, entries, input_index, hash_type)?;
    Ok(public_key.verify_schnorr(sig_hash.as_bytes(), &sig_script[1..65]))
}
