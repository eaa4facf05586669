//! Unspent outputs and payment requests.
//!
//! `UtxoEntry` is the bare ledger record. `ClientUtxoEntry` composes it with
//! the outpoint that locates it and the address it was fetched for.

use kas_script::{Address, ScriptPublicKey};
use serde::{Deserialize, Serialize};

use crate::outpoint::TransactionOutpoint;

/// An unspent output as stored in the UTXO set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoEntry {
    /// Amount in sompi.
    pub amount: u64,
    /// Locking script of the output.
    pub script_public_key: ScriptPublicKey,
    /// DAA score of the block that accepted the output.
    pub block_daa_score: u64,
    /// Whether the output comes from a coinbase transaction.
    pub is_coinbase: bool,
}

impl UtxoEntry {
    /// Create an entry.
    pub fn new(
        amount: u64,
        script_public_key: ScriptPublicKey,
        block_daa_score: u64,
        is_coinbase: bool,
    ) -> Self {
        UtxoEntry {
            amount,
            script_public_key,
            block_daa_score,
            is_coinbase,
        }
    }
}

/// A UTXO entry located by its outpoint, as returned to a wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUtxoEntry {
    /// Address the entry was queried for, when known.
    pub address: Option<Address>,
    /// Where the output lives.
    pub outpoint: TransactionOutpoint,
    /// The ledger record.
    #[serde(rename = "utxoEntry")]
    pub entry: UtxoEntry,
}

impl ClientUtxoEntry {
    /// Create a client entry.
    pub fn new(address: Option<Address>, outpoint: TransactionOutpoint, entry: UtxoEntry) -> Self {
        ClientUtxoEntry {
            address,
            outpoint,
            entry,
        }
    }

    /// Amount in sompi.
    pub fn amount(&self) -> u64 {
        self.entry.amount
    }

    /// Locking script of the output.
    pub fn script_public_key(&self) -> &ScriptPublicKey {
        &self.entry.script_public_key
    }
}

/// A requested payment, not yet turned into a transaction output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutput {
    /// Recipient.
    pub address: Address,
    /// Amount in sompi.
    pub amount: u64,
}

impl PaymentOutput {
    /// Create a payment request.
    pub fn new(address: Address, amount: u64) -> Self {
        PaymentOutput { address, amount }
    }
}
