//! Reference to a previous transaction output.

use std::fmt;

use kas_primitives::chainhash::Hash;
use serde::{Deserialize, Serialize};

/// A `(transaction id, output index)` pair.
///
/// Serializes as `{"transactionId": "<hex>", "index": n}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutpoint {
    /// Id of the transaction that created the output.
    pub transaction_id: Hash,
    /// Index of the output within that transaction.
    pub index: u32,
}

impl TransactionOutpoint {
    /// Create a new outpoint.
    pub fn new(transaction_id: Hash, index: u32) -> Self {
        TransactionOutpoint {
            transaction_id,
            index,
        }
    }
}

impl fmt::Display for TransactionOutpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.index)
    }
}
