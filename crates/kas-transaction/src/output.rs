//! Transaction output with a value and a locking script.

use kas_script::ScriptPublicKey;
use serde::{Deserialize, Serialize};

/// A single output of a transaction.
///
/// # Canonical encoding
///
/// | Field              | Size                         |
/// |--------------------|------------------------------|
/// | value              | 8 bytes (LE)                 |
/// | script version     | 2 bytes (LE)                 |
/// | script             | u64 length (LE) + bytes      |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    /// Amount in sompi.
    pub value: u64,
    /// Spending condition.
    pub script_public_key: ScriptPublicKey,
}

impl TransactionOutput {
    /// Create an output.
    pub fn new(value: u64, script_public_key: ScriptPublicKey) -> Self {
        TransactionOutput {
            value,
            script_public_key,
        }
    }
}
