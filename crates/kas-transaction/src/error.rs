/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// The number of UTXO entries does not match the number of inputs.
    #[error("entry count {entries} does not match input count {inputs}")]
    EntriesMismatch {
        /// Number of inputs.
        inputs: usize,
        /// Number of entries.
        entries: usize,
    },
    /// An input index past the end of the input list.
    #[error("input index {index} out of range (tx has {len} inputs)")]
    InputIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Input count.
        len: usize,
    },
    /// The sighash type byte is not a valid combination.
    #[error("invalid sighash type {0:#04x}")]
    InvalidSigHashType(u8),
    /// An error occurred while signing an input.
    #[error("signing error: {0}")]
    SigningError(String),
    /// An underlying script error (forwarded from `kas-script`).
    #[error("script error: {0}")]
    Script(#[from] kas_script::TxScriptError),
    /// An underlying primitives error (forwarded from `kas-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] kas_primitives::PrimitivesError),
}
