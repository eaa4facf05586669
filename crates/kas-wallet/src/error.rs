/// Error types for transaction generation and wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The entry pool cannot cover the payment and fees.
    #[error("insufficient funds: required {required} sompi, available {available} sompi")]
    InsufficientFunds {
        /// Amount the transaction needs, including fees.
        required: u64,
        /// Amount the pool could provide.
        available: u64,
    },
    /// Generator settings are inconsistent.
    #[error("invalid generator settings: {0}")]
    InvalidSettings(String),
    /// The outputs alone leave no room for inputs under the mass limit.
    #[error("mass limit exceeded: {mass} > {limit}")]
    MassLimitExceeded {
        /// Mass of the smallest transaction that could make progress.
        mass: u64,
        /// The configured limit.
        limit: u64,
    },
    /// Signing left inputs without a signature script.
    #[error("transaction {0} is not fully signed")]
    SigningIncomplete(String),
    /// The commit output did not appear in the node's UTXO index in time.
    #[error("commit output {0} not found after polling")]
    CommitNotFound(String),
    /// An asset is not supported by this operation.
    #[error("unsupported asset: {0}")]
    UnsupportedAsset(String),
    /// A value returned by a collaborator could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// An underlying transaction error (forwarded from `kas-transaction`).
    #[error("transaction error: {0}")]
    Transaction(#[from] kas_transaction::TransactionError),
    /// An underlying script error (forwarded from `kas-script`).
    #[error("script error: {0}")]
    Script(#[from] kas_script::TxScriptError),
    /// An underlying primitives error (forwarded from `kas-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] kas_primitives::PrimitivesError),
    /// A node or indexer error (forwarded from `kas-rpc`).
    #[error("rpc error: {0}")]
    Rpc(#[from] kas_rpc::RpcError),
    /// Failed to serialize an inscription payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
