//! Error types for node and indexer operations.

/// Errors that can occur when talking to resolvers, nodes or the indexer.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// WebSocket transport failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Failed to serialize or deserialize data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Resolver configuration could not be parsed.
    #[error("resolver config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Non-success HTTP status.
    #[error("server error ({status_code}): {message}")]
    ServerError {
        /// HTTP status code.
        status_code: u16,
        /// Response body.
        message: String,
    },

    /// The node answered a call with an error, e.g. a rejected submission.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// The indexer answered with a non-successful message.
    #[error("indexer error: {0}")]
    Indexer(String),

    /// A response did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The network id cannot be used for endpoint resolution.
    #[error("invalid network id: {0}")]
    InvalidNetworkId(String),

    /// No connection is open.
    #[error("not connected")]
    NotConnected,

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Every resolver candidate failed.
    #[error("all resolvers failed: {}", format_failures(.0))]
    ResolverExhausted(Vec<(String, String)>),

    /// An underlying script error (forwarded from `kas-script`).
    #[error("script error: {0}")]
    Script(#[from] kas_script::TxScriptError),

    /// An underlying primitives error (forwarded from `kas-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] kas_primitives::PrimitivesError),
}

fn format_failures(failures: &[(String, String)]) -> String {
    if failures.is_empty() {
        return "no candidates configured".to_string();
    }
    failures
        .iter()
        .map(|(url, err)| format!("{url}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}
