/// Error types for script and address operations.
///
/// Covers script assembly limits, push-data decoding, address codec
/// failures, and unrecognized script classes.
#[derive(Debug, thiserror::Error)]
pub enum TxScriptError {
    /// A single pushed element exceeds the maximum element size.
    #[error("element size {0} exceeds max allowed size 520")]
    ElementTooBig(usize),

    /// The assembled script would exceed the maximum script size.
    #[error("adding {added} bytes would exceed the maximum script size of 10000 (current {current})")]
    ScriptTooLarge {
        /// Current script length.
        current: usize,
        /// Bytes about to be appended.
        added: usize,
    },

    /// Push data ran past the end of the script.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data length does not fit any push opcode.
    #[error("data too big")]
    DataTooBig,

    /// The script public key does not belong to a supported standard class.
    #[error("unsupported script public key format: {0}")]
    PubKeyFormat(String),

    /// Address string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address prefix is not one of the known network prefixes.
    #[error("invalid address prefix: {0}")]
    InvalidPrefix(String),

    /// Address version byte is not recognized.
    #[error("invalid address version: {0}")]
    InvalidVersion(u8),

    /// Address payload length does not match its version.
    #[error("invalid payload length {got} for version {version}, expected {expected}")]
    InvalidPayloadLength {
        /// Address version byte.
        version: u8,
        /// Expected payload length.
        expected: usize,
        /// Actual payload length.
        got: usize,
    },

    /// Address character outside the charset.
    #[error("bad char '{0}'")]
    EncodingBadChar(char),

    /// Address checksum does not match.
    #[error("checksum failed")]
    EncodingChecksumFailed,

    /// Network identifier string could not be parsed.
    #[error("invalid network id: {0}")]
    InvalidNetworkId(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] kas_primitives::PrimitivesError),
}
