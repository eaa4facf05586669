/// Kaspa SDK - Cryptographic primitives, hashing, and utilities.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Domain-separated Blake2b-256 hashers (transaction hash, id, sighash)
/// - SHA-256 and unkeyed Blake2b-256
/// - The 32-byte `Hash` type used for transaction ids
/// - A little-endian `HashWriter` shared by hashers and byte buffers
/// - secp256k1 keys for Schnorr (BIP-340) and ECDSA

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
