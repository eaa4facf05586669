/// Elliptic curve cryptography on secp256k1.
///
/// Provides BIP-340 Schnorr private keys and x-only public keys.

pub mod private_key;
pub mod public_key;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;

/// Length of a BIP-340 Schnorr signature in bytes.
pub const SCHNORR_SIGNATURE_LEN: usize = 64;
