//! Hash function primitives for the SDK.
//!
//! Transaction hashing uses Blake2b-256 in keyed mode, with the key acting as
//! a domain separator: the same bytes hashed under `"TransactionHash"`,
//! `"TransactionID"` and `"TransactionSigningHash"` yield unrelated digests.
//! Script hashes (P2SH) use unkeyed Blake2b-256.

use blake2::digest::consts::U32;
use blake2::digest::Mac;
use blake2::{Blake2b, Blake2bMac, Digest};

use crate::chainhash::Hash;
use crate::util::HashWriter;

/// Key for the full transaction hash (includes signature scripts and mass).
pub const TRANSACTION_HASH_DOMAIN: &[u8] = b"TransactionHash";

/// Key for the transaction id (signature scripts blanked for non-coinbase).
pub const TRANSACTION_ID_DOMAIN: &[u8] = b"TransactionID";

/// Key for per-input Schnorr signature hashes.
pub const TRANSACTION_SIGNING_DOMAIN: &[u8] = b"TransactionSigningHash";

/// Key for personal (off-chain) message signing.
pub const PERSONAL_MESSAGE_SIGNING_DOMAIN: &[u8] = b"PersonalMessageSigningHash";

type Blake2b256 = Blake2b<U32>;

/// Compute unkeyed Blake2b-256 of the input data.
///
/// This is the script hash used by pay-to-script-hash outputs.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte Blake2b digest.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Streaming keyed Blake2b-256 hasher bound to one domain key.
///
/// Implements `HashWriter`, so transaction fields can be written into it
/// directly in canonical order.
#[derive(Clone)]
pub struct DomainHasher {
    inner: Blake2bMac<U32>,
}

impl DomainHasher {
    /// Create a hasher keyed with the given domain.
    ///
    /// Domain keys are the short ASCII constants in this module, well under
    /// the 64-byte Blake2b key limit.
    pub fn new(domain: &'static [u8]) -> Self {
        let inner = Blake2bMac::<U32>::new_with_salt_and_personal(domain, &[], &[])
            .expect("domain keys are shorter than the blake2b key limit");
        DomainHasher { inner }
    }

    /// Hasher for full transaction hashes.
    pub fn transaction_hash() -> Self {
        Self::new(TRANSACTION_HASH_DOMAIN)
    }

    /// Hasher for transaction ids.
    pub fn transaction_id() -> Self {
        Self::new(TRANSACTION_ID_DOMAIN)
    }

    /// Hasher for signature hashes.
    pub fn transaction_signing() -> Self {
        Self::new(TRANSACTION_SIGNING_DOMAIN)
    }

    /// Hasher for personal message signing.
    pub fn personal_message() -> Self {
        Self::new(PERSONAL_MESSAGE_SIGNING_DOMAIN)
    }

    /// Finish hashing and return the 32-byte digest.
    pub fn finalize(self) -> Hash {
        let bytes: [u8; 32] = self.inner.finalize().into_bytes().into();
        Hash::new(bytes)
    }

    /// One-shot keyed hash of `data` under `domain`.
    pub fn hash(domain: &'static [u8], data: &[u8]) -> Hash {
        let mut hasher = Self::new(domain);
        hasher.update(data);
        hasher.finalize()
    }
}

impl HashWriter for DomainHasher {
    fn update(&mut self, data: &[u8]) -> &mut Self {
        Mac::update(&mut self.inner, data);
        self
    }
}

impl std::fmt::Debug for DomainHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DomainHasher")
    }
}
