//! x-only secp256k1 public key (BIP-340).

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::schnorr::{Signature, VerifyingKey};
use std::fmt;

use crate::ec::SCHNORR_SIGNATURE_LEN;
use crate::PrimitivesError;

/// Length of an x-only public key in bytes.
pub const XONLY_PUBLIC_KEY_LEN: usize = 32;

/// A 32-byte x-only public key used by Schnorr pay-to-pubkey scripts.
#[derive(Clone)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    pub(crate) fn from_verifying_key(inner: VerifyingKey) -> Self {
        PublicKey { inner }
    }

    /// Parse an x-only public key.
    ///
    /// # Arguments
    /// * `bytes` - The 32-byte x coordinate.
    ///
    /// # Returns
    /// `Ok(PublicKey)` if the coordinate lies on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != XONLY_PUBLIC_KEY_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: XONLY_PUBLIC_KEY_LEN,
                got: bytes.len(),
            });
        }
        let inner = VerifyingKey::from_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        Ok(PublicKey { inner })
    }

    /// Parse an x-only public key from hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize to the 32-byte x coordinate.
    pub fn to_bytes(&self) -> [u8; XONLY_PUBLIC_KEY_LEN] {
        self.inner.to_bytes().into()
    }

    /// Hex encoding of the x coordinate.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verify a 64-byte Schnorr signature over a 32-byte prehash.
    ///
    /// Returns false for malformed signatures as well as mismatches.
    pub fn verify_schnorr(&self, prehash: &[u8; 32], signature: &[u8]) -> bool {
        if signature.len() != SCHNORR_SIGNATURE_LEN {
            return false;
        }
        let Ok(sig) = Signature::try_from(signature) else {
            return false;
        };
        self.inner.verify_prehash(prehash, &sig).is_ok()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
