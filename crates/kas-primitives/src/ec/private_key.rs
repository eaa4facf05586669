//! secp256k1 private key with Schnorr signing.
//!
//! Wraps the k256 BIP-340 signing key. Signing operates on a 32-byte
//! prehash (the transaction signature hash), never on a raw message.

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::schnorr::{Signature, SigningKey};
use rand::rngs::OsRng;

use crate::ec::public_key::PublicKey;
use crate::ec::SCHNORR_SIGNATURE_LEN;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A secp256k1 private key for Schnorr signing.
#[derive(Clone)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    ///
    /// # Returns
    /// A new randomly generated `PrivateKey`.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from raw 32-byte scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid non-zero scalar,
    /// or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a hexadecimal string.
    ///
    /// # Arguments
    /// * `hex_str` - A 64-character hex string representing the 32-byte scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or an error if the hex or scalar is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes =
            hex::decode(hex_str).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the private key scalar to 32 bytes.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_BYTES_LEN] {
        self.inner.to_bytes().into()
    }

    /// Serialize the private key scalar as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the x-only public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.inner.verifying_key().clone())
    }

    /// Derive the compressed (33-byte) ECDSA public key for the same scalar.
    ///
    /// Used for ECDSA pay-to-pubkey addresses.
    pub fn ecdsa_public_key(&self) -> Result<[u8; 33], PrimitivesError> {
        let ecdsa = k256::ecdsa::SigningKey::from_slice(&self.to_bytes())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        let point = ecdsa.verifying_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }

    /// Produce a BIP-340 Schnorr signature over a 32-byte prehash.
    ///
    /// # Arguments
    /// * `prehash` - The 32-byte message digest (e.g. a signature hash).
    ///
    /// # Returns
    /// The 64-byte signature, or `SigningFailed` if the backend rejects it.
    pub fn sign_schnorr(
        &self,
        prehash: &[u8; 32],
    ) -> Result<[u8; SCHNORR_SIGNATURE_LEN], PrimitivesError> {
        let sig: Signature = self
            .inner
            .sign_prehash(prehash)
            .map_err(|e| PrimitivesError::SigningFailed(e.to_string()))?;
        Ok(sig.to_bytes())
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}
