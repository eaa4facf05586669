//! Utility types for canonical binary encoding.
//!
//! The ledger hashes transactions field by field instead of hashing a
//! pre-serialized buffer. `HashWriter` captures that field encoding once
//! (little-endian integers, u64 length prefixes) so the same writer code can
//! feed a keyed hasher or a plain `ByteWriter` buffer.

/// Little-endian field writer shared by hashers and byte buffers.
///
/// Lengths are always encoded as 8-byte little-endian integers; there is no
/// VarInt in the ledger's canonical encoding.
pub trait HashWriter {
    /// Append raw bytes.
    fn update(&mut self, data: &[u8]) -> &mut Self;

    /// Append a single byte.
    fn write_u8(&mut self, val: u8) -> &mut Self {
        self.update(&[val])
    }

    /// Append a boolean as one byte (`0` or `1`).
    fn write_bool(&mut self, val: bool) -> &mut Self {
        self.write_u8(u8::from(val))
    }

    /// Append a little-endian u16.
    fn write_u16(&mut self, val: u16) -> &mut Self {
        self.update(&val.to_le_bytes())
    }

    /// Append a little-endian u32.
    fn write_u32(&mut self, val: u32) -> &mut Self {
        self.update(&val.to_le_bytes())
    }

    /// Append a little-endian u64.
    fn write_u64(&mut self, val: u64) -> &mut Self {
        self.update(&val.to_le_bytes())
    }

    /// Append a collection length as a little-endian u64.
    fn write_len(&mut self, len: usize) -> &mut Self {
        self.write_u64(len as u64)
    }

    /// Append a u64 length prefix followed by the bytes themselves.
    fn write_var_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.write_len(data.len()).update(data)
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer producing the canonical byte encoding.
///
/// Used to inspect exactly what a hasher would consume, and to measure
/// encoded sizes.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial byte capacity of the internal buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter { buf: Vec::with_capacity(capacity) }
    }

    /// Return a reference to the accumulated bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl HashWriter for ByteWriter {
    fn update(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// Serde adapter encoding `Vec<u8>` fields as lowercase hex strings.
///
/// Use with `#[serde(with = "kas_primitives::util::serde_hex")]`.
pub mod serde_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a hex string.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    /// Deserialize bytes from a hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}
