//! Script chunk parsing and push-data encoding.
//!
//! A script chunk is either an opcode or a data push with its associated bytes.
//! This module handles decoding raw script bytes into structured chunks and
//! encoding push data with the correct OP_PUSHDATA prefix.

use crate::opcodes::*;
use crate::TxScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Render the chunk for diagnostics: hex for pushes, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) => hex::encode(data),
            None => opcode_to_string(self.op),
        }
    }
}

fn take(bytes: &[u8], pos: usize, len: usize) -> Result<Vec<u8>, TxScriptError> {
    let end = pos.checked_add(len).ok_or(TxScriptError::DataTooSmall)?;
    bytes
        .get(pos..end)
        .map(<[u8]>::to_vec)
        .ok_or(TxScriptError::DataTooSmall)
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Handles OP_DATA_1..OP_DATA_75 (direct push) and OP_PUSHDATA1/2/4
/// (extended push). Every other byte becomes a bare opcode chunk.
///
/// # Arguments
/// * `bytes` - The raw script bytes to decode.
///
/// # Returns
/// A vector of parsed chunks, or `DataTooSmall` if a push is truncated.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, TxScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        let (header, length) = match op {
            OP_DATA_1..=OP_DATA_75 => (1, op as usize),
            OP_PUSHDATA1 => {
                let len = take(bytes, pos + 1, 1)?;
                (2, len[0] as usize)
            }
            OP_PUSHDATA2 => {
                let len = take(bytes, pos + 1, 2)?;
                (3, u16::from_le_bytes([len[0], len[1]]) as usize)
            }
            OP_PUSHDATA4 => {
                let len = take(bytes, pos + 1, 4)?;
                (5, u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize)
            }
            _ => {
                chunks.push(ScriptChunk { op, data: None });
                pos += 1;
                continue;
            }
        };
        let data = take(bytes, pos + header, length)?;
        chunks.push(ScriptChunk { op, data: Some(data) });
        pos += header + length;
    }

    Ok(chunks)
}

/// Compute the push prefix for a data payload of the given length.
///
/// This is the raw length-class prefix only; canonical small-int pushes are
/// the builder's concern.
///
/// # Arguments
/// * `data_len` - The length of the data to be pushed.
///
/// # Returns
/// The prefix bytes, or `DataTooBig` if no push opcode can carry the length.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, TxScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(TxScriptError::DataTooBig)
    }
}
