//! Script chunk parsing and push-data encoding.
//!
//! A chunk is either a bare opcode or a data push carrying its bytes.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes) this is the length.
    pub op: u8,
    /// The pushed bytes, for push opcodes and a top-level `OP_RETURN`.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// ASM token for this chunk: hex for pushes, mnemonic otherwise.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) if self.op > OP_FALSE && self.op <= OP_PUSHDATA4 => hex::encode(data),
            _ => opcode_to_string(self.op).to_string(),
        }
    }

    /// True for `OP_DATA_n` and `OP_PUSHDATA1/2/4` chunks.
    pub fn is_push(&self) -> bool {
        self.op > OP_FALSE && self.op <= OP_PUSHDATA4
    }
}

/// Decode raw script bytes into chunks.
///
/// An `OP_RETURN` outside any `OP_IF`/`OP_NOTIF` block swallows the rest of
/// the script as its data.
///
/// # Returns
/// The chunks, or `DataTooSmall` if a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    let mut conditional_depth: i32 = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        let (header, len) = match op {
            0x01..=0x4b => (1, op as usize),
            OP_PUSHDATA1 => (2, read_len(bytes, pos + 1, 1)?),
            OP_PUSHDATA2 => (3, read_len(bytes, pos + 1, 2)?),
            OP_PUSHDATA4 => (5, read_len(bytes, pos + 1, 4)?),
            OP_RETURN if conditional_depth <= 0 => {
                chunks.push(ScriptChunk {
                    op,
                    data: Some(bytes[pos..].to_vec()),
                });
                break;
            }
            _ => {
                match op {
                    OP_IF | OP_NOTIF | OP_VERIF | OP_VERNOTIF => conditional_depth += 1,
                    OP_ENDIF => conditional_depth -= 1,
                    _ => {}
                }
                chunks.push(ScriptChunk { op, data: None });
                pos += 1;
                continue;
            }
        };

        let start = pos + header;
        let end = start.checked_add(len).ok_or(ScriptError::DataTooSmall)?;
        if end > bytes.len() {
            return Err(ScriptError::DataTooSmall);
        }
        chunks.push(ScriptChunk {
            op,
            data: Some(bytes[start..end].to_vec()),
        });
        pos = end;
    }

    Ok(chunks)
}

/// Little-endian length field of `width` bytes at `at`.
fn read_len(bytes: &[u8], at: usize, width: usize) -> Result<usize, ScriptError> {
    let field = bytes.get(at..at + width).ok_or(ScriptError::DataTooSmall)?;
    Ok(field
        .iter()
        .rev()
        .fold(0usize, |acc, b| (acc << 8) | *b as usize))
}

/// Push prefix for a payload of `data_len` bytes, using the smallest
/// opcode that fits.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xffff_ffff {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_envelope() {
        // OP_FALSE OP_IF "ord" OP_TRUE OP_ENDIF
        let bytes = [0x00, 0x63, 0x03, b'o', b'r', b'd', 0x51, 0x68];
        let chunks = decode_script(&bytes).unwrap();
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[2].data.as_deref(), Some(&b"ord"[..]));
        assert_eq!(chunks[2].to_asm_string(), "6f7264");
        assert_eq!(chunks[0].to_asm_string(), "OP_FALSE");
        assert_eq!(chunks[3].to_asm_string(), "OP_TRUE");
    }

    #[test]
    fn test_decode_pushdata_forms() {
        let mut bytes = vec![OP_PUSHDATA1, 80];
        bytes.extend(std::iter::repeat(0xab).take(80));
        bytes.extend_from_slice(&[OP_PUSHDATA2, 0x00, 0x01]);
        bytes.extend(std::iter::repeat(0xcd).take(256));
        let chunks = decode_script(&bytes).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].data.as_ref().map(Vec::len), Some(80));
        assert_eq!(chunks[1].op, OP_PUSHDATA2);
        assert_eq!(chunks[1].data.as_ref().map(Vec::len), Some(256));
    }

    #[test]
    fn test_decode_truncated_push() {
        assert!(matches!(decode_script(&[0x05, 0x01, 0x02]), Err(ScriptError::DataTooSmall)));
        assert!(matches!(decode_script(&[OP_PUSHDATA2, 0x01]), Err(ScriptError::DataTooSmall)));
        assert!(matches!(decode_script(&[OP_PUSHDATA1]), Err(ScriptError::DataTooSmall)));
    }

    #[test]
    fn test_op_return_inside_conditional_is_plain_opcode() {
        let bytes = [OP_FALSE, OP_IF, OP_RETURN, OP_ENDIF, OP_DUP];
        let chunks = decode_script(&bytes).unwrap();
        assert_eq!(chunks.len(), 5);
        assert!(chunks[2].data.is_none());

        let top_level = decode_script(&[OP_RETURN, 0x01, 0x02]).unwrap();
        assert_eq!(top_level.len(), 1);
        assert_eq!(top_level[0].data.as_deref(), Some(&[OP_RETURN, 0x01, 0x02][..]));
    }

    #[test]
    fn test_push_data_prefix_boundaries() {
        assert_eq!(push_data_prefix(20).unwrap(), vec![20]);
        assert_eq!(push_data_prefix(75).unwrap(), vec![75]);
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(
            push_data_prefix(0x1_0000).unwrap(),
            vec![OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]
        );
    }
}
