//! Inbound WebSocket frame decoding (§4.1, §6.1).
//!
//! Each inbound binary frame is:
//!
//! ```text
//! [u8 compressionFlag][payload]
//! ```
//!
//! `compressionFlag == 0` means `payload` is a raw msgpack document.
//! `compressionFlag == 1` means `payload` is `[varint uncompressedLen][snappy blocks]`;
//! decompressing it yields the msgpack document.

use crate::error::CoreError;

const COMPRESSION_RAW: u8 = 0;
const COMPRESSION_SNAPPY: u8 = 1;

/// Decode one inbound binary WebSocket frame into its raw msgpack bytes.
///
/// # Errors
///
/// Returns [`CoreError::DecodeError`] if the frame is empty, carries an
/// unknown compression flag, has a truncated varint length prefix, or fails
/// Snappy decompression.
pub fn decode_frame(frame: &[u8]) -> Result<Vec<u8>, CoreError> {
    let (flag, payload) = frame
        .split_first()
        .ok_or_else(|| CoreError::DecodeError("empty frame: missing compression flag byte".into()))?;

    match *flag {
        COMPRESSION_RAW => Ok(payload.to_vec()),
        COMPRESSION_SNAPPY => decode_snappy_payload(payload),
        other => Err(CoreError::DecodeError(format!("unknown compression flag {other}"))),
    }
}

fn decode_snappy_payload(payload: &[u8]) -> Result<Vec<u8>, CoreError> {
    let (uncompressed_len, rest) = read_varint(payload)
        .ok_or_else(|| CoreError::DecodeError("truncated varint length prefix".into()))?;

    let mut decoder = snap::raw::Decoder::new();
    let decoded = decoder
        .decompress_vec(rest)
        .map_err(|e| CoreError::DecodeError(format!("snappy decompress failed: {e}")))?;

    if decoded.len() as u64 != uncompressed_len {
        return Err(CoreError::DecodeError(format!(
            "snappy length mismatch: header said {uncompressed_len}, got {}",
            decoded.len()
        )));
    }
    Ok(decoded)
}

/// Read a little-endian base-128 varint (as produced by most msgpack/protobuf
/// style framing), returning the decoded value and the remaining bytes.
fn read_varint(bytes: &[u8]) -> Option<(u64, &[u8])> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in bytes.iter().enumerate() {
        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Some((value, &bytes[i + 1..]));
        }
        shift += 7;
        if shift >= 64 {
            return None;
        }
    }
    None
}

/// Encode a value as a little-endian base-128 varint. Used by test fixtures
/// building synthetic compressed frames.
pub fn write_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
    out
}

/// Build a raw (uncompressed) inbound frame from a msgpack payload. Used by
/// test fixtures.
pub fn encode_raw_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(1 + payload.len());
    frame.push(COMPRESSION_RAW);
    frame.extend_from_slice(payload);
    frame
}

/// Build a Snappy-compressed inbound frame from a msgpack payload. Used by
/// test fixtures.
pub fn encode_snappy_frame(payload: &[u8]) -> Vec<u8> {
    let mut encoder = snap::raw::Encoder::new();
    let compressed = encoder.compress_vec(payload).expect("snappy compression cannot fail");
    let mut frame = Vec::with_capacity(1 + 10 + compressed.len());
    frame.push(COMPRESSION_SNAPPY);
    frame.extend_from_slice(&write_varint(payload.len() as u64));
    frame.extend_from_slice(&compressed);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_raw_frame() {
        let payload = b"hello msgpack".to_vec();
        let frame = encode_raw_frame(&payload);
        assert_eq!(decode_frame(&frame).unwrap(), payload);
    }

    #[test]
    fn decodes_snappy_frame() {
        let payload = b"a payload that compresses reasonably well well well well".to_vec();
        let frame = encode_snappy_frame(&payload);
        assert_eq!(decode_frame(&frame).unwrap(), payload);
    }

    #[test]
    fn rejects_empty_frame() {
        assert!(decode_frame(&[]).is_err());
    }

    #[test]
    fn rejects_unknown_compression_flag() {
        assert!(decode_frame(&[9, 1, 2, 3]).is_err());
    }

    #[test]
    fn varint_roundtrips() {
        for v in [0u64, 1, 127, 128, 300, u64::from(u32::MAX), u64::MAX / 2] {
            let encoded = write_varint(v);
            let (decoded, rest) = read_varint(&encoded).unwrap();
            assert_eq!(decoded, v);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn rejects_truncated_varint() {
        // 0x80 alone always expects a continuation byte.
        assert!(read_varint(&[0x80]).is_none());
    }
}
