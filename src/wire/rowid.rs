//! Row-id array wire decode/encode (§3, §4.1).
//!
//! A stable 64-bit identifier for a logical row, packed as a little-endian
//! `u64` array. `INVALID_ROW_ID` (`0xffff_ffff_ffff_ffff`) marks "no row" -
//! `0` is a perfectly valid identity and must not be special-cased.

/// Sentinel row id meaning "invalid/no row" (§3).
pub const INVALID_ROW_ID: u64 = u64::MAX;

/// Decode a packed little-endian `u64` array.
///
/// # Errors
///
/// Returns an error if `bytes.len()` isn't a multiple of 8.
pub fn decode_row_ids(bytes: &[u8]) -> Result<Vec<u64>, String> {
    if bytes.len() % 8 != 0 {
        return Err(format!("rowId buffer length {} not a multiple of 8", bytes.len()));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|c| u64::from_le_bytes(c.try_into().expect("chunks_exact(8) yields 8 bytes")))
        .collect())
}

/// Encode a row-id slice back to its wire form.
pub fn encode_row_ids(ids: &[u64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ids.len() * 8);
    for id in ids {
        buf.extend_from_slice(&id.to_le_bytes());
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_including_zero_and_invalid() {
        let ids = vec![0u64, 1, INVALID_ROW_ID, 0x42];
        let encoded = encode_row_ids(&ids);
        assert_eq!(decode_row_ids(&encoded).unwrap(), ids);
    }

    #[test]
    fn rejects_misaligned_buffer() {
        assert!(decode_row_ids(&[0u8; 9]).is_err());
    }

    #[test]
    fn empty_is_valid() {
        assert_eq!(decode_row_ids(&[]).unwrap(), Vec::<u64>::new());
    }
}
