//! Packed cell decode/encode (§3, §4.1).
//!
//! Each cell is an 8-byte little-endian record, split into two `u32` halves
//! `(lo, hi)`:
//!
//! ```text
//! lo:  [ contentTag:2 | contentBits:24 | styleId_lo:6 ]
//! hi:  [ styleId_hi:10 | wide:2 | protected:1 | hyperlink:1 | unused:18 ]
//! ```
//!
//! `styleId` is split across both halves: the low 6 bits live in `lo`'s top
//! bits, the high 10 bits live in `hi`'s low bits, for a 16-bit style id.

use super::style::StyleId;

/// Size in bytes of one packed cell record.
pub const PACKED_CELL_SIZE: usize = 8;

/// Decoded, still wire-shaped cell content. [`crate::pane::cell_model::Cell`]
/// is the semantic form the rest of the crate works with; this is the
/// intermediate produced directly by bit-unpacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedContent {
    /// A single Unicode scalar value occupying this cell.
    Codepoint(u32),
    /// This cell anchors a multi-codepoint grapheme cluster; the tail
    /// codepoints live in the out-of-band `graphemes` side table.
    CodepointGrapheme(u32),
    /// A background-color-only cell, palette-indexed.
    BgColorPalette(u8),
    /// A background-color-only cell, true-color RGB.
    BgColorRgb(u8, u8, u8),
}

/// Wide-character occupancy classification (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wide {
    /// Occupies exactly one column.
    Narrow,
    /// Occupies two columns; the next cell is this cell's `SpacerTail`.
    Wide,
    /// Placeholder cell trailing a `Wide` cell. Never independently
    /// rendered.
    SpacerTail,
    /// Marks a cell whose wide glyph was wrapped to the next row. Rendered
    /// as a single space, preserving column alignment.
    SpacerHead,
}

impl Wide {
    fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => Wide::Narrow,
            1 => Wide::Wide,
            2 => Wide::SpacerTail,
            _ => Wide::SpacerHead,
        }
    }

    fn to_bits(self) -> u32 {
        match self {
            Wide::Narrow => 0,
            Wide::Wide => 1,
            Wide::SpacerTail => 2,
            Wide::SpacerHead => 3,
        }
    }
}

/// A decoded packed cell, still in wire-shaped form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedCell {
    /// The cell's content.
    pub content: PackedContent,
    /// Index into the pane's style table. `0` is the default style.
    pub style_id: StyleId,
    /// Wide-character occupancy.
    pub wide: Wide,
    /// Whether the cell is protected (e.g. from selective erase).
    pub protected: bool,
    /// Whether an out-of-band `hyperlinks` entry exists for this cell.
    pub hyperlink: bool,
}

impl PackedCell {
    /// The all-zero default cell: a space, default style, narrow, no flags.
    pub const DEFAULT: PackedCell = PackedCell {
        content: PackedContent::Codepoint(0x20),
        style_id: StyleId(0),
        wide: Wide::Narrow,
        protected: false,
        hyperlink: false,
    };

    /// Decode one 8-byte little-endian packed cell record.
    ///
    /// # Errors
    ///
    /// Returns an error message if `bytes` is shorter than
    /// [`PACKED_CELL_SIZE`].
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() < PACKED_CELL_SIZE {
            return Err(format!(
                "packed cell buffer too short: {} < {PACKED_CELL_SIZE}",
                bytes.len()
            ));
        }
        let lo = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let hi = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self::from_halves(lo, hi))
    }

    /// Decode every packed cell in `bytes`, which must hold an exact
    /// multiple of [`PACKED_CELL_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer length isn't a multiple of the cell
    /// size.
    pub fn decode_row(bytes: &[u8], cols: usize) -> Result<Vec<PackedCell>, String> {
        let expected = cols * PACKED_CELL_SIZE;
        if bytes.len() != expected {
            return Err(format!(
                "cell row buffer length {} != expected {expected} ({cols} cols)",
                bytes.len()
            ));
        }
        (0..cols)
            .map(|i| PackedCell::decode(&bytes[i * PACKED_CELL_SIZE..(i + 1) * PACKED_CELL_SIZE]))
            .collect()
    }

    fn from_halves(lo: u32, hi: u32) -> Self {
        let content_tag = lo & 0x3;
        let content_bits = (lo >> 2) & 0x00FF_FFFF;
        let style_lo = (lo >> 26) & 0x3F;
        let style_hi = hi & 0x3FF;
        let style_id = StyleId((style_lo | (style_hi << 6)) as u16);
        let wide = Wide::from_bits(hi >> 10);
        let protected = ((hi >> 12) & 1) != 0;
        let hyperlink = ((hi >> 13) & 1) != 0;

        let content = match content_tag {
            0 => PackedContent::Codepoint(content_bits & 0x1F_FFFF),
            1 => PackedContent::CodepointGrapheme(content_bits & 0x1F_FFFF),
            2 => PackedContent::BgColorPalette((content_bits & 0xFF) as u8),
            _ => PackedContent::BgColorRgb(
                (content_bits & 0xFF) as u8,
                ((content_bits >> 8) & 0xFF) as u8,
                ((content_bits >> 16) & 0xFF) as u8,
            ),
        };

        PackedCell { content, style_id, wide, protected, hyperlink }
    }

    /// Encode back to the 8-byte wire representation. Primarily used by
    /// test fixtures that build synthetic snapshot/delta payloads.
    pub fn encode(&self) -> [u8; PACKED_CELL_SIZE] {
        let (tag, bits) = match self.content {
            PackedContent::Codepoint(cp) => (0u32, cp & 0x1F_FFFF),
            PackedContent::CodepointGrapheme(cp) => (1u32, cp & 0x1F_FFFF),
            PackedContent::BgColorPalette(p) => (2u32, u32::from(p)),
            PackedContent::BgColorRgb(r, g, b) => {
                (3u32, u32::from(r) | (u32::from(g) << 8) | (u32::from(b) << 16))
            }
        };
        let style = u32::from(self.style_id.0);
        let style_lo = style & 0x3F;
        let style_hi = (style >> 6) & 0x3FF;

        let lo = tag | (bits << 2) | (style_lo << 26);
        let hi = style_hi
            | (self.wide.to_bits() << 10)
            | (u32::from(self.protected) << 12)
            | (u32::from(self.hyperlink) << 13);

        let mut buf = [0u8; PACKED_CELL_SIZE];
        buf[0..4].copy_from_slice(&lo.to_le_bytes());
        buf[4..8].copy_from_slice(&hi.to_le_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(cell: PackedCell) {
        let bytes = cell.encode();
        let decoded = PackedCell::decode(&bytes).unwrap();
        assert_eq!(decoded, cell);
    }

    #[test]
    fn roundtrips_plain_codepoint() {
        roundtrip(PackedCell {
            content: PackedContent::Codepoint('H' as u32),
            style_id: StyleId(0),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: false,
        });
    }

    #[test]
    fn roundtrips_wide_with_high_style_id() {
        roundtrip(PackedCell {
            content: PackedContent::Codepoint(0x4E2D), // 中
            style_id: StyleId(1000),
            wide: Wide::Wide,
            protected: true,
            hyperlink: true,
        });
    }

    #[test]
    fn roundtrips_bg_rgb() {
        roundtrip(PackedCell {
            content: PackedContent::BgColorRgb(10, 20, 30),
            style_id: StyleId(42),
            wide: Wide::SpacerHead,
            protected: false,
            hyperlink: false,
        });
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(PackedCell::decode(&[0, 1, 2]).is_err());
    }

    #[test]
    fn style_id_spans_full_16_bits() {
        // style_id 0xFFFF = low 6 bits 0x3F, high 10 bits 0x3FF.
        let cell = PackedCell {
            content: PackedContent::Codepoint('x' as u32),
            style_id: StyleId(0xFFFF),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: false,
        };
        roundtrip(cell);
    }
}
