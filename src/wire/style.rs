//! Style table wire decode/encode (§3, §4.1).
//!
//! ```text
//! u16 count
//! count * {
//!     u16 styleId
//!     Color fg, Color bg, Color underlineColor   (4 bytes each: u8 tag + up to 3 channel bytes)
//!     u16 flags                                   (low byte = bool flags, bits 8-10 = underline kind)
//! }
//! ```

use std::fmt;

/// A 16-bit style table index. `0` is always the default style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(pub u16);

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A color slot: unset, 256-color palette index, or true-color RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// No color set; renderer falls back to its default.
    #[default]
    None,
    /// 256-color palette index.
    Palette(u8),
    /// True-color RGB.
    Rgb(u8, u8, u8),
}

impl Color {
    fn decode(bytes: [u8; 4]) -> Self {
        match bytes[0] {
            1 => Color::Palette(bytes[1]),
            2 => Color::Rgb(bytes[1], bytes[2], bytes[3]),
            _ => Color::None,
        }
    }

    fn encode(self) -> [u8; 4] {
        match self {
            Color::None => [0, 0, 0, 0],
            Color::Palette(idx) => [1, idx, 0, 0],
            Color::Rgb(r, g, b) => [2, r, g, b],
        }
    }
}

/// Underline style, carried in bits 8-10 of the style flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Underline {
    /// No underline.
    #[default]
    None,
    /// Ordinary single-line underline.
    Single,
    /// Double-line underline.
    Double,
    /// Curly/wavy underline (spellcheck-style).
    Curly,
    /// Dotted underline.
    Dotted,
    /// Dashed underline.
    Dashed,
}

impl Underline {
    fn from_bits(bits: u16) -> Self {
        match bits {
            1 => Underline::Single,
            2 => Underline::Double,
            3 => Underline::Curly,
            4 => Underline::Dotted,
            5 => Underline::Dashed,
            // Out-of-range underline kinds clamp to None rather than erroring -
            // a forward-compatible server value shouldn't poison the whole style.
            _ => Underline::None,
        }
    }

    fn to_bits(self) -> u16 {
        match self {
            Underline::None => 0,
            Underline::Single => 1,
            Underline::Double => 2,
            Underline::Curly => 3,
            Underline::Dotted => 4,
            Underline::Dashed => 5,
        }
    }
}

/// Boolean style attributes packed into the low byte of the flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleFlags {
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Faint/dim.
    pub faint: bool,
    /// Blinking.
    pub blink: bool,
    /// Inverse video (fg/bg swapped).
    pub inverse: bool,
    /// Invisible (concealed) text.
    pub invisible: bool,
    /// Strikethrough.
    pub strikethrough: bool,
    /// Overline.
    pub overline: bool,
    /// Underline kind.
    pub underline: Underline,
}

impl StyleFlags {
    fn decode(word: u16) -> Self {
        let low = word as u8;
        StyleFlags {
            bold: low & 0x01 != 0,
            italic: low & 0x02 != 0,
            faint: low & 0x04 != 0,
            blink: low & 0x08 != 0,
            inverse: low & 0x10 != 0,
            invisible: low & 0x20 != 0,
            strikethrough: low & 0x40 != 0,
            overline: low & 0x80 != 0,
            underline: Underline::from_bits((word >> 8) & 0x7),
        }
    }

    fn encode(self) -> u16 {
        let mut low: u16 = 0;
        if self.bold {
            low |= 0x01;
        }
        if self.italic {
            low |= 0x02;
        }
        if self.faint {
            low |= 0x04;
        }
        if self.blink {
            low |= 0x08;
        }
        if self.inverse {
            low |= 0x10;
        }
        if self.invisible {
            low |= 0x20;
        }
        if self.strikethrough {
            low |= 0x40;
        }
        if self.overline {
            low |= 0x80;
        }
        low | (self.underline.to_bits() << 8)
    }
}

/// A fully decoded style: colors and boolean/underline flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Underline color (independent of `fg` per the `SGR 58/59` convention).
    pub underline_color: Color,
    /// Boolean/underline flags.
    pub flags: StyleFlags,
}

impl std::hash::Hash for Color {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Color::None => 0u8.hash(state),
            Color::Palette(p) => {
                1u8.hash(state);
                p.hash(state);
            }
            Color::Rgb(r, g, b) => {
                2u8.hash(state);
                r.hash(state);
                g.hash(state);
                b.hash(state);
            }
        }
    }
}

impl std::hash::Hash for Underline {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl std::hash::Hash for StyleFlags {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.encode().hash(state);
    }
}

const STYLE_RECORD_SIZE: usize = 2 /* id */ + 4 * 3 /* colors */ + 2 /* flags */;

/// Decode the `[u16 count][records...]` style table payload into
/// `(StyleId, Style)` pairs in wire order.
///
/// # Errors
///
/// Returns an error if the buffer is shorter than the declared count
/// requires.
pub fn decode_style_table(bytes: &[u8]) -> Result<Vec<(StyleId, Style)>, String> {
    if bytes.len() < 2 {
        return Err("style table buffer shorter than u16 count prefix".to_string());
    }
    let count = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
    let mut offset = 2;
    let needed = count * STYLE_RECORD_SIZE;
    if bytes.len() < offset + needed {
        return Err(format!(
            "style table buffer too short: need {needed} bytes for {count} records, have {}",
            bytes.len() - offset
        ));
    }
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let id = StyleId(u16::from_le_bytes([bytes[offset], bytes[offset + 1]]));
        offset += 2;
        let fg = Color::decode(bytes[offset..offset + 4].try_into().unwrap());
        offset += 4;
        let bg = Color::decode(bytes[offset..offset + 4].try_into().unwrap());
        offset += 4;
        let underline_color = Color::decode(bytes[offset..offset + 4].try_into().unwrap());
        offset += 4;
        let flags_word = u16::from_le_bytes([bytes[offset], bytes[offset + 1]]);
        offset += 2;
        out.push((id, Style { fg, bg, underline_color, flags: StyleFlags::decode(flags_word) }));
    }
    Ok(out)
}

/// Encode `(StyleId, Style)` pairs back to wire format. Used by test
/// fixtures that build synthetic snapshot/delta payloads.
pub fn encode_style_table(entries: &[(StyleId, Style)]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + entries.len() * STYLE_RECORD_SIZE);
    buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (id, style) in entries {
        buf.extend_from_slice(&id.0.to_le_bytes());
        buf.extend_from_slice(&style.fg.encode());
        buf.extend_from_slice(&style.bg.encode());
        buf.extend_from_slice(&style.underline_color.encode());
        buf.extend_from_slice(&style.flags.encode().to_le_bytes());
    }
    buf
}
