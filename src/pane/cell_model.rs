//! The semantic cell model (§3) the sync engine and render pipeline work
//! with, as opposed to [`crate::wire::cell::PackedCell`]'s bit-packed wire
//! form. Grapheme tails and hyperlink URLs are resolved eagerly here so
//! downstream code never has to re-consult a side table.

use crate::pane::style_table::CanonicalStyleId;
use crate::wire::cell::{PackedCell, PackedContent, Wide};

/// A cell's textual content, fully resolved (no more out-of-band lookups
/// required).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A single Unicode scalar value.
    Codepoint(char),
    /// A multi-codepoint grapheme cluster, anchored at this cell.
    Grapheme(String),
    /// A background-color-only cell, palette-indexed; renders as empty text.
    BgColorPalette(u8),
    /// A background-color-only cell, true-color RGB; renders as empty text.
    BgColorRgb(u8, u8, u8),
}

impl Content {
    /// The text this cell contributes to a run, per §4.3: codepoint and
    /// grapheme cells contribute their text; background-color-only cells
    /// contribute nothing (they're presentational).
    pub fn text(&self) -> String {
        match self {
            Content::Codepoint(c) => c.to_string(),
            Content::Grapheme(g) => g.clone(),
            Content::BgColorPalette(_) | Content::BgColorRgb(_, _, _) => String::new(),
        }
    }
}

/// A fully resolved cell: content, style, wide-char occupancy, and
/// (optionally) hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Resolved content.
    pub content: Content,
    /// Pane-stable canonical style identity (§9).
    pub style_id: CanonicalStyleId,
    /// Wide-character occupancy.
    pub wide: Wide,
    /// Selective-erase protection flag.
    pub protected: bool,
    /// Resolved hyperlink target URL, if any.
    pub hyperlink: Option<String>,
}

impl Cell {
    /// The default blank cell: a space, default style, narrow, unprotected,
    /// no hyperlink.
    pub fn default_blank() -> Self {
        Cell {
            content: Content::Codepoint(' '),
            style_id: CanonicalStyleId(0),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: None,
        }
    }

    /// Resolve a wire-shaped [`PackedCell`] into a semantic [`Cell`], given
    /// this cell's row-relative grapheme and hyperlink side tables and the
    /// canonical style id its wire `styleId` was translated to.
    ///
    /// `grapheme` is the resolved tail string for a
    /// [`PackedContent::CodepointGrapheme`] cell (the anchor codepoint plus
    /// tail codepoints, already joined); `hyperlink` is the resolved URL for
    /// a cell with its `hyperlink` bit set. Both are looked up by the caller
    /// (who owns the row-relative side tables) and passed in, keeping this
    /// function a pure, table-free transform.
    pub fn from_packed(
        packed: PackedCell,
        style_id: CanonicalStyleId,
        grapheme: Option<&str>,
        hyperlink: Option<&str>,
    ) -> Self {
        let content = match packed.content {
            PackedContent::Codepoint(cp) => {
                Content::Codepoint(char::from_u32(cp).unwrap_or('\u{FFFD}'))
            }
            PackedContent::CodepointGrapheme(cp) => match grapheme {
                Some(text) => Content::Grapheme(text.to_string()),
                None => Content::Codepoint(char::from_u32(cp).unwrap_or('\u{FFFD}')),
            },
            PackedContent::BgColorPalette(idx) => Content::BgColorPalette(idx),
            PackedContent::BgColorRgb(r, g, b) => Content::BgColorRgb(r, g, b),
        };
        Cell {
            content,
            style_id,
            wide: packed.wide,
            protected: packed.protected,
            hyperlink: if packed.hyperlink { hyperlink.map(str::to_string) } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::cell::PackedContent;
    use crate::wire::style::StyleId;

    #[test]
    fn resolves_plain_codepoint() {
        let packed = PackedCell {
            content: PackedContent::Codepoint('H' as u32),
            style_id: StyleId(3),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: false,
        };
        let cell = Cell::from_packed(packed, CanonicalStyleId(3), None, None);
        assert_eq!(cell.content, Content::Codepoint('H'));
        assert_eq!(cell.content.text(), "H");
    }

    #[test]
    fn resolves_grapheme_tail_from_side_table() {
        let packed = PackedCell {
            content: PackedContent::CodepointGrapheme('e' as u32),
            style_id: StyleId(0),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: false,
        };
        let cell = Cell::from_packed(packed, CanonicalStyleId(0), Some("e\u{301}"), None);
        assert_eq!(cell.content, Content::Grapheme("e\u{301}".to_string()));
    }

    #[test]
    fn bg_color_only_cell_has_empty_text() {
        let packed = PackedCell {
            content: PackedContent::BgColorRgb(1, 2, 3),
            style_id: StyleId(0),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: false,
        };
        let cell = Cell::from_packed(packed, CanonicalStyleId(0), None, None);
        assert_eq!(cell.content.text(), "");
    }

    #[test]
    fn hyperlink_only_resolved_when_bit_set() {
        let mut packed = PackedCell {
            content: PackedContent::Codepoint('x' as u32),
            style_id: StyleId(0),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: false,
        };
        let cell = Cell::from_packed(packed, CanonicalStyleId(0), None, Some("https://example.com"));
        assert_eq!(cell.hyperlink, None);

        packed.hyperlink = true;
        let cell = Cell::from_packed(packed, CanonicalStyleId(0), None, Some("https://example.com"));
        assert_eq!(cell.hyperlink.as_deref(), Some("https://example.com"));
    }
}
