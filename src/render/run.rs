//! Cells → runs (§4.3): groups a row's cells into maximal spans sharing
//! style, selection, background override, and hyperlink target, classifying
//! PUA and wide-character content along the way.

use crate::pane::cell_model::{Cell, Content};
use crate::pane::style_table::CanonicalStyleId;
use crate::render::pua::{is_expansion_whitespace, is_forced_single, is_pua_codepoint};
use crate::wire::cell::Wide;

/// A cell-content-driven background override, set only by `BG_COLOR_*`
/// cells (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BgOverride {
    /// 256-color palette index.
    Palette(u8),
    /// True-color RGB.
    Rgb(u8, u8, u8),
}

/// The grouping key a run is maximal under: cells differing in any of these
/// fields start a new run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunKey {
    /// Canonical style identity.
    pub style_id: CanonicalStyleId,
    /// Whether these cells are within the active selection.
    pub selected: bool,
    /// Background color forced by cell content, if any.
    pub bg_override: Option<BgOverride>,
    /// Hyperlink target, if any.
    pub hyperlink: Option<String>,
}

/// How a glyph range should be treated by column layout and glyph lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Ordinary text, one column per character.
    Plain,
    /// A wide-character glyph (double-width CJK, or an expanded PUA icon)
    /// occupying two columns for one glyph.
    Wide,
    /// A glyph pinned to a single column despite being visually wide
    /// (unexpanded PUA icon, or a forced-single codepoint).
    Single,
}

/// One contiguous span of text within a run, tagged with how it should lay
/// out across columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRange {
    /// Layout classification.
    pub kind: RangeKind,
    /// The text this range contributes (may be empty for a
    /// background-only range).
    pub text: String,
    /// Columns this range occupies.
    pub cols: u16,
}

/// A maximal run of cells sharing a [`RunKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// The shared style/selection/background/hyperlink key.
    pub key: RunKey,
    /// Glyph ranges making up this run, in column order.
    pub ranges: Vec<GlyphRange>,
    /// Total columns this run occupies (sum of `ranges[..].cols`).
    pub cols: u16,
}

fn run_key_for(cell: &Cell, selected: bool) -> RunKey {
    let bg_override = match cell.content {
        Content::BgColorPalette(p) => Some(BgOverride::Palette(p)),
        Content::BgColorRgb(r, g, b) => Some(BgOverride::Rgb(r, g, b)),
        _ => None,
    };
    RunKey { style_id: cell.style_id, selected, bg_override, hyperlink: cell.hyperlink.clone() }
}

fn push_range(runs: &mut Vec<Run>, key: RunKey, range: GlyphRange) {
    let cols = range.cols;
    match runs.last_mut() {
        Some(run) if run.key == key => {
            run.ranges.push(range);
            run.cols += cols;
        }
        _ => runs.push(Run { key, ranges: vec![range], cols }),
    }
}

/// Whether every cell can skip classification entirely: no selection, no
/// hyperlinks, no multi-codepoint graphemes, and every codepoint is narrow,
/// plain, and outside both the PUA ranges and the forced-single set.
fn is_fast_path(cells: &[Cell], selected: &[bool]) -> bool {
    selected.iter().all(|&s| !s)
        && cells.iter().all(|cell| {
            cell.hyperlink.is_none()
                && cell.wide == Wide::Narrow
                && match cell.content {
                    Content::Codepoint(c) => {
                        !is_pua_codepoint(c as u32) && !is_forced_single(c as u32)
                    }
                    _ => false,
                }
        })
}

fn assemble_fast_path(cells: &[Cell]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for cell in cells {
        let key = RunKey { style_id: cell.style_id, selected: false, bg_override: None, hyperlink: None };
        let text = cell.content.text();
        match runs.last_mut() {
            Some(run) if run.key == key => {
                run.ranges[0].text.push_str(&text);
                run.ranges[0].cols += 1;
                run.cols += 1;
            }
            _ => runs.push(Run {
                key,
                ranges: vec![GlyphRange { kind: RangeKind::Plain, text, cols: 1 }],
                cols: 1,
            }),
        }
    }
    runs
}

/// Classify one non-spacer-tail cell, returning its glyph range, how many
/// cells it consumes (1, or 2 when a PUA glyph expands into the following
/// whitespace cell), and whether it counts as an unexpanded PUA glyph for
/// the *next* cell's expansion eligibility check.
fn classify_cell(cells: &[Cell], i: usize, prev_was_unexpanded_pua: bool) -> (GlyphRange, usize, bool) {
    let cell = &cells[i];

    if cell.wide == Wide::Wide {
        return (GlyphRange { kind: RangeKind::Wide, text: cell.content.text(), cols: 2 }, 1, false);
    }
    if cell.wide == Wide::SpacerHead {
        return (GlyphRange { kind: RangeKind::Plain, text: " ".to_string(), cols: 1 }, 1, false);
    }

    match cell.content {
        Content::BgColorPalette(_) | Content::BgColorRgb(..) => {
            (GlyphRange { kind: RangeKind::Plain, text: String::new(), cols: 1 }, 1, false)
        }
        Content::Codepoint(c) if is_pua_codepoint(c as u32) && !is_forced_single(c as u32) => {
            let next_is_expansion_whitespace = cells
                .get(i + 1)
                .map(|next| is_expansion_whitespace(&next.content.text()))
                .unwrap_or(false);
            if !prev_was_unexpanded_pua && next_is_expansion_whitespace {
                (GlyphRange { kind: RangeKind::Wide, text: c.to_string(), cols: 2 }, 2, false)
            } else {
                (GlyphRange { kind: RangeKind::Single, text: c.to_string(), cols: 1 }, 1, true)
            }
        }
        Content::Codepoint(c) if is_forced_single(c as u32) => {
            (GlyphRange { kind: RangeKind::Single, text: c.to_string(), cols: 1 }, 1, false)
        }
        _ => (GlyphRange { kind: RangeKind::Plain, text: cell.content.text(), cols: 1 }, 1, false),
    }
}

/// Assemble one row's cells into runs (§4.3). `selected[i]` marks whether
/// `cells[i]` falls within the active selection; pass an all-`false` slice
/// when there is none.
///
/// # Panics
///
/// Panics if `selected.len() != cells.len()`.
pub fn assemble_runs(cells: &[Cell], selected: &[bool]) -> Vec<Run> {
    assert_eq!(cells.len(), selected.len(), "selected mask must match cell count");

    if is_fast_path(cells, selected) {
        return assemble_fast_path(cells);
    }

    let mut runs: Vec<Run> = Vec::new();
    let mut i = 0;
    let mut prev_was_unexpanded_pua = false;
    while i < cells.len() {
        if cells[i].wide == Wide::SpacerTail {
            i += 1;
            prev_was_unexpanded_pua = false;
            continue;
        }
        let key = run_key_for(&cells[i], selected[i]);
        let (range, consumed, new_prev_pua) = classify_cell(cells, i, prev_was_unexpanded_pua);
        prev_was_unexpanded_pua = new_prev_pua;
        push_range(&mut runs, key, range);
        i += consumed;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::style_table::CanonicalStyleId;

    fn plain_cell(c: char, style: u32) -> Cell {
        Cell {
            content: Content::Codepoint(c),
            style_id: CanonicalStyleId(style),
            wide: Wide::Narrow,
            protected: false,
            hyperlink: None,
        }
    }

    #[test]
    fn groups_contiguous_same_style_cells_into_one_run() {
        let cells = vec![plain_cell('a', 1), plain_cell('b', 1), plain_cell('c', 2)];
        let selected = vec![false; 3];
        let runs = assemble_runs(&cells, &selected);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].ranges[0].text, "ab");
        assert_eq!(runs[1].ranges[0].text, "c");
    }

    #[test]
    fn wide_cell_consumes_its_spacer_tail() {
        let mut wide = plain_cell('\u{4E2D}', 0);
        wide.wide = Wide::Wide;
        let mut tail = plain_cell(' ', 0);
        tail.wide = Wide::SpacerTail;
        let cells = vec![wide, tail];
        let selected = vec![false; 2];
        let runs = assemble_runs(&cells, &selected);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].cols, 2);
        assert_eq!(runs[0].ranges[0].kind, RangeKind::Wide);
        assert_eq!(runs[0].ranges[0].text, "\u{4E2D}");
    }

    #[test]
    fn pua_followed_by_space_expands_to_wide_range() {
        let cells = vec![plain_cell('\u{E000}', 0), plain_cell(' ', 0)];
        let selected = vec![false; 2];
        let runs = assemble_runs(&cells, &selected);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].cols, 2);
        assert_eq!(runs[0].ranges[0].kind, RangeKind::Wide);
    }

    #[test]
    fn pua_followed_by_non_whitespace_stays_single_cell() {
        let cells = vec![plain_cell('\u{E000}', 0), plain_cell('x', 0)];
        let selected = vec![false; 2];
        let runs = assemble_runs(&cells, &selected);
        assert_eq!(runs[0].ranges[0].kind, RangeKind::Single);
        assert_eq!(runs[0].cols, 1);
    }

    #[test]
    fn adjacent_unexpanded_pua_glyphs_never_both_expand() {
        let cells = vec![plain_cell('\u{E000}', 0), plain_cell('\u{E001}', 0), plain_cell(' ', 0)];
        let selected = vec![false; 3];
        let runs = assemble_runs(&cells, &selected);
        // First PUA has no whitespace immediately after it (second PUA is there
        // instead), so it stays single; the second PUA is preceded by an
        // unexpanded PUA and so cannot expand either, despite the trailing space.
        assert_eq!(runs[0].ranges[0].kind, RangeKind::Single);
        assert_eq!(runs[0].ranges[1].kind, RangeKind::Single);
    }

    #[test]
    fn forced_single_codepoint_never_expands() {
        let cells = vec![plain_cell('\u{279B}', 0), plain_cell(' ', 0)];
        let selected = vec![false; 2];
        let runs = assemble_runs(&cells, &selected);
        assert_eq!(runs[0].ranges[0].kind, RangeKind::Single);
    }

    #[test]
    fn fast_path_groups_purely_by_style() {
        let cells = vec![plain_cell('a', 1), plain_cell('b', 1)];
        let selected = vec![false; 2];
        assert!(is_fast_path(&cells, &selected));
        let runs = assemble_runs(&cells, &selected);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].ranges[0].text, "ab");
    }

    #[test]
    fn selection_disables_fast_path() {
        let cells = vec![plain_cell('a', 1)];
        let selected = vec![true];
        assert!(!is_fast_path(&cells, &selected));
    }
}
