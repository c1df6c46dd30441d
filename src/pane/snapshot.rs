//! `applySnapshot` (§4.2): decode a full per-pane snapshot and replace the
//! row cache wholesale.

use std::collections::{HashMap, HashSet};

use rustc_hash::FxHashMap;

use crate::error::CoreError;
use crate::pane::cell_model::Cell;
use crate::pane::state::{CachedRow, PaneState};
use crate::pane::style_table::CanonicalStyleId;
use crate::wire::cell::PackedCell;
use crate::wire::inbound::ServerMessage;
use crate::wire::rowid::decode_row_ids;
use crate::wire::style::{decode_style_table, StyleId};

type GraphemeMap = HashMap<u32, Vec<u32>>;
type HyperlinkMap = HashMap<u32, String>;

fn decode_side_table<T: serde::de::DeserializeOwned>(bytes: Option<&[u8]>) -> Result<T, CoreError>
where
    T: Default,
{
    match bytes {
        None => Ok(T::default()),
        Some(b) if b.is_empty() => Ok(T::default()),
        Some(b) => rmp_serde::from_slice(b)
            .map_err(|e| CoreError::DecodeError(format!("side table decode failed: {e}"))),
    }
}

fn grapheme_text(map: &GraphemeMap, index: u32) -> Option<String> {
    map.get(&index).map(|codepoints| {
        codepoints.iter().filter_map(|&cp| char::from_u32(cp)).collect::<String>()
    })
}

/// Apply a [`ServerMessage::Snapshot`] to `state`, replacing the row cache
/// wholesale.
///
/// # Errors
///
/// Returns [`CoreError::DecodeError`] if any side table (cells, styles,
/// rowIds, graphemes, hyperlinks) is malformed; per §4.2 the caller should
/// log and discard the snapshot rather than leave the pane half-updated,
/// so this function makes no partial mutation to `state` on error: it
/// builds the full replacement and only then swaps it in.
pub fn apply_snapshot(state: &mut PaneState, msg: &ServerMessage) -> Result<(), CoreError> {
    let ServerMessage::Snapshot {
        gen,
        cols,
        rows,
        cursor,
        alt_screen,
        scrollback,
        cells,
        styles,
        row_ids,
        graphemes,
        hyperlinks,
        selection,
        title,
        ..
    } = msg
    else {
        return Err(CoreError::DecodeError("apply_snapshot called with a non-snapshot message".into()));
    };

    let style_entries = decode_style_table(styles)
        .map_err(|e| CoreError::DecodeError(format!("style table decode failed: {e}")))?;
    let row_id_list = decode_row_ids(row_ids)
        .map_err(|e| CoreError::DecodeError(format!("rowId decode failed: {e}")))?;
    if row_id_list.len() != usize::from(*rows) {
        return Err(CoreError::DecodeError(format!(
            "rowId count {} != declared rows {}",
            row_id_list.len(),
            rows
        )));
    }
    let grapheme_map: GraphemeMap = decode_side_table(graphemes.as_deref())?;
    let hyperlink_map: HyperlinkMap = decode_side_table(hyperlinks.as_deref())?;

    let mut style_translation: HashMap<StyleId, CanonicalStyleId> = HashMap::new();
    for (wire_id, style) in style_entries {
        let canonical = state.style_table.canonicalize(style);
        style_translation.insert(wire_id, canonical);
    }
    // A snapshot establishes a full style table, so it replaces the
    // translation map wholesale rather than merging (§4.2: "replace
    // rowCache wholesale" applies to the style mapping it's derived from
    // too - a snapshot is never partial).

    let cols_usize = usize::from(*cols);
    let row_bytes = cols_usize * crate::wire::cell::PACKED_CELL_SIZE;
    if cells.len() != row_bytes * usize::from(*rows) {
        return Err(CoreError::DecodeError(format!(
            "cell buffer length {} != rows*cols*8 ({})",
            cells.len(),
            row_bytes * usize::from(*rows)
        )));
    }

    let mut new_rows: FxHashMap<u64, CachedRow> = FxHashMap::default();
    let mut referenced: HashSet<CanonicalStyleId> = HashSet::new();
    for y in 0..usize::from(*rows) {
        let row_bytes_slice = &cells[y * row_bytes..(y + 1) * row_bytes];
        let packed_row = PackedCell::decode_row(row_bytes_slice, cols_usize)
            .map_err(|e| CoreError::DecodeError(format!("cell row {y} decode failed: {e}")))?;
        let mut resolved = Vec::with_capacity(cols_usize);
        for (col, packed) in packed_row.into_iter().enumerate() {
            let global_index = (y * cols_usize + col) as u32;
            let canonical = style_translation
                .get(&packed.style_id)
                .copied()
                .unwrap_or(CanonicalStyleId(0));
            referenced.insert(canonical);
            let grapheme = grapheme_text(&grapheme_map, global_index);
            let hyperlink = hyperlink_map.get(&global_index).cloned();
            resolved.push(Cell::from_packed(
                packed,
                canonical,
                grapheme.as_deref(),
                hyperlink.as_deref(),
            ));
        }
        new_rows.insert(row_id_list[y], CachedRow { cells: resolved });
    }

    state.row_cache.replace_all(new_rows);
    state.style_table.gc(&referenced);
    state.style_translation = style_translation;
    state.row_ids = row_id_list;
    state.cols = *cols;
    state.rows = *rows;
    state.cursor = *cursor;
    state.alt_screen = *alt_screen;
    state.scrollback = *scrollback;
    state.selection = *selection;
    state.title = title.clone();
    state.generation = *gen;
    state.resync_count += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::cell::{PackedContent, Wide};
    use crate::wire::inbound::{CursorShape, WireCursor, WireScrollback};
    use crate::wire::rowid::encode_row_ids;
    use crate::wire::style::{encode_style_table, Style};

    fn simple_snapshot(pane_id: u32, gen: u32, row_id: u64, text: &str) -> ServerMessage {
        let cols = text.chars().count();
        let mut cells = Vec::new();
        for ch in text.chars() {
            cells.extend_from_slice(
                &PackedCell {
                    content: PackedContent::Codepoint(ch as u32),
                    style_id: StyleId(0),
                    wide: Wide::Narrow,
                    protected: false,
                    hyperlink: false,
                }
                .encode(),
            );
        }
        ServerMessage::Snapshot {
            pane_id,
            gen,
            cols: cols as u16,
            rows: 1,
            cursor: WireCursor { x: 0, y: 0, visible: true, style: CursorShape::Block, blink: true },
            alt_screen: false,
            scrollback: WireScrollback { total_rows: 1, viewport_top: 0 },
            cells,
            styles: encode_style_table(&[(StyleId(0), Style::default())]),
            row_ids: encode_row_ids(&[row_id]),
            graphemes: None,
            hyperlinks: None,
            selection: None,
            title: None,
        }
    }

    #[test]
    fn replaces_row_cache_and_advances_generation() {
        let mut state = PaneState::new(1);
        let msg = simple_snapshot(1, 10, 0x42, "Hi!");
        apply_snapshot(&mut state, &msg).unwrap();
        assert_eq!(state.generation, 10);
        assert_eq!(state.resync_count, 1);
        let row = state.row_cache.get(0x42).unwrap();
        assert_eq!(row.cells[0].content.text(), "H");
        assert_eq!(row.cells[1].content.text(), "i");
        assert_eq!(row.cells[2].content.text(), "!");
    }

    #[test]
    fn rejects_row_id_count_mismatch() {
        let mut state = PaneState::new(1);
        let mut msg = simple_snapshot(1, 10, 0x42, "Hi!");
        if let ServerMessage::Snapshot { rows, .. } = &mut msg {
            *rows = 2;
        }
        assert!(apply_snapshot(&mut state, &msg).is_err());
    }
}
