//! `applyDelta` (§4.2): merge a generation-bounded delta into the cached
//! rows, style translation, and viewport ordering.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::pane::cell_model::Cell;
use crate::pane::state::{CachedRow, PaneState};
use crate::pane::style_table::CanonicalStyleId;
use crate::wire::cell::PackedCell;
use crate::wire::inbound::{DirtyRow, ServerMessage};
use crate::wire::rowid::decode_row_ids;
use crate::wire::style::{decode_style_table, StyleId};

type GraphemeMap = HashMap<u32, Vec<u32>>;
type HyperlinkMap = HashMap<u32, String>;

fn decode_side_table<T: serde::de::DeserializeOwned + Default>(
    bytes: Option<&[u8]>,
) -> Result<T, CoreError> {
    match bytes {
        None => Ok(T::default()),
        Some(b) if b.is_empty() => Ok(T::default()),
        Some(b) => rmp_serde::from_slice(b)
            .map_err(|e| CoreError::DecodeError(format!("side table decode failed: {e}"))),
    }
}

fn grapheme_text(map: &GraphemeMap, index: u32) -> Option<String> {
    map.get(&index)
        .map(|codepoints| codepoints.iter().filter_map(|&cp| char::from_u32(cp)).collect::<String>())
}

fn decode_dirty_row(
    dirty: &DirtyRow,
    cols: usize,
    style_translation: &HashMap<StyleId, CanonicalStyleId>,
) -> Result<CachedRow, CoreError> {
    let packed = PackedCell::decode_row(&dirty.cells, cols)
        .map_err(|e| CoreError::DecodeError(format!("dirty row {} decode failed: {e}", dirty.id)))?;
    let graphemes: GraphemeMap = decode_side_table(dirty.graphemes.as_deref())?;
    let hyperlinks: HyperlinkMap = decode_side_table(dirty.hyperlinks.as_deref())?;

    let mut cells = Vec::with_capacity(cols);
    for (col, cell) in packed.into_iter().enumerate() {
        let canonical =
            style_translation.get(&cell.style_id).copied().unwrap_or(CanonicalStyleId(0));
        let col = col as u32;
        let grapheme = grapheme_text(&graphemes, col);
        let hyperlink = hyperlinks.get(&col).cloned();
        cells.push(Cell::from_packed(cell, canonical, grapheme.as_deref(), hyperlink.as_deref()));
    }
    Ok(CachedRow { cells })
}

/// Apply a [`ServerMessage::Delta`] to `state`.
///
/// Caller is expected to have already checked `syncNeeded` / the generation
/// precondition via [`crate::pane::sync::sync_needed`]; this function
/// applies unconditionally once called, matching §4.2's "when
/// `msg.fromGen == generation`" precondition being the caller's
/// responsibility, not a silent no-op here.
///
/// # Errors
///
/// Returns [`CoreError::DecodeError`] if any side table is malformed. No
/// partial state is written on error.
pub fn apply_delta(state: &mut PaneState, msg: &ServerMessage) -> Result<(), CoreError> {
    let ServerMessage::Delta {
        gen,
        cols,
        rows,
        cursor,
        alt_screen,
        scrollback,
        dirty_rows,
        row_ids,
        styles,
        selection,
        title,
        ..
    } = msg
    else {
        return Err(CoreError::DecodeError("apply_delta called with a non-delta message".into()));
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

    // Merge: new styles overwrite, prior styles carry forward (§4.2).
    let mut translation = state.style_translation.clone();
    for (wire_id, style) in style_entries {
        let canonical = state.style_table.canonicalize(style);
        translation.insert(wire_id, canonical);
    }

    let cols_usize = usize::from(*cols);
    let mut decoded_rows = Vec::with_capacity(dirty_rows.len());
    for dirty in dirty_rows {
        decoded_rows.push((dirty.id, decode_dirty_row(dirty, cols_usize, &translation)?));
    }

    for (row_id, row) in decoded_rows {
        state.row_cache.insert(row_id, row);
    }

    // Any viewport rowId missing from the cache gets a transient blank row
    // (§4.2): it resolves itself on the next delta.
    for &row_id in &row_id_list {
        if state.row_cache.get(row_id).is_none() {
            state.row_cache.insert(
                row_id,
                CachedRow { cells: (0..cols_usize).map(|_| Cell::default_blank()).collect() },
            );
        }
    }

    state.style_translation = translation;
    state.row_ids = row_id_list;
    state.cols = *cols;
    state.rows = *rows;
    state.cursor = *cursor;
    state.alt_screen = *alt_screen;
    state.scrollback = *scrollback;
    state.selection = *selection;
    if let Some(t) = title {
        state.title = Some(t.clone());
    }
    state.generation = *gen;
    state.delta_count += 1;
    Ok(())
}
