//! Cell-run-segment render pipeline (C3) seed scenarios S3/S4/S5 and
//! invariants 4-6.

use dullahan_core::pane::cell_model::{Cell, Content};
use dullahan_core::pane::state::{CachedRow, PaneState};
use dullahan_core::pane::style_table::CanonicalStyleId;
use dullahan_core::wire::cell::Wide;
use dullahan_core::RenderPipeline;

fn cell(content: Content, wide: Wide) -> Cell {
    Cell { content, style_id: CanonicalStyleId(0), wide, protected: false, hyperlink: None }
}

fn char_cell(c: char) -> Cell {
    cell(Content::Codepoint(c), Wide::Narrow)
}

fn state_with_row(cols: u16, cells: Vec<Cell>) -> PaneState {
    let mut state = PaneState::new(1);
    state.cols = cols;
    state.rows = 1;
    state.row_ids = vec![1];
    state.row_cache.insert(1, CachedRow { cells });
    state
}

/// S3: a wide CJK cell followed by its spacer tail, then a plain cell,
/// renders as one wide segment and one plain segment - the spacer itself
/// never appears.
#[test]
fn s3_wide_cell_and_spacer_tail_collapse_to_one_segment() {
    let cells = vec![cell(Content::Codepoint('\u{4E2D}'), Wide::Wide), char_cell(' '), char_cell('A')];
    let mut cells = cells;
    cells[1] = Cell { wide: Wide::SpacerTail, ..cells[1].clone() };
    let state = state_with_row(3, cells);

    let mut pipeline = RenderPipeline::new();
    let rendered = pipeline.render_pane(&state, "dark", "");
    let segments = &rendered.rows[0];

    assert_eq!(segments.iter().map(|s| s.cols).sum::<u16>(), 3);
    let wide = segments.iter().find(|s| s.text == "\u{4E2D}").unwrap();
    assert_eq!(wide.cols, 2);
    let plain = segments.iter().find(|s| s.text == "A").unwrap();
    assert_eq!(plain.cols, 1);
    assert!(segments.iter().all(|s| s.text != " "));
}

/// S4: a PUA glyph followed by a space then a plain character expands the
/// PUA glyph across the space, consuming it.
#[test]
fn s4_pua_followed_by_space_expands_and_consumes_the_space() {
    let cells = vec![char_cell('\u{EA61}'), char_cell(' '), char_cell('A')];
    let state = state_with_row(3, cells);

    let mut pipeline = RenderPipeline::new();
    let rendered = pipeline.render_pane(&state, "dark", "");
    let segments = &rendered.rows[0];

    let pua = segments.iter().find(|s| s.text == "\u{EA61}").unwrap();
    assert_eq!(pua.cols, 2);
    let plain = segments.iter().find(|s| s.text == "A").unwrap();
    assert_eq!(plain.cols, 1);
    assert_eq!(segments.iter().map(|s| s.cols).sum::<u16>(), 3);
}

/// S5: a PUA glyph followed directly by a non-whitespace character (no
/// space to expand across) stays pinned to a single cell.
#[test]
fn s5_pua_followed_by_non_whitespace_stays_single_cell() {
    let cells = vec![char_cell('\u{EA61}'), char_cell('B'), char_cell('A')];
    let state = state_with_row(3, cells);

    let mut pipeline = RenderPipeline::new();
    let rendered = pipeline.render_pane(&state, "dark", "");
    let segments = &rendered.rows[0];

    let pua = segments.iter().find(|s| s.text == "\u{EA61}").unwrap();
    assert_eq!(pua.cols, 1);
    assert_eq!(segments.iter().map(|s| s.cols).sum::<u16>(), 3);
}

/// Invariant 4: for every rendered line, segment cell counts sum to the
/// pane's column count, regardless of content mix.
#[test]
fn invariant4_segment_cells_sum_to_column_count() {
    let cells = vec![char_cell('a'), char_cell('b'), char_cell('c'), char_cell('d')];
    let state = state_with_row(4, cells);
    let mut pipeline = RenderPipeline::new();
    let rendered = pipeline.render_pane(&state, "dark", "");
    assert_eq!(rendered.rows[0].iter().map(|s| s.cols).sum::<u16>(), 4);
}

/// Invariant 6: when the cursor is visible on the active line, exactly one
/// segment carries the cursor marker.
#[test]
fn invariant6_exactly_one_cursor_segment_on_active_line() {
    let cells = vec![char_cell('a'), char_cell('b'), char_cell('c')];
    let mut state = state_with_row(3, cells);
    state.cursor.x = 1;
    state.cursor.y = 0;
    state.cursor.visible = true;

    let mut pipeline = RenderPipeline::new();
    let rendered = pipeline.render_pane(&state, "dark", "");
    let cursor_segments: Vec<_> = rendered.rows[0].iter().filter(|s| s.is_cursor).collect();
    assert_eq!(cursor_segments.len(), 1);
    assert_eq!(cursor_segments[0].text, "b");
}
