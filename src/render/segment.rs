//! Runs → positioned segments (§4.3): normalizes a row's runs to exactly
//! `cols` columns and injects the cursor glyph.

use crate::render::run::{RangeKind, Run, RunKey};
use crate::pane::style_table::CanonicalStyleId;

/// One positioned span of text, after column normalization and (possibly)
/// cursor splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Layout classification, inherited from the source [`GlyphRange`](crate::render::run::GlyphRange).
    pub kind: RangeKind,
    /// Text this segment renders.
    pub text: String,
    /// Columns this segment occupies.
    pub cols: u16,
    /// The run key this segment's styling derives from.
    pub key: RunKey,
    /// Whether the cursor occupies this segment.
    pub is_cursor: bool,
}

fn blank_key() -> RunKey {
    RunKey { style_id: CanonicalStyleId(0), selected: false, bg_override: None, hyperlink: None }
}

/// Flatten `runs` into exactly `cols` columns of [`Segment`]s: truncating a
/// stream that runs long (never splitting a `Wide` segment) and padding a
/// short one with a trailing plain space segment (§4.3).
pub fn normalize_segments(runs: &[Run], cols: u16) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut total = 0u16;

    'ranges: for run in runs {
        for range in &run.ranges {
            let remaining = cols.saturating_sub(total);
            if remaining == 0 {
                break 'ranges;
            }
            if range.cols <= remaining {
                segments.push(Segment {
                    kind: range.kind,
                    text: range.text.clone(),
                    cols: range.cols,
                    key: run.key.clone(),
                    is_cursor: false,
                });
                total += range.cols;
                continue;
            }
            // range.cols > remaining: must truncate.
            if range.kind == RangeKind::Wide {
                // Never split a wide glyph in half; drop it and everything after.
                break 'ranges;
            }
            let truncated: String = range.text.chars().take(remaining as usize).collect();
            segments.push(Segment {
                kind: range.kind,
                text: truncated,
                cols: remaining,
                key: run.key.clone(),
                is_cursor: false,
            });
            total = cols;
            break 'ranges;
        }
    }

    if total < cols {
        let pad = cols - total;
        segments.push(Segment {
            kind: RangeKind::Plain,
            text: " ".repeat(pad as usize),
            cols: pad,
            key: blank_key(),
            is_cursor: false,
        });
    }

    segments
}

/// Split (or mark) the segment containing column `cursor_x` as the cursor
/// segment (§4.3). A `Wide` segment is marked wholesale; any other kind is
/// split into up-to-three before/cursor/after segments.
pub fn inject_cursor(segments: Vec<Segment>, cursor_x: u16) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len() + 2);
    let mut col = 0u16;

    for seg in segments {
        let seg_end = col + seg.cols;
        if cursor_x < col || cursor_x >= seg_end || seg.cols == 0 {
            result.push(seg);
            col = seg_end;
            continue;
        }

        if seg.kind == RangeKind::Wide {
            let mut cursor_seg = seg;
            cursor_seg.is_cursor = true;
            result.push(cursor_seg);
            col = seg_end;
            continue;
        }

        let offset = usize::from(cursor_x - col);
        let chars: Vec<char> = seg.text.chars().collect();
        let before: String = chars.iter().take(offset).collect();
        let cursor_char = chars.get(offset).copied().unwrap_or(' ');
        let after: String = if offset + 1 < chars.len() {
            chars[offset + 1..].iter().collect()
        } else {
            String::new()
        };

        if !before.is_empty() {
            result.push(Segment {
                kind: seg.kind,
                text: before.clone(),
                cols: before.chars().count() as u16,
                key: seg.key.clone(),
                is_cursor: false,
            });
        }
        result.push(Segment {
            kind: seg.kind,
            text: cursor_char.to_string(),
            cols: 1,
            key: seg.key.clone(),
            is_cursor: true,
        });
        if !after.is_empty() {
            result.push(Segment {
                kind: seg.kind,
                text: after.clone(),
                cols: after.chars().count() as u16,
                key: seg.key,
                is_cursor: false,
            });
        }
        col = seg_end;
    }

    result
}

/// Resolve the cursor's blink state from the host's configured preference
/// and the server-reported snapshot blink flag (§4.3): an empty config
/// string defers to the snapshot; otherwise the config's literal `"true"`/
/// other string wins.
pub fn resolve_cursor_blink(config_blink: &str, snapshot_blink: bool) -> bool {
    if config_blink.is_empty() {
        snapshot_blink
    } else {
        config_blink == "true"
    }
}

/// Where a cursor's color should come from, per the host's configured
/// preference (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorColorSource {
    /// Substitute the underlying cell's foreground/background color.
    CellColor,
    /// Keep the CSS/theme default, unmodified.
    Default,
    /// An explicit color value to use verbatim.
    Explicit(String),
}

/// Classify a configured cursor color string (§4.3).
pub fn resolve_cursor_color(config_value: &str) -> CursorColorSource {
    match config_value {
        "cell-foreground" | "cell-background" => CursorColorSource::CellColor,
        "" => CursorColorSource::Default,
        other => CursorColorSource::Explicit(other.to_string()),
    }
}
