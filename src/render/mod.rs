//! Cell→run→segment render pipeline (§4.3): turns cached pane cells into
//! positioned, cursor-injected segments the host can paint.

pub mod cache;
pub mod measure;
pub mod pipeline;
pub mod pua;
pub mod run;
pub mod segment;

pub use cache::{CachedRowRender, RowRenderCache, SegmentCache, DEFAULT_ROW_CACHE_CAPACITY};
pub use measure::{derive_pane_size, CellMetrics, CellMetricsSource, MAX_PANE_DIMENSION, MIN_PANE_DIMENSION};
pub use pipeline::{RenderPipeline, RenderedPane};
pub use run::{assemble_runs, BgOverride, GlyphRange, RangeKind, Run, RunKey};
pub use segment::{inject_cursor, normalize_segments, resolve_cursor_blink, resolve_cursor_color, CursorColorSource, Segment};
