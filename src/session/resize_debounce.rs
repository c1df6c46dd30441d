//! Pane resize debounce (§4.5): `setPaneSize` coalesces rapid-fire resize
//! calls into a single `resize` message per pane, 333 ms after the last
//! call, and flushes immediately on (re)connect.

use rustc_hash::FxHashMap;

/// Debounce interval, milliseconds (§4.5).
pub const DEBOUNCE_MS: f64 = 333.0;

/// Tracks pending and last-sent pane sizes (§4.5: "stores into
/// pendingResizes unless equal to lastSent").
#[derive(Debug, Default)]
pub struct ResizeDebouncer {
    pending: FxHashMap<u32, (u16, u16)>,
    last_sent: FxHashMap<u32, (u16, u16)>,
    timer_deadline: Option<f64>,
}

impl ResizeDebouncer {
    /// A debouncer with no pending or previously-sent sizes.
    pub fn new() -> Self {
        ResizeDebouncer::default()
    }

    /// Record a desired pane size at `now_ms`. Returns the new timer
    /// deadline if one needs to be (re)armed, or `None` if `(cols, rows)`
    /// already matches what was last sent (no-op) or an unexpired timer is
    /// already running.
    pub fn set_pane_size(&mut self, pane_id: u32, cols: u16, rows: u16, now_ms: f64) -> Option<f64> {
        if self.last_sent.get(&pane_id) == Some(&(cols, rows)) {
            return None;
        }
        self.pending.insert(pane_id, (cols, rows));
        let deadline = now_ms + DEBOUNCE_MS;
        self.timer_deadline = Some(deadline);
        Some(deadline)
    }

    /// Whether a timer is currently armed.
    pub fn has_pending_timer(&self) -> bool {
        self.timer_deadline.is_some()
    }

    /// Flush all pending resizes unconditionally - used both by the armed
    /// debounce timer firing and by the on-connect immediate flush (§4.5:
    /// "On connect, the queue is flushed immediately"). Moves every
    /// flushed entry from `pending` to `last_sent` and returns them as
    /// `(paneId, cols, rows)` in arbitrary order.
    pub fn flush(&mut self) -> Vec<(u32, u16, u16)> {
        self.timer_deadline = None;
        let flushed: Vec<(u32, u16, u16)> =
            self.pending.drain().map(|(pane_id, (cols, rows))| (pane_id, cols, rows)).collect();
        for &(pane_id, cols, rows) in &flushed {
            self.last_sent.insert(pane_id, (cols, rows));
        }
        flushed
    }

    /// The last size successfully flushed for `pane_id`, if any.
    pub fn last_sent(&self, pane_id: u32) -> Option<(u16, u16)> {
        self.last_sent.get(&pane_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_calls_before_flush_collapse_to_one_entry() {
        let mut deb = ResizeDebouncer::new();
        deb.set_pane_size(1, 80, 24, 0.0);
        deb.set_pane_size(1, 100, 30, 50.0);
        let flushed = deb.flush();
        assert_eq!(flushed, vec![(1, 100, 30)]);
        assert_eq!(deb.last_sent(1), Some((100, 30)));
    }

    #[test]
    fn no_op_when_size_matches_last_sent() {
        let mut deb = ResizeDebouncer::new();
        deb.set_pane_size(1, 80, 24, 0.0);
        deb.flush();
        assert_eq!(deb.set_pane_size(1, 80, 24, 100.0), None);
        assert!(!deb.has_pending_timer());
    }

    #[test]
    fn deadline_is_now_plus_333ms() {
        let mut deb = ResizeDebouncer::new();
        let deadline = deb.set_pane_size(1, 80, 24, 1000.0).unwrap();
        assert_eq!(deadline, 1333.0);
    }

    #[test]
    fn flush_with_nothing_pending_is_empty() {
        let mut deb = ResizeDebouncer::new();
        assert!(deb.flush().is_empty());
    }
}
