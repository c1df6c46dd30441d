//! Per-pane style canonicalization (§9 "Style identity canonicalization").
//!
//! Wire `styleId`s are per-message: the same logical style can arrive under
//! different numeric ids across snapshots and deltas, and old ids can be
//! reused for unrelated styles. This table maps each *structurally distinct*
//! [`Style`] onto a stable [`CanonicalStyleId`] that survives across
//! messages, so the render pipeline's row/segment caches (keyed in part on
//! style identity) don't thrash every time the server renumbers its table.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::wire::style::Style;

/// A canonical, pane-stable style identity. Unrelated to the wire
/// [`crate::wire::style::StyleId`], which is only valid within the message
/// that carried it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalStyleId(pub u32);

/// Canonicalizes per-message style tables into stable ids, and prunes ids
/// no longer referenced by any cached row (§9, §3 "Shared-resource policy").
#[derive(Debug, Default)]
pub struct StyleTable {
    next_id: u32,
    by_style: FxHashMap<Style, CanonicalStyleId>,
    by_id: IndexMap<CanonicalStyleId, Style>,
}

impl StyleTable {
    /// A fresh table seeded with the mandatory default style at id `0`
    /// (§3: "The style table contains an entry for id 0 ≡ default style").
    pub fn new() -> Self {
        let mut table = StyleTable { next_id: 1, by_style: FxHashMap::default(), by_id: IndexMap::new() };
        table.by_style.insert(Style::default(), CanonicalStyleId(0));
        table.by_id.insert(CanonicalStyleId(0), Style::default());
        table
    }

    /// Look up (or mint) the canonical id for `style`, structurally. Two
    /// calls with an equal `Style` always return the same id, regardless of
    /// which wire `styleId` carried it in on the wire.
    pub fn canonicalize(&mut self, style: Style) -> CanonicalStyleId {
        if let Some(id) = self.by_style.get(&style) {
            return *id;
        }
        let id = CanonicalStyleId(self.next_id);
        self.next_id += 1;
        self.by_style.insert(style, id);
        self.by_id.insert(id, style);
        id
    }

    /// Resolve a canonical id back to its [`Style`], if still present.
    pub fn resolve(&self, id: CanonicalStyleId) -> Option<Style> {
        self.by_id.get(&id).copied()
    }

    /// Number of distinct canonical styles currently tracked.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the table (beyond the mandatory default) is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.len() <= 1
    }

    /// Prune every canonical id not in `referenced`, except the default
    /// style at id `0`, which always survives (§3 invariant: ids referenced
    /// by any cached cell must resolve, and `0` is always valid even for an
    /// otherwise-empty cache).
    pub fn gc(&mut self, referenced: &std::collections::HashSet<CanonicalStyleId>) {
        self.by_id.retain(|id, _| *id == CanonicalStyleId(0) || referenced.contains(id));
        let live: std::collections::HashSet<Style> = self.by_id.values().copied().collect();
        self.by_style.retain(|style, _| live.contains(style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::style::{Color, StyleFlags};

    #[test]
    fn default_style_is_always_id_zero() {
        let mut table = StyleTable::new();
        assert_eq!(table.canonicalize(Style::default()), CanonicalStyleId(0));
    }

    #[test]
    fn structurally_equal_styles_share_an_id_across_calls() {
        let mut table = StyleTable::new();
        let bold = Style { flags: StyleFlags { bold: true, ..Default::default() }, ..Default::default() };
        let first = table.canonicalize(bold);
        let second = table.canonicalize(bold);
        assert_eq!(first, second);
        assert_ne!(first, CanonicalStyleId(0));
    }

    #[test]
    fn distinct_styles_get_distinct_ids() {
        let mut table = StyleTable::new();
        let red = Style { fg: Color::Rgb(255, 0, 0), ..Default::default() };
        let blue = Style { fg: Color::Rgb(0, 0, 255), ..Default::default() };
        assert_ne!(table.canonicalize(red), table.canonicalize(blue));
    }

    #[test]
    fn gc_prunes_unreferenced_but_keeps_default() {
        let mut table = StyleTable::new();
        let bold = Style { flags: StyleFlags { bold: true, ..Default::default() }, ..Default::default() };
        let id = table.canonicalize(bold);
        assert_eq!(table.len(), 2);

        table.gc(&std::collections::HashSet::new());
        assert_eq!(table.len(), 1);
        assert!(table.resolve(CanonicalStyleId(0)).is_some());
        assert!(table.resolve(id).is_none());
    }

    #[test]
    fn gc_keeps_referenced_ids() {
        let mut table = StyleTable::new();
        let bold = Style { flags: StyleFlags { bold: true, ..Default::default() }, ..Default::default() };
        let id = table.canonicalize(bold);

        let mut referenced = std::collections::HashSet::new();
        referenced.insert(id);
        table.gc(&referenced);
        assert!(table.resolve(id).is_some());
    }
}
