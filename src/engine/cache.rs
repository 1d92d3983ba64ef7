//! Cell Rendering Cache - per-coordinate carry-over state.
//!
//! One shared store per board session. `get` is get-or-create: an unseen
//! coordinate gets a default entry (session default color, no overlays) that
//! then lives as long as the store. There is no eviction; the board's fixed
//! dimensions bound the store at `width * height` entries.
//!
//! Clones of [`RenderCache`] share the same map, so the engine, the overlay
//! scheduler and every cell view observe a single entry per coordinate.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::object::VisualOverlay;
use crate::types::{Coord, Rgba};

/// Persisted visual state of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Active overlays in insertion order.
    pub overlays: Vec<VisualOverlay>,
    /// Last composite produced by a fold.
    pub background: Rgba,
    /// Tick value the last fold ran for. `None` until the first fold.
    pub folded_tick: Option<u64>,
}

impl CacheEntry {
    pub fn new(background: Rgba) -> Self {
        Self {
            overlays: Vec::new(),
            background,
            folded_tick: None,
        }
    }

    /// Class names of the active overlays, in order.
    pub fn overlay_classes(&self) -> Vec<String> {
        self.overlays
            .iter()
            .map(|o| o.class_name().to_string())
            .collect()
    }

    /// Remove the overlay with `uid`. Returns false if it was not present.
    pub fn remove_overlay(&mut self, uid: &str) -> bool {
        match self.overlays.iter().position(|o| o.uid() == uid) {
            Some(pos) => {
                self.overlays.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Shared, coordinate-keyed store of [`CacheEntry`] values.
#[derive(Debug, Clone)]
pub struct RenderCache {
    entries: Rc<RefCell<HashMap<Coord, CacheEntry>>>,
    default_color: Rgba,
}

impl RenderCache {
    /// New empty store. Entries created lazily start at `default_color`.
    pub fn new(default_color: Rgba) -> Self {
        Self {
            entries: Rc::new(RefCell::new(HashMap::new())),
            default_color,
        }
    }

    pub fn default_color(&self) -> Rgba {
        self.default_color
    }

    /// Snapshot of the entry at `coord`, creating the default entry first.
    pub fn get(&self, coord: Coord) -> CacheEntry {
        self.update(coord, |entry| entry.clone())
    }

    /// Replace the entry at `coord` wholesale.
    ///
    /// Pending expiry timers for overlays of the old entry stay armed; when
    /// they fire for a uid the new entry lacks, removal is a no-op.
    pub fn set(&self, coord: Coord, entry: CacheEntry) {
        self.entries.borrow_mut().insert(coord, entry);
    }

    /// Run `f` against the entry at `coord` (created on demand).
    ///
    /// The borrow is held only for the duration of `f`, so `f` must not call
    /// back into the cache.
    pub fn update<R>(&self, coord: Coord, f: impl FnOnce(&mut CacheEntry) -> R) -> R {
        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .entry(coord)
            .or_insert_with(|| CacheEntry::new(self.default_color));
        f(entry)
    }

    /// Remove an overlay by uid. A missing coordinate or uid is a no-op.
    pub fn remove_overlay(&self, coord: Coord, uid: &str) -> bool {
        self.entries
            .borrow_mut()
            .get_mut(&coord)
            .is_some_and(|entry| entry.remove_overlay(uid))
    }

    /// Whether an entry exists yet for `coord`. Does not create one.
    pub fn contains(&self, coord: Coord) -> bool {
        self.entries.borrow().contains_key(&coord)
    }

    /// Number of coordinates seen so far.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> RenderCache {
        RenderCache::new(Rgba::from_rgb_int(0xF0F0F0))
    }

    #[test]
    fn test_get_creates_default_entry() {
        let cache = setup();
        assert!(!cache.contains(Coord::new(1, 1)));

        let entry = cache.get(Coord::new(1, 1));
        assert_eq!(entry.background, Rgba::from_rgb_int(0xF0F0F0));
        assert!(entry.overlays.is_empty());
        assert_eq!(entry.folded_tick, None);
        assert!(cache.contains(Coord::new(1, 1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let cache = setup();
        let mut entry = CacheEntry::new(Rgba::RED);
        entry.overlays.push(VisualOverlay::from_millis("flash", 10));
        entry.folded_tick = Some(4);

        cache.set(Coord::new(0, 2), entry.clone());
        assert_eq!(cache.get(Coord::new(0, 2)), entry);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = setup();
        let other = cache.clone();
        other.update(Coord::new(5, 5), |e| e.background = Rgba::BLUE);
        assert_eq!(cache.get(Coord::new(5, 5)).background, Rgba::BLUE);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove_overlay_by_uid_only() {
        let cache = setup();
        let first = VisualOverlay::from_millis("flash", 10);
        let second = VisualOverlay::from_millis("flash", 10);
        let coord = Coord::new(0, 0);
        cache.update(coord, |e| {
            e.overlays.push(first.clone());
            e.overlays.push(second.clone());
        });

        assert!(cache.remove_overlay(coord, second.uid()));
        assert_eq!(cache.get(coord).overlays, vec![first.clone()]);

        // Idempotent
        assert!(!cache.remove_overlay(coord, second.uid()));
        assert!(!cache.remove_overlay(Coord::new(9, 9), first.uid()));
        assert!(!cache.contains(Coord::new(9, 9)));
    }
}
